//! Stdio tool server
//!
//! [`ToolServer`] maps JSON-RPC methods onto the operation registry;
//! [`serve`] runs it over any line-oriented reader/writer pair (stdin/stdout
//! in production, in-memory buffers in tests).

pub mod protocol;
pub mod stdio;

pub use protocol::{JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, RpcError, ToolServer};
pub use stdio::serve;
