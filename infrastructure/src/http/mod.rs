//! HTTP adapters built on reqwest

mod reqwest_transport;
#[cfg(test)]
pub(crate) mod test_server;

pub use reqwest_transport::{ReqwestTransport, build_client};
