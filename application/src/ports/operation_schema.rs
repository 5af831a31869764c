//! Operation schema conversion port.
//!
//! Separates "which operations exist" (domain) from "how to describe them to
//! a tool client" (infrastructure). The domain layer defines
//! [`OperationDefinition`] and [`OperationSpec`]; this port handles the JSON
//! Schema conversion that the tool protocol requires.

use anf_domain::{OperationDefinition, OperationSpec};

/// Port for converting operation definitions to tool descriptors.
pub trait OperationSchemaPort: Send + Sync {
    /// Convert a single operation to `{name, description, inputSchema}`.
    fn operation_to_tool(&self, operation: &OperationDefinition) -> serde_json::Value;

    /// Convert all operations, in registration order.
    fn all_tools(&self, spec: &OperationSpec) -> Vec<serde_json::Value> {
        spec.all().map(|op| self.operation_to_tool(op)).collect()
    }
}
