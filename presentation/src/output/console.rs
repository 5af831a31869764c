//! Console output formatter for operation listings and call results

use anf_domain::{OperationDefinition, OperationSpec, RiskLevel};
use colored::Colorize;
use serde_json::Value;

/// Formats the catalog and dispatch results for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the operation catalog, grouped by resource family
    pub fn operation_list(spec: &OperationSpec, implemented_only: bool) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Azure NetApp Files Operations"));
        output.push('\n');

        let mut current_group = "";
        let mut shown = 0;
        for operation in spec.all() {
            if implemented_only && !operation.is_implemented() {
                continue;
            }
            let group = Self::group_of(&operation.name);
            if group != current_group {
                output.push_str(&Self::section_header(group));
                current_group = group;
            }
            output.push_str(&Self::operation_line(operation));
            shown += 1;
        }

        let stubs = spec.stubs().count();
        output.push_str(&format!(
            "\n{} {} shown, {} implemented, {} placeholder\n",
            "Total:".cyan().bold(),
            shown,
            spec.len() - stubs,
            stubs
        ));
        output.push_str(&Self::footer());
        output
    }

    fn operation_line(operation: &OperationDefinition) -> String {
        let name = if operation.is_implemented() {
            operation.name.green().bold()
        } else {
            operation.name.yellow().bold()
        };
        let mut tags = String::new();
        if !operation.is_implemented() {
            tags.push_str(&format!(" {}", "[placeholder]".yellow()));
        }
        if operation.risk_level() == RiskLevel::High {
            tags.push_str(&format!(" {}", "[writes]".red()));
        }
        format!(
            "  {}{}\n      {}\n",
            name,
            tags,
            operation.description.dimmed()
        )
    }

    /// `anf_snapshot_policies_get` → `snapshot`; first word after the prefix
    fn group_of(name: &str) -> &str {
        let rest = name.strip_prefix("anf_").unwrap_or(name);
        rest.split('_').next().unwrap_or(rest)
    }

    /// Pretty-printed JSON for results, schemas and tool descriptors
    pub fn format_json(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anf_domain::{HttpMethod, PathTemplate, RestBinding, Schema};
    use serde_json::json;

    fn spec() -> OperationSpec {
        let binding = |method| {
            RestBinding::new(method, PathTemplate::parse("/pools").unwrap(), "2024-03-01")
        };
        OperationSpec::new()
            .register_all([
                OperationDefinition::rest(
                    "anf_pools_list",
                    "List capacity pools",
                    Schema::object(),
                    binding(HttpMethod::Get),
                ),
                OperationDefinition::rest(
                    "anf_pools_delete",
                    "Delete a capacity pool",
                    Schema::object(),
                    binding(HttpMethod::Delete),
                ),
                OperationDefinition::stub("anf_cost_analysis", "Analyze cost", Schema::object()),
            ])
            .unwrap()
    }

    #[test]
    fn test_operation_list() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::operation_list(&spec(), false);

        assert!(output.contains("pools\n"));
        assert!(output.contains("  anf_pools_list\n      List capacity pools"));
        assert!(output.contains("anf_pools_delete [writes]"));
        assert!(output.contains("anf_cost_analysis [placeholder]"));
        assert!(output.contains("3 shown, 2 implemented, 1 placeholder"));
    }

    #[test]
    fn test_operation_list_implemented_only() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::operation_list(&spec(), true);

        assert!(!output.contains("anf_cost_analysis"));
        assert!(output.contains("2 shown, 2 implemented, 1 placeholder"));
    }

    #[test]
    fn test_group_of() {
        assert_eq!(ConsoleFormatter::group_of("anf_volumes_get"), "volumes");
        assert_eq!(ConsoleFormatter::group_of("anf_snapshot_policies_get"), "snapshot");
        assert_eq!(ConsoleFormatter::group_of("custom"), "custom");
    }

    #[test]
    fn test_format_json_is_pretty() {
        let text = ConsoleFormatter::format_json(&json!({"success": true}));
        assert_eq!(text, "{\n  \"success\": true\n}");
    }
}
