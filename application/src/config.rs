//! Application-level configuration.
//!
//! Values the use cases need at construction time. Loading them from files
//! and the environment is an infrastructure concern.

use serde_json::Value;

/// Deployment context filled into arguments the caller leaves out.
///
/// Most management operations are scoped to a subscription and resource
/// group. When a host is configured for one of each, callers can omit them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextDefaults {
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
}

impl ContextDefaults {
    pub const SUBSCRIPTION_ID: &'static str = "subscriptionId";
    pub const RESOURCE_GROUP_NAME: &'static str = "resourceGroupName";

    pub fn new(subscription_id: Option<String>, resource_group: Option<String>) -> Self {
        Self {
            subscription_id,
            resource_group,
        }
    }

    /// Argument name / default value pairs that are configured
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (Self::SUBSCRIPTION_ID, self.subscription_id.as_deref()),
            (Self::RESOURCE_GROUP_NAME, self.resource_group.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    /// Insert configured defaults for `accepted` names the caller omitted.
    ///
    /// Explicit arguments (including explicit values equal to the default)
    /// are never overwritten. Non-object arguments are returned unchanged so
    /// the validator can report them.
    pub fn apply(&self, args: Value, accepted: impl Fn(&str) -> bool) -> Value {
        let Value::Object(mut object) = args else {
            return args;
        };
        for (name, value) in self.entries() {
            let missing = object.get(name).is_none_or(Value::is_null);
            if missing && accepted(name) {
                object.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> ContextDefaults {
        ContextDefaults::new(Some("sub-1".into()), Some("rg-default".into()))
    }

    #[test]
    fn test_apply_fills_missing() {
        let args = defaults().apply(json!({"accountName": "a"}), |_| true);
        assert_eq!(
            args,
            json!({"accountName": "a", "subscriptionId": "sub-1", "resourceGroupName": "rg-default"})
        );
    }

    #[test]
    fn test_apply_keeps_explicit_values() {
        let args = defaults().apply(json!({"resourceGroupName": "rg1"}), |_| true);
        assert_eq!(args["resourceGroupName"], "rg1");
        assert_eq!(args["subscriptionId"], "sub-1");
    }

    #[test]
    fn test_apply_only_accepted_names() {
        let args = defaults().apply(json!({}), |name| name == "subscriptionId");
        assert_eq!(args, json!({"subscriptionId": "sub-1"}));
    }

    #[test]
    fn test_apply_without_configuration_is_identity() {
        let args = ContextDefaults::default().apply(json!({"x": 1}), |_| true);
        assert_eq!(args, json!({"x": 1}));
        assert_eq!(ContextDefaults::default().apply(json!("raw"), |_| true), json!("raw"));
    }
}
