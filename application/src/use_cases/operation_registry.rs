//! Operation Registry use case
//!
//! The single entry point for running an operation by name:
//!
//! 1. look the descriptor up (`UnknownOperation` if absent)
//! 2. fill configured context defaults the caller omitted
//! 3. validate; on failure return every issue without touching credentials
//!    or the network
//! 4. run the handler: `Rest` resolves and sends the request, `Stub` returns
//!    a placeholder
//!
//! Results are never memoized; each dispatch of a `Rest` operation is one
//! fresh HTTP call.

use std::sync::Arc;

use anf_domain::{
    DefaultSchemaValidator, DispatchOutcome, OperationDefinition, OperationHandler, OperationSpec,
    SchemaValidator,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::request_dispatcher::RequestDispatcher;
use crate::config::ContextDefaults;
use crate::error::DispatchError;

pub struct OperationRegistry {
    spec: Arc<OperationSpec>,
    dispatcher: Arc<RequestDispatcher>,
    validator: Box<dyn SchemaValidator + Send + Sync>,
    defaults: ContextDefaults,
}

impl OperationRegistry {
    pub fn new(spec: Arc<OperationSpec>, dispatcher: Arc<RequestDispatcher>) -> Self {
        Self {
            spec,
            dispatcher,
            validator: Box::new(DefaultSchemaValidator),
            defaults: ContextDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ContextDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn SchemaValidator + Send + Sync>) -> Self {
        self.validator = validator;
        self
    }

    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    pub fn get(&self, name: &str) -> Option<&OperationDefinition> {
        self.spec.get(name)
    }

    /// Whether `name` is wired to a backend; `None` for unknown names
    pub fn is_implemented(&self, name: &str) -> Option<bool> {
        self.spec.get(name).map(OperationDefinition::is_implemented)
    }

    /// Validate `raw_args` and run the named operation
    pub async fn dispatch(
        &self,
        name: &str,
        raw_args: Value,
    ) -> Result<DispatchOutcome, DispatchError> {
        let operation = self
            .spec
            .get(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;

        // Missing arguments are an empty object, not a type error
        let raw_args = match raw_args {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let raw_args = self.defaults.apply(raw_args, |field| {
            operation
                .schema
                .as_object()
                .is_some_and(|object| object.has_field(field))
        });

        let args = self
            .validator
            .validate(&operation.schema, &raw_args)
            .map_err(|issues| {
                debug!("{}: {} validation issue(s)", name, issues.len());
                DispatchError::Validation(issues)
            })?;

        match &operation.handler {
            OperationHandler::Stub => {
                info!("{} is registered as a stub", name);
                Ok(DispatchOutcome::placeholder(name))
            }
            OperationHandler::Rest(binding) => {
                let request = binding.resolve(&args)?;
                debug!("Dispatching {} as {} {}", name, request.method, request.path);
                let result = self.dispatcher.send(&request).await?;
                Ok(DispatchOutcome::Api(result))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::http_transport::TransportError;
    use crate::use_cases::credential_manager::tests::CountingProvider;
    use crate::use_cases::request_dispatcher::tests::{ScriptedTransport, credentials};
    use anf_domain::{DomainError, Field, HttpMethod, PathTemplate, Pattern, RestBinding, Schema};
    use serde_json::json;

    const SUBSCRIPTION: &str = "9f2c1a4e-3b7d-4e8a-a1c2-5d6e7f8a9b0c";
    const POOL_PATH: &str = "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.NetApp/netAppAccounts/{accountName}/capacityPools/{poolName}";

    fn name_field(name: &str) -> Field {
        let pattern = Pattern::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-_]{0,63}$").unwrap();
        Field::required(name, name, Schema::string().pattern(pattern))
    }

    fn scope_fields() -> Vec<Field> {
        vec![
            Field::required("subscriptionId", "Subscription", Schema::Uuid),
            Field::required("resourceGroupName", "Resource group", Schema::string().min_length(1)),
            name_field("accountName"),
            name_field("poolName"),
        ]
    }

    fn spec() -> Arc<OperationSpec> {
        let body = Schema::object()
            .field(Field::required("location", "Region", Schema::string()))
            .field(Field::required(
                "serviceLevel",
                "Tier",
                Schema::enumeration(["Standard", "Premium", "Ultra", "StandardZRS"]),
            ))
            .field(Field::required(
                "size",
                "Bytes",
                Schema::integer().minimum(4_398_046_511_104),
            ))
            .open();

        let spec = OperationSpec::new()
            .register_all([
                OperationDefinition::rest(
                    "anf_pools_create_or_update",
                    "Create or update a capacity pool",
                    Schema::object()
                        .fields(scope_fields())
                        .field(Field::required("body", "Pool", body)),
                    RestBinding::new(
                        HttpMethod::Put,
                        PathTemplate::parse(POOL_PATH).unwrap(),
                        "2024-03-01",
                    )
                    .with_body_param("body"),
                ),
                OperationDefinition::rest(
                    "anf_pools_get",
                    "Get a capacity pool",
                    Schema::object().fields(scope_fields()),
                    RestBinding::new(
                        HttpMethod::Get,
                        PathTemplate::parse(POOL_PATH).unwrap(),
                        "2024-03-01",
                    ),
                ),
                OperationDefinition::stub(
                    "anf_cost_analysis",
                    "Cost analysis",
                    Schema::object().field(Field::optional("accountName", "Account", Schema::string())),
                ),
            ])
            .unwrap();
        Arc::new(spec)
    }

    fn registry(transport: &Arc<ScriptedTransport>) -> (Arc<CountingProvider>, OperationRegistry) {
        let (provider, credentials) = credentials();
        let dispatcher = Arc::new(RequestDispatcher::new(
            credentials,
            transport.clone(),
            "https://management.azure.com",
        ));
        (provider, OperationRegistry::new(spec(), dispatcher))
    }

    fn pool_args(size: i64) -> Value {
        json!({
            "subscriptionId": SUBSCRIPTION,
            "resourceGroupName": "rg1",
            "accountName": "acct1",
            "poolName": "pool1",
            "body": {"location": "eastus", "serviceLevel": "Premium", "size": size},
        })
    }

    #[tokio::test]
    async fn test_create_pool_succeeds() {
        let transport = Arc::new(ScriptedTransport::respond(
            201,
            "Created",
            r#"{"name":"pool1","provisioningState":"Succeeded"}"#,
        ));
        let (_, registry) = registry(&transport);

        let outcome = registry
            .dispatch("anf_pools_create_or_update", pool_args(4_398_046_511_104))
            .await
            .unwrap();

        assert_eq!(
            outcome.to_json(),
            json!({"success": true, "data": {"name": "pool1", "provisioningState": "Succeeded"}})
        );
        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(
            request.url,
            format!(
                "https://management.azure.com/subscriptions/{}/resourceGroups/rg1/providers/Microsoft.NetApp/netAppAccounts/acct1/capacityPools/pool1?api-version=2024-03-01",
                SUBSCRIPTION
            )
        );
        let sent: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["size"], 4_398_046_511_104_i64);
    }

    #[tokio::test]
    async fn test_undersized_pool_rejected_before_any_io() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (provider, registry) = registry(&transport);

        let err = registry
            .dispatch("anf_pools_create_or_update", pool_args(1_099_511_627_776))
            .await
            .unwrap_err();

        match err {
            DispatchError::Validation(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].path, "body.size");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(provider.calls(), 0);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_all_missing_fields_reported() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (provider, registry) = registry(&transport);

        let err = registry
            .dispatch("anf_pools_get", json!({"subscriptionId": SUBSCRIPTION}))
            .await
            .unwrap_err();
        let DispatchError::Validation(issues) = err else {
            panic!("expected validation error");
        };
        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["resourceGroupName", "accountName", "poolName"]);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_dot_segment_is_a_binding_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (provider, registry) = registry(&transport);

        let args = json!({
            "subscriptionId": SUBSCRIPTION,
            "resourceGroupName": "..",
            "accountName": "acct1",
            "poolName": "pool1",
        });
        let err = registry.dispatch("anf_pools_get", args).await.unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Binding(DomainError::DotSegmentPathParameter { ref name, .. })
                if name == "resourceGroupName"
        ));
        assert_eq!(err.kind(), "binding");
        assert_eq!(provider.calls(), 0);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (_, registry) = registry(&transport);
        let err = registry.dispatch("anf_pools_explode", json!({})).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownOperation(name) if name == "anf_pools_explode"));
        assert_eq!(registry.is_implemented("anf_pools_explode"), None);
    }

    #[tokio::test]
    async fn test_stub_returns_placeholder_without_io() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (provider, registry) = registry(&transport);

        assert_eq!(registry.is_implemented("anf_cost_analysis"), Some(false));
        assert_eq!(registry.is_implemented("anf_pools_get"), Some(true));

        let outcome = registry.dispatch("anf_cost_analysis", Value::Null).await.unwrap();
        assert!(outcome.is_placeholder());
        assert_eq!(outcome.to_json()["placeholder"], true);
        assert_eq!(provider.calls(), 0);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_stub_still_validates() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (_, registry) = registry(&transport);
        let err = registry
            .dispatch("anf_cost_analysis", json!({"accountName": 7}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_placeholder_differs_from_api_failure() {
        let transport = Arc::new(ScriptedTransport::respond(404, "Not Found", "{}"));
        let (_, registry) = registry(&transport);
        let mut args = pool_args(0);
        args.as_object_mut().unwrap().remove("body");

        let failure = registry.dispatch("anf_pools_get", args).await.unwrap();
        let placeholder = registry.dispatch("anf_cost_analysis", json!({})).await.unwrap();

        assert!(!failure.is_placeholder());
        assert!(failure.to_json().get("error").is_some());
        assert!(placeholder.to_json().get("error").is_none());
        assert_eq!(failure.to_json()["success"], placeholder.to_json()["success"]);
    }

    #[tokio::test]
    async fn test_identical_dispatches_are_not_memoized() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (provider, registry) = registry(&transport);
        let mut args = pool_args(0);
        args.as_object_mut().unwrap().remove("body");

        registry.dispatch("anf_pools_get", args.clone()).await.unwrap();
        registry.dispatch("anf_pools_get", args).await.unwrap();

        assert_eq!(transport.request_count(), 2);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_context_defaults_fill_omitted_scope() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (_, registry) = registry(&transport);
        let registry = registry.with_defaults(ContextDefaults::new(
            Some(SUBSCRIPTION.to_string()),
            Some("rg-default".to_string()),
        ));

        registry
            .dispatch("anf_pools_get", json!({"accountName": "a1", "poolName": "p1"}))
            .await
            .unwrap();
        assert!(transport.last_request().url.contains("/resourceGroups/rg-default/"));

        registry
            .dispatch(
                "anf_pools_get",
                json!({"resourceGroupName": "rg-explicit", "accountName": "a1", "poolName": "p1"}),
            )
            .await
            .unwrap();
        assert!(transport.last_request().url.contains("/resourceGroups/rg-explicit/"));
    }

    #[tokio::test]
    async fn test_context_defaults_not_injected_into_undeclared_fields() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let (_, registry) = registry(&transport);
        let registry = registry.with_defaults(ContextDefaults::new(
            Some(SUBSCRIPTION.to_string()),
            None,
        ));
        // The stub schema is closed and does not declare subscriptionId
        let outcome = registry.dispatch("anf_cost_analysis", json!({})).await.unwrap();
        assert!(outcome.is_placeholder());
    }

    #[tokio::test]
    async fn test_network_error_propagates() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Timeout)]));
        let (_, registry) = registry(&transport);
        let mut args = pool_args(0);
        args.as_object_mut().unwrap().remove("body");

        let err = registry.dispatch("anf_pools_get", args).await.unwrap_err();
        assert!(matches!(err, DispatchError::Network(TransportError::Timeout)));
    }
}
