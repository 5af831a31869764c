//! Shared building blocks for the operation catalog: API versions, path
//! prefixes, common parameter fields and a small operation builder.

use anf_domain::{
    DomainError, Field, HttpMethod, OperationDefinition, PathTemplate, Pattern, RestBinding, Schema,
};

/// Management API version bound into every NetApp request
pub const API_VERSION: &str = "2024-03-01";

/// Azure Monitor metrics API version
pub const METRICS_API_VERSION: &str = "2018-01-01";

pub const GIB: i64 = 1024 * 1024 * 1024;
pub const TIB: i64 = 1024 * GIB;

/// Smallest capacity pool
pub const POOL_MIN_SIZE: i64 = 4 * TIB;
/// Largest capacity pool
pub const POOL_MAX_SIZE: i64 = 2048 * TIB;
/// Smallest volume quota (`usageThreshold`)
pub const VOLUME_MIN_QUOTA: i64 = 100 * GIB;
/// Largest regular volume quota
pub const VOLUME_MAX_QUOTA: i64 = 100 * TIB;

pub const SERVICE_LEVELS: [&str; 4] = ["Standard", "Premium", "Ultra", "StandardZRS"];

/// `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.NetApp/netAppAccounts` + tail
macro_rules! accounts_path {
    ($tail:literal) => {
        concat!(
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}",
            "/providers/Microsoft.NetApp/netAppAccounts",
            $tail
        )
    };
}

/// Account-scoped path + tail
macro_rules! account_path {
    ($tail:literal) => {
        concat!(
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}",
            "/providers/Microsoft.NetApp/netAppAccounts/{accountName}",
            $tail
        )
    };
}

/// Pool-scoped path + tail
macro_rules! pool_path {
    ($tail:literal) => {
        concat!(
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}",
            "/providers/Microsoft.NetApp/netAppAccounts/{accountName}",
            "/capacityPools/{poolName}",
            $tail
        )
    };
}

/// Volume-scoped path + tail
macro_rules! volume_path {
    ($tail:literal) => {
        concat!(
            "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}",
            "/providers/Microsoft.NetApp/netAppAccounts/{accountName}",
            "/capacityPools/{poolName}/volumes/{volumeName}",
            $tail
        )
    };
}

/// Subscription-level NetApp location path + tail
macro_rules! location_path {
    ($tail:literal) => {
        concat!(
            "/subscriptions/{subscriptionId}/providers/Microsoft.NetApp/locations/{location}",
            $tail
        )
    };
}

pub(crate) use {account_path, accounts_path, location_path, pool_path, volume_path};

/// Compiled name patterns and the parameter fields built from them
///
/// Constructed once per catalog build so every regex is compiled a single
/// time and a bad pattern fails the build.
pub struct CommonFields {
    resource_group: Pattern,
    account: Pattern,
    child: Pattern,
    token: Pattern,
}

impl CommonFields {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            // Letters, digits, underscores, parentheses, hyphens, periods; no trailing period
            resource_group: Pattern::new(r"^[-\w\._\(\)]{0,89}[-\w_\(\)]$")?,
            account: Pattern::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-_]{0,127}$")?,
            child: Pattern::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-_]{0,63}$")?,
            // Region and quota limit names: letters and digits only
            token: Pattern::new(r"^[a-zA-Z0-9]+$")?,
        })
    }

    pub fn subscription(&self) -> Field {
        Field::required("subscriptionId", "Azure subscription ID (UUID)", Schema::Uuid)
    }

    pub fn resource_group(&self) -> Field {
        Field::required(
            "resourceGroupName",
            "Resource group name",
            Schema::string()
                .min_length(1)
                .max_length(90)
                .pattern(self.resource_group.clone()),
        )
    }

    pub fn account(&self) -> Field {
        Field::required(
            "accountName",
            "NetApp account name",
            Schema::string()
                .min_length(1)
                .max_length(128)
                .pattern(self.account.clone()),
        )
    }

    /// A pool/volume/snapshot-style child resource name
    pub fn name(&self, name: &str, description: &str) -> Field {
        Field::required(name, description, self.child_name())
    }

    pub fn child_name(&self) -> Schema {
        Schema::string()
            .min_length(1)
            .max_length(64)
            .pattern(self.child.clone())
            .into()
    }

    pub fn pool(&self) -> Field {
        self.name("poolName", "Capacity pool name")
    }

    pub fn volume(&self) -> Field {
        self.name("volumeName", "Volume name")
    }

    pub fn snapshot(&self) -> Field {
        self.name("snapshotName", "Snapshot name")
    }

    /// Region as a path segment
    pub fn location(&self) -> Field {
        Field::required(
            "location",
            "Azure region (e.g. eastus)",
            Schema::string()
                .min_length(1)
                .max_length(64)
                .pattern(self.token.clone()),
        )
    }

    pub fn quota_limit(&self) -> Field {
        Field::required(
            "quotaLimitName",
            "Quota limit name (e.g. totalCoolAccessVolumesPerSubscription)",
            Schema::string()
                .min_length(1)
                .max_length(128)
                .pattern(self.token.clone()),
        )
    }

    /// subscription + resource group
    pub fn group_scope(&self) -> Vec<Field> {
        vec![self.subscription(), self.resource_group()]
    }

    /// ... + account
    pub fn account_scope(&self) -> Vec<Field> {
        let mut fields = self.group_scope();
        fields.push(self.account());
        fields
    }

    /// ... + pool
    pub fn pool_scope(&self) -> Vec<Field> {
        let mut fields = self.account_scope();
        fields.push(self.pool());
        fields
    }

    /// ... + volume
    pub fn volume_scope(&self) -> Vec<Field> {
        let mut fields = self.pool_scope();
        fields.push(self.volume());
        fields
    }
}

pub fn location_schema() -> Schema {
    Schema::string().min_length(1).max_length(64).into()
}

pub fn tags() -> Field {
    Field::optional("tags", "Resource tags", Schema::object().open())
}

pub fn service_level() -> Schema {
    Schema::enumeration(SERVICE_LEVELS)
}

/// Full ARM resource ID (`/subscriptions/.../providers/...`)
pub fn resource_id() -> Schema {
    Schema::string().min_length(1).max_length(1024).into()
}

enum BodyKind {
    None,
    Param,
    Resource,
    Fields(Vec<String>),
}

/// Declarative builder for one REST-backed operation
pub struct Op {
    name: &'static str,
    description: &'static str,
    method: HttpMethod,
    path: &'static str,
    api_version: &'static str,
    fields: Vec<Field>,
    body: BodyKind,
    query: Vec<(&'static str, String)>,
}

impl Op {
    fn new(
        method: HttpMethod,
        name: &'static str,
        description: &'static str,
        path: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            method,
            path,
            api_version: API_VERSION,
            fields: Vec::new(),
            body: BodyKind::None,
            query: Vec::new(),
        }
    }

    pub fn get(name: &'static str, description: &'static str, path: &'static str) -> Self {
        Self::new(HttpMethod::Get, name, description, path)
    }

    pub fn put(name: &'static str, description: &'static str, path: &'static str) -> Self {
        Self::new(HttpMethod::Put, name, description, path)
    }

    pub fn patch(name: &'static str, description: &'static str, path: &'static str) -> Self {
        Self::new(HttpMethod::Patch, name, description, path)
    }

    pub fn delete(name: &'static str, description: &'static str, path: &'static str) -> Self {
        Self::new(HttpMethod::Delete, name, description, path)
    }

    pub fn post(name: &'static str, description: &'static str, path: &'static str) -> Self {
        Self::new(HttpMethod::Post, name, description, path)
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn api_version(mut self, version: &'static str) -> Self {
        self.api_version = version;
        self
    }

    /// Required `body` argument in flat form, reshaped into an ARM resource
    pub fn resource_body(mut self, description: &str, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field::required("body", description, schema));
        self.body = BodyKind::Resource;
        self
    }

    /// Required `body` argument sent as-is
    pub fn body(mut self, description: &str, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field::required("body", description, schema));
        self.body = BodyKind::Param;
        self
    }

    /// Optional `body` argument sent as-is when present
    pub fn optional_body(mut self, description: &str, schema: impl Into<Schema>) -> Self {
        self.fields.push(Field::optional("body", description, schema));
        self.body = BodyKind::Param;
        self
    }

    /// Top-level arguments collected into the request body
    pub fn body_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut names = Vec::new();
        for field in fields {
            names.push(field.name.clone());
            self.fields.push(field);
        }
        self.body = BodyKind::Fields(names);
        self
    }

    /// Query parameter `wire` read from the argument `field`
    pub fn query(mut self, wire: &'static str, field: Field) -> Self {
        self.query.push((wire, field.name.clone()));
        self.fields.push(field);
        self
    }

    /// The bound api-version is also an optional argument that defaults to it
    pub fn build(mut self) -> Result<OperationDefinition, DomainError> {
        self.fields.push(
            Field::optional(
                "apiVersion",
                "Management API version; only the supported version is accepted",
                Schema::enumeration([self.api_version]),
            )
            .with_default(self.api_version),
        );
        let mut binding = RestBinding::new(
            self.method,
            PathTemplate::parse(self.path)?,
            self.api_version,
        );
        binding = match self.body {
            BodyKind::None => binding,
            BodyKind::Param => binding.with_body_param("body"),
            BodyKind::Resource => binding.with_resource_body("body"),
            BodyKind::Fields(names) => binding.with_body_fields(names),
        };
        for (wire, arg) in self.query {
            binding = binding.with_query(wire, arg);
        }
        Ok(OperationDefinition::rest(
            self.name,
            self.description,
            Schema::object().fields(self.fields),
            binding,
        ))
    }
}

/// Placeholder operation: validated like any other, never dispatched
pub fn stub(
    name: &'static str,
    description: &'static str,
    fields: impl IntoIterator<Item = Field>,
) -> OperationDefinition {
    OperationDefinition::stub(name, description, Schema::object().fields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anf_domain::{DefaultSchemaValidator, SchemaValidator};
    use serde_json::json;

    fn check(field: Field, value: serde_json::Value) -> bool {
        let schema: Schema = Schema::object().field(field).into();
        let name = match &schema {
            Schema::Object(o) => o.fields[0].name.clone(),
            _ => unreachable!(),
        };
        DefaultSchemaValidator
            .validate(&schema, &json!({ name: value }))
            .is_ok()
    }

    #[test]
    fn test_resource_group_names() {
        let common = CommonFields::new().unwrap();
        assert!(check(common.resource_group(), json!("rg1")));
        assert!(check(common.resource_group(), json!("my.rg_(prod)-1")));
        assert!(check(common.resource_group(), json!("a".repeat(90))));
        assert!(!check(common.resource_group(), json!("")));
        assert!(!check(common.resource_group(), json!("a".repeat(91))));
        assert!(!check(common.resource_group(), json!("rg.")));
        assert!(!check(common.resource_group(), json!("rg/1")));
    }

    #[test]
    fn test_account_names() {
        let common = CommonFields::new().unwrap();
        assert!(check(common.account(), json!("acct1")));
        assert!(check(common.account(), json!("a".repeat(128))));
        assert!(!check(common.account(), json!("a".repeat(129))));
        assert!(!check(common.account(), json!("-acct")));
        assert!(!check(common.account(), json!("acct.1")));
        assert!(!check(common.account(), json!("")));
    }

    #[test]
    fn test_child_names() {
        let common = CommonFields::new().unwrap();
        assert!(check(common.pool(), json!("pool_1-a")));
        assert!(check(common.volume(), json!("v".repeat(64))));
        assert!(!check(common.volume(), json!("v".repeat(65))));
        assert!(!check(common.snapshot(), json!("snap shot")));
        assert!(!check(common.snapshot(), json!("_snap")));
    }

    #[test]
    fn test_subscription_must_be_uuid() {
        let common = CommonFields::new().unwrap();
        assert!(check(common.subscription(), json!("9f2c1a4e-3b7d-4e8a-a1c2-5d6e7f8a9b0c")));
        assert!(!check(common.subscription(), json!("my-subscription")));
    }

    #[test]
    fn test_builder_binds_body_and_query() {
        let common = CommonFields::new().unwrap();
        let op = Op::post("anf_test_action", "Test", volume_path!("/breakFileLocks"))
            .fields(common.volume_scope())
            .body_fields([Field::optional("clientIp", "Client IP", Schema::string())])
            .query("top", Field::optional("top", "Max items", Schema::integer()))
            .build()
            .unwrap();

        let binding = op.binding().unwrap();
        assert_eq!(binding.method, HttpMethod::Post);
        assert_eq!(binding.api_version, API_VERSION);
        assert_eq!(binding.query.len(), 1);
        assert!(binding.path.as_str().ends_with("/volumes/{volumeName}/breakFileLocks"));
        let schema = op.schema.as_object().unwrap();
        assert!(schema.has_field("clientIp"));
        assert!(schema.has_field("volumeName"));
    }

    #[test]
    fn test_api_version_argument_defaults_to_bound_version() {
        let common = CommonFields::new().unwrap();
        let op = Op::get("anf_test_get", "Test", pool_path!(""))
            .fields(common.pool_scope())
            .build()
            .unwrap();
        let args = json!({
            "subscriptionId": "9f2c1a4e-3b7d-4e8a-a1c2-5d6e7f8a9b0c",
            "resourceGroupName": "rg1",
            "accountName": "acct1",
            "poolName": "pool1",
        });

        let validated = DefaultSchemaValidator.validate(&op.schema, &args).unwrap();
        assert_eq!(validated["apiVersion"], API_VERSION);

        let mut explicit = args.clone();
        explicit["apiVersion"] = json!(API_VERSION);
        assert!(DefaultSchemaValidator.validate(&op.schema, &explicit).is_ok());

        let mut other = args;
        other["apiVersion"] = json!("2019-11-01");
        let issues = DefaultSchemaValidator.validate(&op.schema, &other).unwrap_err();
        assert_eq!(issues[0].path, "apiVersion");

        // The URL keeps the bound version whatever the argument says
        let request = op.binding().unwrap().resolve(&validated).unwrap();
        assert!(request.path.ends_with("?api-version=2024-03-01"), "{}", request.path);
    }

    #[test]
    fn test_region_tokens() {
        let common = CommonFields::new().unwrap();
        assert!(check(common.location(), json!("eastus2")));
        assert!(check(common.quota_limit(), json!("totalCoolAccessVolumesPerSubscription")));
        for bad in [".", "..", "east/us", "east us", ""] {
            assert!(!check(common.location(), json!(bad)), "{}", bad);
            assert!(!check(common.quota_limit(), json!(bad)), "{}", bad);
        }
    }
}
