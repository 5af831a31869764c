//! Resources nested under a volume or account: quota rules, volume groups
//! and subvolumes

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{CommonFields, Op, account_path, location_schema, tags, volume_path};

fn quota_body(create: bool) -> Schema {
    let size = Schema::integer().minimum(4).maximum(1_099_511_627_776);
    let (location, size, kind) = if create {
        (
            Field::required("location", "Azure region of the volume", location_schema()),
            Field::required("quotaSizeInKiBs", "Quota size in KiB", size),
            Field::required("quotaType", "Quota type", quota_types()),
        )
    } else {
        (
            Field::optional("location", "Azure region of the volume", location_schema()),
            Field::optional("quotaSizeInKiBs", "Quota size in KiB", size),
            Field::optional("quotaType", "Quota type", quota_types()),
        )
    };
    Schema::object()
        .field(location)
        .field(size)
        .field(kind)
        .field(Field::optional(
            "quotaTarget",
            "UID/GID or SID the quota applies to (individual quotas only)",
            Schema::string(),
        ))
        .field(tags())
        .into()
}

fn quota_types() -> Schema {
    Schema::enumeration([
        "DefaultUserQuota",
        "DefaultGroupQuota",
        "IndividualUserQuota",
        "IndividualGroupQuota",
    ])
}

fn quota_rule_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.volume_scope();
    scope.push(common.name("volumeQuotaRuleName", "Quota rule name"));

    Ok(vec![
        Op::get(
            "anf_quota_rules_list",
            "List quota rules of a volume",
            volume_path!("/volumeQuotaRules"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::get(
            "anf_quota_rules_get",
            "Get a volume quota rule",
            volume_path!("/volumeQuotaRules/{volumeQuotaRuleName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_quota_rules_create",
            "Create a volume quota rule",
            volume_path!("/volumeQuotaRules/{volumeQuotaRuleName}"),
        )
        .fields(scope.clone())
        .resource_body("Quota rule definition", quota_body(true))
        .build()?,
        Op::patch(
            "anf_quota_rules_update",
            "Patch a volume quota rule",
            volume_path!("/volumeQuotaRules/{volumeQuotaRuleName}"),
        )
        .fields(scope.clone())
        .resource_body("Quota rule fields to change", quota_body(false))
        .build()?,
        Op::delete(
            "anf_quota_rules_delete",
            "Delete a volume quota rule",
            volume_path!("/volumeQuotaRules/{volumeQuotaRuleName}"),
        )
        .fields(scope)
        .build()?,
    ])
}

fn volume_group_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.account_scope();
    scope.push(common.name("volumeGroupName", "Volume group name"));

    Ok(vec![
        Op::get(
            "anf_volume_groups_list",
            "List volume groups of a NetApp account",
            account_path!("/volumeGroups"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::get(
            "anf_volume_groups_get",
            "Get a volume group",
            account_path!("/volumeGroups/{volumeGroupName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_volume_groups_create",
            "Create a volume group with all of its volumes (e.g. for SAP HANA)",
            account_path!("/volumeGroups/{volumeGroupName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Volume group definition",
            Schema::object()
                .field(common.location())
                .field(Field::required(
                    "groupMetaData",
                    "Application type, identifier and description of the group",
                    Schema::object().open(),
                ))
                .field(Field::required(
                    "volumes",
                    "Volume definitions in the group",
                    Schema::array(Schema::object().open()).min_items(1),
                )),
        )
        .build()?,
        Op::delete(
            "anf_volume_groups_delete",
            "Delete a volume group",
            account_path!("/volumeGroups/{volumeGroupName}"),
        )
        .fields(scope)
        .build()?,
    ])
}

fn subvolume_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.volume_scope();
    scope.push(common.name("subvolumeName", "Subvolume name"));

    let size = || Schema::integer().minimum(0);
    Ok(vec![
        Op::get(
            "anf_subvolumes_list",
            "List subvolumes of a volume",
            volume_path!("/subvolumes"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::get(
            "anf_subvolumes_get",
            "Get a subvolume",
            volume_path!("/subvolumes/{subvolumeName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_subvolumes_create",
            "Create a subvolume (file or directory) in a volume",
            volume_path!("/subvolumes/{subvolumeName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Subvolume definition",
            Schema::object()
                .field(Field::required(
                    "path",
                    "Path of the subvolume relative to the volume root",
                    Schema::string().min_length(1),
                ))
                .field(Field::optional("size", "Size in bytes", size()))
                .field(Field::optional(
                    "parentPath",
                    "Path of an existing subvolume to clone from",
                    Schema::string(),
                )),
        )
        .build()?,
        Op::patch(
            "anf_subvolumes_update",
            "Patch a subvolume (resize or rename)",
            volume_path!("/subvolumes/{subvolumeName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Subvolume fields to change",
            Schema::object()
                .field(Field::optional("path", "New path", Schema::string().min_length(1)))
                .field(Field::optional("size", "Size in bytes", size())),
        )
        .build()?,
        Op::delete(
            "anf_subvolumes_delete",
            "Delete a subvolume",
            volume_path!("/subvolumes/{subvolumeName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::post(
            "anf_subvolumes_get_metadata",
            "Get metadata (sizes, timestamps, permissions) of a subvolume",
            volume_path!("/subvolumes/{subvolumeName}/getMetadata"),
        )
        .fields(scope)
        .build()?,
    ])
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut operations = quota_rule_ops(common)?;
    operations.extend(volume_group_ops(common)?);
    operations.extend(subvolume_ops(common)?);
    Ok(operations)
}
