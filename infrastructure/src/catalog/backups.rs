//! Backup policies, backup vaults and backups

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{CommonFields, Op, account_path, location_schema, resource_id, tags, volume_path};

fn retention(name: &str, description: &str) -> Field {
    Field::optional(name, description, Schema::integer().minimum(0).maximum(1019))
}

fn policy_body(create: bool) -> Schema {
    let location = if create {
        Field::required("location", "Azure region of the policy", location_schema())
    } else {
        Field::optional("location", "Azure region of the policy", location_schema())
    };
    Schema::object()
        .field(location)
        .field(tags())
        .field(Field::optional("enabled", "Whether the policy is active", Schema::Boolean))
        .field(retention("dailyBackupsToKeep", "Daily backups to retain"))
        .field(retention("weeklyBackupsToKeep", "Weekly backups to retain"))
        .field(retention("monthlyBackupsToKeep", "Monthly backups to retain"))
        .into()
}

fn policy_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.account_scope();
    scope.push(common.name("backupPolicyName", "Backup policy name"));

    Ok(vec![
        Op::get(
            "anf_backup_policies_list",
            "List backup policies of a NetApp account",
            account_path!("/backupPolicies"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::get(
            "anf_backup_policies_get",
            "Get a backup policy",
            account_path!("/backupPolicies/{backupPolicyName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_backup_policies_create",
            "Create a backup policy",
            account_path!("/backupPolicies/{backupPolicyName}"),
        )
        .fields(scope.clone())
        .resource_body("Backup policy definition", policy_body(true))
        .build()?,
        Op::patch(
            "anf_backup_policies_update",
            "Patch a backup policy",
            account_path!("/backupPolicies/{backupPolicyName}"),
        )
        .fields(scope.clone())
        .resource_body("Backup policy fields to change", policy_body(false))
        .build()?,
        Op::delete(
            "anf_backup_policies_delete",
            "Delete a backup policy",
            account_path!("/backupPolicies/{backupPolicyName}"),
        )
        .fields(scope)
        .build()?,
    ])
}

fn vault_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.account_scope();
    scope.push(common.name("backupVaultName", "Backup vault name"));

    Ok(vec![
        Op::get(
            "anf_backup_vaults_list",
            "List backup vaults of a NetApp account",
            account_path!("/backupVaults"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::get(
            "anf_backup_vaults_get",
            "Get a backup vault",
            account_path!("/backupVaults/{backupVaultName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_backup_vaults_create_or_update",
            "Create or replace a backup vault",
            account_path!("/backupVaults/{backupVaultName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Backup vault definition",
            Schema::object().field(common.location()).field(tags()),
        )
        .build()?,
        Op::delete(
            "anf_backup_vaults_delete",
            "Delete a backup vault (it must contain no backups)",
            account_path!("/backupVaults/{backupVaultName}"),
        )
        .fields(scope)
        .build()?,
    ])
}

fn backup_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut vault = common.account_scope();
    vault.push(common.name("backupVaultName", "Backup vault name"));
    let mut scope = vault.clone();
    scope.push(common.name("backupName", "Backup name"));

    Ok(vec![
        Op::get(
            "anf_backups_list_by_vault",
            "List backups in a backup vault",
            account_path!("/backupVaults/{backupVaultName}/backups"),
        )
        .fields(vault)
        .query(
            "$filter",
            Field::optional(
                "filter",
                "OData filter, e.g. volumeResourceId eq '<id>'",
                Schema::string(),
            ),
        )
        .build()?,
        Op::get(
            "anf_backups_get",
            "Get a backup",
            account_path!("/backupVaults/{backupVaultName}/backups/{backupName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_backups_create",
            "Create a manual backup of a volume into a vault",
            account_path!("/backupVaults/{backupVaultName}/backups/{backupName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Backup definition",
            Schema::object()
                .field(Field::required(
                    "volumeResourceId",
                    "Resource ID of the volume to back up",
                    resource_id(),
                ))
                .field(Field::optional("label", "Backup label", Schema::string().max_length(1024)))
                .field(Field::optional(
                    "useExistingSnapshot",
                    "Back up the most recent existing snapshot instead of taking a new one",
                    Schema::Boolean,
                ))
                .field(Field::optional(
                    "snapshotName",
                    "Snapshot to back up when useExistingSnapshot is set",
                    common.child_name(),
                )),
        )
        .build()?,
        Op::patch(
            "anf_backups_update",
            "Patch a backup (label)",
            account_path!("/backupVaults/{backupVaultName}/backups/{backupName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Backup fields to change",
            Schema::object().field(Field::optional(
                "label",
                "Backup label",
                Schema::string().max_length(1024),
            )),
        )
        .build()?,
        Op::delete(
            "anf_backups_delete",
            "Delete a backup",
            account_path!("/backupVaults/{backupVaultName}/backups/{backupName}"),
        )
        .fields(scope)
        .build()?,
        Op::get(
            "anf_backups_latest_status",
            "Get the latest backup status of a volume",
            volume_path!("/latestBackupStatus/current"),
        )
        .fields(common.volume_scope())
        .build()?,
    ])
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut operations = policy_ops(common)?;
    operations.extend(vault_ops(common)?);
    operations.extend(backup_ops(common)?);
    Ok(operations)
}
