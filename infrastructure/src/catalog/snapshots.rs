//! Volume snapshots and snapshot policies

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{CommonFields, Op, account_path, location_schema, tags, volume_path};

fn snapshot_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.volume_scope();
    scope.push(common.snapshot());

    Ok(vec![
        Op::get(
            "anf_snapshots_list",
            "List snapshots of a volume",
            volume_path!("/snapshots"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::get(
            "anf_snapshots_get",
            "Get a snapshot",
            volume_path!("/snapshots/{snapshotName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_snapshots_create",
            "Take a snapshot of a volume",
            volume_path!("/snapshots/{snapshotName}"),
        )
        .fields(scope.clone())
        .resource_body(
            "Snapshot definition",
            Schema::object().field(common.location()),
        )
        .build()?,
        Op::patch(
            "anf_snapshots_update",
            "Patch a snapshot",
            volume_path!("/snapshots/{snapshotName}"),
        )
        .fields(scope.clone())
        .optional_body("Snapshot fields to change", Schema::object().open())
        .build()?,
        Op::delete(
            "anf_snapshots_delete",
            "Delete a snapshot",
            volume_path!("/snapshots/{snapshotName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::post(
            "anf_snapshots_restore_files",
            "Restore individual files from a snapshot into the active file system",
            volume_path!("/snapshots/{snapshotName}/restoreFiles"),
        )
        .fields(scope)
        .body_fields([
            Field::required(
                "filePaths",
                "Paths of the files to restore, relative to the volume root",
                Schema::array(Schema::string().min_length(1)).min_items(1),
            ),
            Field::optional(
                "destinationPath",
                "Directory to restore into; defaults to the original location",
                Schema::string(),
            ),
        ])
        .build()?,
    ])
}

fn schedule(name: &str, description: &str, fields: Vec<Field>) -> Field {
    Field::optional(
        name,
        description,
        Schema::object()
            .field(Field::optional(
                "snapshotsToKeep",
                "Number of snapshots to retain",
                Schema::integer().minimum(0).maximum(255),
            ))
            .field(Field::optional("minute", "Minute of the hour", Schema::integer().minimum(0).maximum(59)))
            .fields(fields),
    )
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
        .field(schedule("hourlySchedule", "Hourly schedule", Vec::new()))
        .field(schedule(
            "dailySchedule",
            "Daily schedule",
            vec![Field::optional("hour", "Hour of the day", Schema::integer().minimum(0).maximum(23))],
        ))
        .field(schedule(
            "weeklySchedule",
            "Weekly schedule",
            vec![
                Field::optional("day", "Comma-separated week days (e.g. Monday,Friday)", Schema::string()),
                Field::optional("hour", "Hour of the day", Schema::integer().minimum(0).maximum(23)),
            ],
        ))
        .field(schedule(
            "monthlySchedule",
            "Monthly schedule",
            vec![
                Field::optional("daysOfMonth", "Comma-separated days of the month", Schema::string()),
                Field::optional("hour", "Hour of the day", Schema::integer().minimum(0).maximum(23)),
            ],
        ))
        .into()
}

fn policy_ops(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut scope = common.account_scope();
    scope.push(common.name("snapshotPolicyName", "Snapshot policy name"));

    Ok(vec![
        Op::get(
            "anf_snapshot_policies_list",
            "List snapshot policies of a NetApp account",
            account_path!("/snapshotPolicies"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::get(
            "anf_snapshot_policies_get",
            "Get a snapshot policy",
            account_path!("/snapshotPolicies/{snapshotPolicyName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::put(
            "anf_snapshot_policies_create",
            "Create a snapshot policy",
            account_path!("/snapshotPolicies/{snapshotPolicyName}"),
        )
        .fields(scope.clone())
        .resource_body("Snapshot policy definition", policy_body(true))
        .build()?,
        Op::patch(
            "anf_snapshot_policies_update",
            "Patch a snapshot policy",
            account_path!("/snapshotPolicies/{snapshotPolicyName}"),
        )
        .fields(scope.clone())
        .resource_body("Snapshot policy fields to change", policy_body(false))
        .build()?,
        Op::delete(
            "anf_snapshot_policies_delete",
            "Delete a snapshot policy",
            account_path!("/snapshotPolicies/{snapshotPolicyName}"),
        )
        .fields(scope.clone())
        .build()?,
        Op::get(
            "anf_snapshot_policies_list_volumes",
            "List the volumes a snapshot policy is assigned to",
            account_path!("/snapshotPolicies/{snapshotPolicyName}/volumes"),
        )
        .fields(scope)
        .build()?,
    ])
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut operations = snapshot_ops(common)?;
    operations.extend(policy_ops(common)?);
    Ok(operations)
}
