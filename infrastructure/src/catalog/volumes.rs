//! Volume operations: lifecycle, replication, relocation and maintenance actions

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{
    CommonFields, Op, VOLUME_MAX_QUOTA, VOLUME_MIN_QUOTA, location_schema, pool_path, resource_id,
    service_level, tags, volume_path,
};

const PROTOCOL_TYPES: [&str; 4] = ["NFSv3", "NFSv4.1", "CIFS", "SMB"];

fn usage_threshold() -> Schema {
    Schema::integer()
        .minimum(VOLUME_MIN_QUOTA)
        .maximum(VOLUME_MAX_QUOTA)
        .into()
}

/// Flat volume body for create; `usageThreshold` is in bytes with a 100 GiB floor
fn create_body(common: &CommonFields) -> Schema {
    Schema::object()
        .field(Field::required("location", "Azure region of the volume", location_schema()))
        .field(Field::required(
            "creationToken",
            "Unique file path (export name) of the volume",
            common.child_name(),
        ))
        .field(Field::required(
            "usageThreshold",
            "Quota in bytes (minimum 100 GiB)",
            usage_threshold(),
        ))
        .field(Field::required(
            "subnetId",
            "Resource ID of the delegated subnet",
            resource_id(),
        ))
        .field(Field::optional("serviceLevel", "Performance tier", service_level()))
        .field(Field::optional(
            "protocolTypes",
            "Access protocols",
            Schema::array(Schema::enumeration(PROTOCOL_TYPES)).min_items(1),
        ))
        .field(Field::optional(
            "exportPolicy",
            "NFS export policy rules",
            Schema::object().open(),
        ))
        .field(Field::optional(
            "snapshotDirectoryVisible",
            "Expose the .snapshot directory",
            Schema::Boolean,
        ))
        .field(Field::optional(
            "throughputMibps",
            "Throughput for manual QoS pools",
            Schema::number().minimum(0.0),
        ))
        .field(Field::optional(
            "networkFeatures",
            "Network features",
            Schema::enumeration(["Basic", "Standard"]),
        ))
        .field(Field::optional(
            "snapshotId",
            "Snapshot resource ID or UUID to create the volume from",
            Schema::string().min_length(1),
        ))
        .field(Field::optional(
            "dataProtection",
            "Replication, backup and snapshot policy settings",
            Schema::object().open(),
        ))
        .field(Field::optional("zones", "Availability zones", Schema::array(Schema::string())))
        .field(tags())
        .field(Field::optional(
            "properties",
            "Raw ARM properties, merged with the flat fields",
            Schema::object().open(),
        ))
        .into()
}

fn update_body() -> Schema {
    Schema::object()
        .field(Field::optional(
            "usageThreshold",
            "Quota in bytes (minimum 100 GiB)",
            usage_threshold(),
        ))
        .field(Field::optional("serviceLevel", "Performance tier", service_level()))
        .field(Field::optional(
            "exportPolicy",
            "NFS export policy rules",
            Schema::object().open(),
        ))
        .field(Field::optional(
            "throughputMibps",
            "Throughput for manual QoS pools",
            Schema::number().minimum(0.0),
        ))
        .field(Field::optional(
            "dataProtection",
            "Backup and snapshot policy settings",
            Schema::object().open(),
        ))
        .field(Field::optional(
            "snapshotDirectoryVisible",
            "Expose the .snapshot directory",
            Schema::Boolean,
        ))
        .field(tags())
        .field(Field::optional(
            "properties",
            "Raw ARM properties, merged with the flat fields",
            Schema::object().open(),
        ))
        .into()
}

fn lifecycle(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::get(
            "anf_volumes_list",
            "List volumes in a capacity pool",
            pool_path!("/volumes"),
        )
        .fields(common.pool_scope())
        .build()?,
        Op::get("anf_volumes_get", "Get a volume", volume_path!(""))
            .fields(common.volume_scope())
            .build()?,
        Op::put(
            "anf_volumes_create_or_update",
            "Create or replace a volume",
            volume_path!(""),
        )
        .fields(common.volume_scope())
        .resource_body("Volume definition", create_body(common))
        .build()?,
        Op::patch(
            "anf_volumes_update",
            "Patch a volume (resize, change tier, export policy or tags)",
            volume_path!(""),
        )
        .fields(common.volume_scope())
        .resource_body("Volume fields to change", update_body())
        .build()?,
        Op::delete("anf_volumes_delete", "Delete a volume", volume_path!(""))
            .fields(common.volume_scope())
            .query(
                "forceDelete",
                Field::optional(
                    "forceDelete",
                    "Delete even if the volume has active replication or backups",
                    Schema::Boolean,
                ),
            )
            .build()?,
        Op::post(
            "anf_volumes_revert",
            "Revert a volume to one of its snapshots",
            volume_path!("/revert"),
        )
        .fields(common.volume_scope())
        .body_fields([Field::required(
            "snapshotId",
            "Resource ID of the snapshot to revert to",
            resource_id(),
        )])
        .build()?,
        Op::post(
            "anf_volumes_break_file_locks",
            "Break all file locks on a volume, optionally for one client",
            volume_path!("/breakFileLocks"),
        )
        .fields(common.volume_scope())
        .body_fields([
            Field::optional("clientIp", "Only break locks held by this client IP", Schema::string()),
            Field::optional(
                "confirmRunningDisruptiveOperation",
                "Acknowledge that breaking locks may disrupt clients",
                Schema::Boolean,
            ),
        ])
        .build()?,
        Op::post(
            "anf_volumes_pool_change",
            "Move a volume to another capacity pool",
            volume_path!("/poolChange"),
        )
        .fields(common.volume_scope())
        .body_fields([Field::required(
            "newPoolResourceId",
            "Resource ID of the destination pool",
            resource_id(),
        )])
        .build()?,
        Op::post(
            "anf_volumes_reset_cifs_password",
            "Reset the CIFS password of a volume",
            volume_path!("/resetCifsPassword"),
        )
        .fields(common.volume_scope())
        .build()?,
    ])
}

fn replication(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::post(
            "anf_volumes_authorize_replication",
            "Authorize a destination volume to replicate from this source volume",
            volume_path!("/authorizeReplication"),
        )
        .fields(common.volume_scope())
        .body_fields([Field::required(
            "remoteVolumeResourceId",
            "Resource ID of the destination volume",
            resource_id(),
        )])
        .build()?,
        Op::post(
            "anf_volumes_break_replication",
            "Break the replication relationship, making the destination writable",
            volume_path!("/breakReplication"),
        )
        .fields(common.volume_scope())
        .body_fields([Field::optional(
            "forceBreakReplication",
            "Break even if a transfer is in progress",
            Schema::Boolean,
        )])
        .build()?,
        Op::post(
            "anf_volumes_resync_replication",
            "Resynchronize a broken replication relationship",
            volume_path!("/resyncReplication"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::post(
            "anf_volumes_delete_replication",
            "Delete the replication relationship of a volume",
            volume_path!("/deleteReplication"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::get(
            "anf_volumes_replication_status",
            "Get the status of a volume's replication relationship",
            volume_path!("/replicationStatus"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::post(
            "anf_volumes_list_replications",
            "List the replication relationships of a volume",
            volume_path!("/listReplications"),
        )
        .fields(common.volume_scope())
        .build()?,
    ])
}

fn relocation(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::post(
            "anf_volumes_relocate",
            "Relocate a volume to a new stamp",
            volume_path!("/relocate"),
        )
        .fields(common.volume_scope())
        .body_fields([Field::optional(
            "creationToken",
            "New creation token for the relocated volume",
            common.child_name(),
        )])
        .build()?,
        Op::post(
            "anf_volumes_finalize_relocation",
            "Finalize a relocation and clean up the old volume",
            volume_path!("/finalizeRelocation"),
        )
        .fields(common.volume_scope())
        .build()?,
        Op::post(
            "anf_volumes_revert_relocation",
            "Revert a relocation and delete the new volume",
            volume_path!("/revertRelocation"),
        )
        .fields(common.volume_scope())
        .build()?,
    ])
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    let mut operations = lifecycle(common)?;
    operations.extend(replication(common)?);
    operations.extend(relocation(common)?);
    Ok(operations)
}
