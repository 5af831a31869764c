//! Capacity pool operations

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{
    CommonFields, Op, POOL_MAX_SIZE, POOL_MIN_SIZE, account_path, location_schema, service_level,
    tags,
};

/// Flat pool body; `size` is in bytes and has a 4 TiB floor
fn pool_body(create: bool) -> Schema {
    let size = Schema::integer().minimum(POOL_MIN_SIZE).maximum(POOL_MAX_SIZE);
    let (location, level, size) = if create {
        (
            Field::required("location", "Azure region of the pool", location_schema()),
            Field::required("serviceLevel", "Performance tier", service_level()),
            Field::required("size", "Provisioned size in bytes (minimum 4 TiB)", size),
        )
    } else {
        (
            Field::optional("location", "Azure region of the pool", location_schema()),
            Field::optional("serviceLevel", "Performance tier", service_level()),
            Field::optional("size", "Provisioned size in bytes (minimum 4 TiB)", size),
        )
    };

    Schema::object()
        .field(location)
        .field(level)
        .field(size)
        .field(tags())
        .field(Field::optional(
            "qosType",
            "Quality of service type",
            Schema::enumeration(["Auto", "Manual"]),
        ))
        .field(Field::optional(
            "coolAccess",
            "Enable cool access tiering for volumes in the pool",
            Schema::Boolean,
        ))
        .field(Field::optional(
            "encryptionType",
            "Encryption type of the pool",
            Schema::enumeration(["Single", "Double"]),
        ))
        .into()
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::get(
            "anf_pools_list",
            "List capacity pools in a NetApp account",
            account_path!("/capacityPools"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::get(
            "anf_pools_get",
            "Get a capacity pool",
            account_path!("/capacityPools/{poolName}"),
        )
        .fields(common.pool_scope())
        .build()?,
        Op::put(
            "anf_pools_create_or_update",
            "Create or replace a capacity pool",
            account_path!("/capacityPools/{poolName}"),
        )
        .fields(common.pool_scope())
        .resource_body("Pool definition", pool_body(true))
        .build()?,
        Op::patch(
            "anf_pools_update",
            "Patch a capacity pool (resize, change QoS or tags)",
            account_path!("/capacityPools/{poolName}"),
        )
        .fields(common.pool_scope())
        .resource_body("Pool fields to change", pool_body(false))
        .build()?,
        Op::delete(
            "anf_pools_delete",
            "Delete a capacity pool (it must contain no volumes)",
            account_path!("/capacityPools/{poolName}"),
        )
        .fields(common.pool_scope())
        .build()?,
    ])
}
