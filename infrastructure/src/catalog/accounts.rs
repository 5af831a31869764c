//! NetApp account operations

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{CommonFields, Op, accounts_path, location_schema, tags};

fn account_body(create: bool) -> Schema {
    let location = if create {
        Field::required("location", "Azure region of the account", location_schema())
    } else {
        Field::optional("location", "Azure region of the account", location_schema())
    };
    Schema::object()
        .field(location)
        .field(tags())
        .field(Field::optional(
            "activeDirectories",
            "Active Directory connections (SMB / dual-protocol volumes)",
            Schema::array(Schema::object().open()),
        ))
        .field(Field::optional(
            "encryption",
            "Encryption settings (key source, key vault properties)",
            Schema::object().open(),
        ))
        .field(Field::optional(
            "identity",
            "Managed identity of the account",
            Schema::object().open(),
        ))
        .field(Field::optional(
            "nfsV4IDDomain",
            "NFSv4.1 ID domain",
            Schema::string().max_length(255),
        ))
        .field(Field::optional(
            "properties",
            "Raw ARM properties, merged with the flat fields",
            Schema::object().open(),
        ))
        .into()
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::get(
            "anf_accounts_list",
            "List NetApp accounts in a resource group",
            accounts_path!(""),
        )
        .fields(common.group_scope())
        .build()?,
        Op::get(
            "anf_accounts_list_by_subscription",
            "List NetApp accounts across the whole subscription",
            "/subscriptions/{subscriptionId}/providers/Microsoft.NetApp/netAppAccounts",
        )
        .field(common.subscription())
        .build()?,
        Op::get(
            "anf_accounts_get",
            "Get a NetApp account",
            accounts_path!("/{accountName}"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::put(
            "anf_accounts_create_or_update",
            "Create or replace a NetApp account",
            accounts_path!("/{accountName}"),
        )
        .fields(common.account_scope())
        .resource_body("Account definition", account_body(true))
        .build()?,
        Op::patch(
            "anf_accounts_update",
            "Patch an existing NetApp account",
            accounts_path!("/{accountName}"),
        )
        .fields(common.account_scope())
        .resource_body("Account fields to change", account_body(false))
        .build()?,
        Op::delete(
            "anf_accounts_delete",
            "Delete a NetApp account (it must contain no capacity pools)",
            accounts_path!("/{accountName}"),
        )
        .fields(common.account_scope())
        .build()?,
        Op::post(
            "anf_accounts_renew_credentials",
            "Renew the identity credentials of an account using a user-assigned identity",
            accounts_path!("/{accountName}/renewCredentials"),
        )
        .fields(common.account_scope())
        .build()?,
    ])
}
