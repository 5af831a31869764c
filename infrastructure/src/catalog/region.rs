//! Region information, quota limits and name/path availability checks

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{CommonFields, Op, location_path, resource_id};

const RESOURCE_TYPES: [&str; 4] = [
    "Microsoft.NetApp/netAppAccounts",
    "Microsoft.NetApp/netAppAccounts/capacityPools",
    "Microsoft.NetApp/netAppAccounts/capacityPools/volumes",
    "Microsoft.NetApp/netAppAccounts/capacityPools/volumes/snapshots",
];

fn location_scope(common: &CommonFields) -> Vec<Field> {
    vec![common.subscription(), common.location()]
}

fn availability_fields() -> Vec<Field> {
    vec![
        Field::required("name", "Name to check", Schema::string().min_length(1)),
        Field::required(
            "type",
            "Resource type the name is for",
            Schema::enumeration(RESOURCE_TYPES),
        ),
        Field::required(
            "resourceGroup",
            "Resource group the resource would be created in",
            Schema::string().min_length(1).max_length(90),
        ),
    ]
}

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::get(
            "anf_region_info",
            "Get storage-to-network proximity and availability zone mappings for a region",
            location_path!("/regionInfos/default"),
        )
        .fields(location_scope(common))
        .build()?,
        Op::get(
            "anf_list_region_infos",
            "List region information entries for a region",
            location_path!("/regionInfos"),
        )
        .fields(location_scope(common))
        .build()?,
        Op::get(
            "anf_quota_limits",
            "List the default and current subscription quota limits in a region",
            location_path!("/quotaLimits"),
        )
        .fields(location_scope(common))
        .build()?,
        Op::get(
            "anf_get_quota_limit",
            "Get one subscription quota limit in a region",
            location_path!("/quotaLimits/{quotaLimitName}"),
        )
        .fields(location_scope(common))
        .field(common.quota_limit())
        .build()?,
        Op::post(
            "anf_check_name_availability",
            "Check whether a resource name is available",
            location_path!("/checkNameAvailability"),
        )
        .fields(location_scope(common))
        .body_fields(availability_fields())
        .build()?,
        Op::post(
            "anf_check_file_path_availability",
            "Check whether a volume file path (creation token) is available in a subnet",
            location_path!("/checkFilePathAvailability"),
        )
        .fields(location_scope(common))
        .body_fields([
            Field::required("name", "File path to check", common.child_name()),
            Field::required("subnetId", "Resource ID of the delegated subnet", resource_id()),
        ])
        .build()?,
        Op::post(
            "anf_check_quota_availability",
            "Check whether creating a resource would stay within quota",
            location_path!("/checkQuotaAvailability"),
        )
        .fields(location_scope(common))
        .body_fields(availability_fields())
        .build()?,
        Op::get(
            "anf_list_operations",
            "List the operations offered by the Microsoft.NetApp resource provider",
            "/providers/Microsoft.NetApp/operations",
        )
        .build()?,
    ])
}
