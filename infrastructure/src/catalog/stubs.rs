//! Registered operations with no backend yet; dispatch returns a placeholder

use anf_domain::{Field, OperationDefinition, Schema};

use super::common::{CommonFields, stub};

pub fn operations(common: &CommonFields) -> Vec<OperationDefinition> {
    let mut optional_scope: Vec<Field> = common
        .account_scope()
        .into_iter()
        .map(|mut field| {
            if field.name == "accountName" {
                field.required = false;
            }
            field
        })
        .collect();
    optional_scope.push(Field::optional(
        "days",
        "Look-back or forecast window in days",
        Schema::integer().minimum(1).maximum(365),
    ));

    vec![
        stub(
            "anf_cost_analysis",
            "Analyze storage cost by account, pool and service level",
            optional_scope.clone(),
        ),
        stub(
            "anf_security_assessment",
            "Assess encryption, export policy and network exposure of volumes",
            common.account_scope(),
        ),
        stub(
            "anf_compliance_report",
            "Report backup and snapshot policy coverage against a compliance baseline",
            common.account_scope(),
        ),
        stub(
            "anf_capacity_forecast",
            "Forecast pool and volume capacity exhaustion from usage trends",
            optional_scope,
        ),
    ]
}
