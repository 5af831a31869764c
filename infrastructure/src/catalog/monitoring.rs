//! Azure Monitor metrics for volumes

use anf_domain::{DomainError, Field, OperationDefinition, Schema};

use super::common::{CommonFields, METRICS_API_VERSION, Op, volume_path};

const METRIC_NAMES: [&str; 10] = [
    "VolumeLogicalSize",
    "VolumeConsumedSizePercentage",
    "VolumeSnapshotSize",
    "AverageReadLatency",
    "AverageWriteLatency",
    "ReadIops",
    "WriteIops",
    "ReadThroughput",
    "WriteThroughput",
    "TotalThroughput",
];

const AGGREGATIONS: [&str; 5] = ["Average", "Minimum", "Maximum", "Total", "Count"];

pub fn operations(common: &CommonFields) -> Result<Vec<OperationDefinition>, DomainError> {
    Ok(vec![
        Op::get(
            "anf_volume_metrics",
            "Query Azure Monitor metrics (latency, IOPS, throughput, size) for a volume",
            volume_path!("/providers/Microsoft.Insights/metrics"),
        )
        .api_version(METRICS_API_VERSION)
        .fields(common.volume_scope())
        .query(
            "metricnames",
            Field::required("metricName", "Metric to query", Schema::enumeration(METRIC_NAMES)),
        )
        .query(
            "timespan",
            Field::optional(
                "timespan",
                "ISO 8601 interval, e.g. 2025-06-01T00:00:00Z/2025-06-02T00:00:00Z",
                Schema::string().min_length(1),
            ),
        )
        .query(
            "interval",
            Field::optional(
                "interval",
                "ISO 8601 grain, e.g. PT1H",
                Schema::string().min_length(1),
            ),
        )
        .query(
            "aggregation",
            Field::optional("aggregation", "Aggregation type", Schema::enumeration(AGGREGATIONS))
                .with_default("Average"),
        )
        .build()?,
    ])
}
