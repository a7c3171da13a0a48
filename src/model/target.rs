use super::value::DatasourceRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A query attached to a panel.
///
/// Grafana does not tag targets with their family: the data source decides
/// how the fields are interpreted. Every family therefore shares this record
/// and only fills the fields it uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(rename = "refId", default)]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,

    // prometheus, loki
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_factor: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    // graphite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    // influxdb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_query: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_format: Option<String>,

    // cloudwatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_exact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_mode: Option<String>,

    // cloud monitoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series_list: Option<TimeSeriesList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_series_query: Option<TimeSeriesQuery>,
    #[serde(rename = "promQLQuery", default, skip_serializing_if = "Option::is_none")]
    pub promql_query: Option<PromQLQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slo_query: Option<SloQuery>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesList {
    pub project_name: String,
    /// Flattened `field, op, value` triples joined by `AND`.
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_bys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_series_reducer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_series_aligner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_cross_series_reducer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_per_series_aligner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_alignment_period: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_group_bys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesQuery {
    pub project_name: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_period: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromQLQuery {
    pub project_name: String,
    pub expr: String,
    pub step: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloQuery {
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slo_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_series_aligner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback_period: Option<String>,
}
