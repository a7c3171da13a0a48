use super::target::Target;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rule group as accepted by `/api/ruler/grafana/api/v1/rules/{namespace}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertGroup {
    pub name: String,
    pub interval: String,
    pub rules: Vec<AlertRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    #[serde(rename = "for")]
    pub for_duration: String,
    pub grafana_alert: GrafanaAlert,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrafanaAlert {
    pub title: String,
    pub condition: String,
    pub no_data_state: String,
    pub exec_err_state: String,
    pub data: Vec<AlertQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertQuery {
    #[serde(rename = "refId")]
    pub ref_id: String,
    #[serde(default)]
    pub query_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_range: Option<RelativeTimeRange>,
    pub datasource_uid: String,
    pub model: AlertModel,
}

/// Lookback window, in seconds before now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeTimeRange {
    pub from: u64,
    pub to: u64,
}

/// The query sent to the data source. Data source queries reuse the panel
/// target fields; expressions carry `type` and `conditions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertModel {
    #[serde(flatten)]
    pub query: Target,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<AlertCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub evaluator: AlertEvaluator,
    pub operator: TypeOnly,
    pub query: ParamsOnly,
    pub reducer: AlertReducer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvaluator {
    #[serde(rename = "type")]
    pub evaluator_type: String,
    pub params: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOnly {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsOnly {
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertReducer {
    #[serde(rename = "type")]
    pub reducer_type: String,
    #[serde(default)]
    pub params: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DatasourceRef;
    use serde_json::json;

    #[test]
    fn test_model_flattens_target_fields() {
        let model = AlertModel {
            query: Target {
                ref_id: "A".to_string(),
                expr: Some("up".to_string()),
                format: Some("time_series".to_string()),
                hide: Some(false),
                datasource: Some(DatasourceRef::uid("prometheus", "__FILL_ME__")),
                ..Default::default()
            },
            interval_ms: Some(15000),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({
                "refId": "A",
                "hide": false,
                "datasource": {"type": "prometheus", "uid": "__FILL_ME__"},
                "expr": "up",
                "format": "time_series",
                "intervalMs": 15000
            })
        );
    }

    #[test]
    fn test_rule_keys_are_snake_case() {
        let rule = AlertRule {
            for_duration: "5m".to_string(),
            grafana_alert: GrafanaAlert {
                title: "cpu".to_string(),
                condition: "A".to_string(),
                no_data_state: "NoData".to_string(),
                exec_err_state: "Alerting".to_string(),
                data: Vec::new(),
            },
            annotations: BTreeMap::new(),
            labels: BTreeMap::new(),
        };

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["for"], json!("5m"));
        assert_eq!(value["grafana_alert"]["no_data_state"], json!("NoData"));
        assert_eq!(value["grafana_alert"]["exec_err_state"], json!("Alerting"));
        assert!(value.get("labels").is_none());
    }
}
