use super::panel::Panel;
use super::value::{is_false, DatasourceRef, GraphTooltip, Refresh};
use super::variable::TemplateVar;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 36;

/// A dashboard, as found in the `dashboard` field of `/api/dashboards/db`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub graph_tooltip: GraphTooltip,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide_controls: bool,
    pub time: Time,
    #[serde(default)]
    pub timepicker: Timepicker,
    #[serde(default)]
    pub templating: Templating,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<Refresh>,
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year_start_month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_now: Option<bool>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl Board {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            uid: None,
            slug: None,
            title: title.into(),
            description: None,
            tags: Vec::new(),
            timezone: String::new(),
            editable: true,
            graph_tooltip: GraphTooltip::Default,
            hide_controls: false,
            time: Time {
                from: "now-6h".to_string(),
                to: "now".to_string(),
            },
            timepicker: Timepicker::default(),
            templating: Templating::default(),
            annotations: Annotations::default(),
            refresh: None,
            schema_version: SCHEMA_VERSION,
            version: None,
            fiscal_year_start_month: None,
            week_start: None,
            live_now: None,
            links: Vec::new(),
            panels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub from: String,
    pub to: String,
}

// Grafana keeps the snake_case keys here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timepicker {
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    #[serde(default)]
    pub refresh_intervals: Vec<String>,
    #[serde(default)]
    pub time_options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Templating {
    #[serde(default)]
    pub list: Vec<TemplateVar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub list: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(default)]
    pub enable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide: bool,
    #[serde(default)]
    pub icon_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub annotation_type: String,
}

/// Dashboard-level link, either to an URL (`link`) or to tagged dashboards
/// (`dashboards`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub title: String,
    #[serde(rename = "type")]
    pub link_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub as_dropdown: bool,
    #[serde(default)]
    pub include_vars: bool,
    #[serde(default)]
    pub keep_time: bool,
    #[serde(default)]
    pub target_blank: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_board_shape() {
        let board = Board::new("Hello");
        let value = serde_json::to_value(&board).unwrap();

        assert_eq!(value["title"], json!("Hello"));
        assert_eq!(value["editable"], json!(true));
        assert_eq!(value["schemaVersion"], json!(SCHEMA_VERSION));
        assert_eq!(value["graphTooltip"], json!(0));
        assert_eq!(value["time"], json!({"from": "now-6h", "to": "now"}));
        assert_eq!(value["templating"], json!({"list": []}));
        assert_eq!(value["panels"], json!([]));
        assert!(value.get("refresh").is_none());
        assert!(value.get("uid").is_none());
    }

    #[test]
    fn test_board_decodes_minimal_document() {
        let board: Board = serde_json::from_value(json!({
            "title": "From Grafana",
            "time": {"from": "now-1h", "to": "now"},
            "schemaVersion": 30,
            "refresh": false
        }))
        .unwrap();

        assert_eq!(board.title, "From Grafana");
        assert_eq!(board.refresh, Some(Refresh::Flag(false)));
        assert!(board.panels.is_empty());
    }
}
