//! Dashboard builder and the built dashboard handle.

mod layout;
mod links;
mod time;

pub use layout::GRID_WIDTH;
pub use links::{DashboardLink, ExternalLink, LinkIcon};

use crate::alert::link_to_panel;
use crate::error::ensure_range;
use crate::kernel::{Builder, ErrorSlot};
use crate::model::{
    AlertGroup, Annotation, Board, DatasourceRef, GraphTooltip, Refresh, Time, Timepicker,
};
use crate::row::{Row, RowDraft};
use crate::variable::IntoVariable;
use crate::{Error, Result};
use ringlog::*;
use std::collections::HashSet;
use std::str::FromStr;

const DEFAULT_ANNOTATION_COLOR: &str = "#5794F2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timezone {
    /// Follows the user's preference.
    #[default]
    Default,
    Utc,
    Browser,
}

impl Timezone {
    pub fn as_str(self) -> &'static str {
        match self {
            Timezone::Default => "",
            Timezone::Utc => "utc",
            Timezone::Browser => "browser",
        }
    }
}

impl FromStr for Timezone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "default" | "" => Ok(Timezone::Default),
            "utc" => Ok(Timezone::Utc),
            "browser" => Ok(Timezone::Browser),
            other => Err(format!("unknown timezone '{}'", other)),
        }
    }
}

/// Annotations fetched from a data source and filtered by tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsAnnotation {
    pub name: String,
    pub datasource: String,
    pub icon_color: String,
    pub tags: Vec<String>,
}

impl TagsAnnotation {
    fn into_model(self) -> Annotation {
        Annotation {
            name: self.name,
            datasource: Some(DatasourceRef::name(self.datasource)),
            enable: true,
            hide: false,
            icon_color: self.icon_color,
            expr: None,
            tags: self.tags,
            annotation_type: "tags".to_string(),
        }
    }
}

/// A built dashboard, ready to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    board: Board,
    alerts: Vec<AlertGroup>,
}

impl Dashboard {
    pub fn builder(title: impl Into<String>) -> DashboardBuilder {
        DashboardBuilder::new(title)
    }

    /// Wraps a dashboard model previously exported from Grafana.
    pub fn from_json(json: &str) -> Result<Self> {
        let board = serde_json::from_str(json)?;
        Ok(Self {
            board,
            alerts: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Alert groups defined on the dashboard's panels.
    pub fn alerts(&self) -> &[AlertGroup] {
        &self.alerts
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.board)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.board)?)
    }
}

#[derive(Debug)]
pub struct DashboardBuilder {
    board: Board,
    rows: Vec<RowDraft>,
    errors: ErrorSlot,
}

impl Builder for DashboardBuilder {}

impl DashboardBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        let mut board = Board::new(title);
        board.timepicker = Timepicker {
            hidden: false,
            refresh_intervals: ["5s", "10s", "30s", "1m", "5m", "15m", "30m", "1h", "2h", "1d"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            time_options: ["5m", "15m", "1h", "6h", "12h", "24h", "2d", "7d", "30d"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Self {
            board,
            rows: Vec::new(),
            errors: ErrorSlot::default(),
        }
        .time("now-3h", "now")
        .shared_crosshair()
        .editable()
        .timezone(Timezone::Default)
    }

    fn resource(&self) -> String {
        format!("dashboard '{}'", self.board.title)
    }

    /// Globally unique identifier, 8 to 40 characters.
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        let uid = uid.into();
        let resource = self.resource();
        if self.errors.take(time::validate_uid(&resource, &uid)).is_some() {
            self.board.uid = Some(uid);
        }
        self
    }

    pub fn id(mut self, id: u64) -> Self {
        self.board.id = Some(id);
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.board.slug = Some(slug.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.board.description = Some(description.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.board.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn tags_annotation(mut self, annotation: TagsAnnotation) -> Self {
        self.board.annotations.list.push(annotation.into_model());
        self
    }

    /// Tags annotation using the default icon color.
    pub fn annotation<I, S>(
        self,
        name: impl Into<String>,
        datasource: impl Into<String>,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_annotation(TagsAnnotation {
            name: name.into(),
            datasource: datasource.into(),
            icon_color: DEFAULT_ANNOTATION_COLOR.to_string(),
            tags: tags.into_iter().map(Into::into).collect(),
        })
    }

    pub fn timezone(mut self, timezone: Timezone) -> Self {
        self.board.timezone = timezone.as_str().to_string();
        self
    }

    /// Refresh interval, e.g. `30s`.
    pub fn auto_refresh(mut self, interval: impl Into<String>) -> Self {
        self.board.refresh = Some(Refresh::Interval(interval.into()));
        self
    }

    /// Default time range, relative (`now-6h`) or RFC 3339.
    pub fn time(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let (from, to) = (from.into(), to.into());
        let resource = self.resource();
        let valid = self
            .errors
            .take(time::validate_time(&resource, "time.from", &from))
            .and_then(|_| self.errors.take(time::validate_time(&resource, "time.to", &to)));
        if valid.is_some() {
            self.board.time = Time { from, to };
        }
        self
    }

    pub fn editable(mut self) -> Self {
        self.board.editable = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.board.editable = false;
        self
    }

    pub fn default_tooltip(mut self) -> Self {
        self.board.graph_tooltip = GraphTooltip::Default;
        self
    }

    pub fn shared_crosshair(mut self) -> Self {
        self.board.graph_tooltip = GraphTooltip::SharedCrosshair;
        self
    }

    pub fn shared_tooltip(mut self) -> Self {
        self.board.graph_tooltip = GraphTooltip::SharedTooltip;
        self
    }

    pub fn hide_variables(mut self) -> Self {
        self.board.hide_controls = true;
        self
    }

    pub fn hide_time_picker(mut self) -> Self {
        self.board.timepicker.hidden = true;
        self
    }

    /// First day of the week, e.g. `monday`.
    pub fn week_start(mut self, day: impl Into<String>) -> Self {
        self.board.week_start = Some(day.into());
        self
    }

    /// Month the fiscal year starts, 0 for January.
    pub fn fiscal_year_start_month(mut self, month: u8) -> Self {
        let resource = self.resource();
        if let Some(month) =
            self.errors
                .take(ensure_range(&resource, "fiscalYearStartMonth", month, 0, 11))
        {
            self.board.fiscal_year_start_month = Some(month);
        }
        self
    }

    /// Streams new data as it arrives.
    pub fn live_now(mut self) -> Self {
        self.board.live_now = Some(true);
        self
    }

    pub fn row(mut self, row: Row) -> Self {
        if let Some(draft) = self.errors.take(row.build()) {
            self.rows.push(draft);
        }
        self
    }

    pub fn variable(mut self, variable: impl IntoVariable) -> Self {
        if let Some(var) = self.errors.take(variable.into_variable()) {
            self.board.templating.list.push(var);
        }
        self
    }

    pub fn external_link(mut self, link: ExternalLink) -> Self {
        self.board.links.push(link.into_model());
        self
    }

    pub fn dashboard_link(mut self, link: DashboardLink) -> Self {
        self.board.links.push(link.into_model());
        self
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.errors.is_err()
    }

    /// Lays out the panels and links the panel alerts to the dashboard.
    pub fn build(self) -> Result<Dashboard> {
        let DashboardBuilder {
            mut board,
            rows,
            errors,
        } = self;
        errors.into_result()?;

        let mut names = HashSet::new();
        for var in &board.templating.list {
            if !names.insert(var.name.as_str()) {
                return Err(Error::invalid(
                    format!("dashboard '{}'", board.title),
                    "name",
                    &var.name,
                    "defined more than once",
                ));
            }
        }

        let layout = layout::layout(rows);
        board.panels = layout.panels;

        let mut alerts = Vec::with_capacity(layout.alerts.len());
        for (panel_id, mut group) in layout.alerts {
            link_to_panel(&mut group, panel_id, board.uid.as_deref());
            alerts.push(group);
        }

        debug!(
            "built dashboard '{}' with {} panels and {} alerts",
            board.title,
            board.panels.len(),
            alerts.len()
        );

        Ok(Dashboard { board, alerts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{Alert, Evaluator, Reducer};
    use crate::panel::{CommonOptions, Gauge, Graph, Text, TimeSeries, WithTargets};
    use crate::target::Prometheus;
    use crate::variable::{Custom, Query};
    use crate::model::ThresholdStep;
    use crate::Error;
    use serde_json::json;

    fn to_value(dashboard: &Dashboard) -> serde_json::Value {
        serde_json::from_str(&dashboard.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = DashboardBuilder::new("Hello").build().unwrap();
        let value = to_value(&dashboard);

        assert_eq!(value["title"], json!("Hello"));
        assert_eq!(value["editable"], json!(true));
        assert!(value.get("schemaVersion").is_some());
        assert_eq!(value["panels"], json!([]));
        assert_eq!(value["templating"], json!({"list": []}));
        assert_eq!(value["graphTooltip"], json!(1));
        assert_eq!(value["time"], json!({"from": "now-3h", "to": "now"}));
        assert_eq!(value["timezone"], json!(""));
        assert_eq!(value["timepicker"]["refresh_intervals"][0], json!("5s"));
        assert_eq!(value["timepicker"]["time_options"][8], json!("30d"));
        assert!(value.get("refresh").is_none());
    }

    #[test]
    fn test_single_row_single_graph() {
        let dashboard = DashboardBuilder::new("d")
            .row(Row::new("r").with_panel(
                Graph::new("g").with_target(Prometheus::new("up").legend("{{job}}")),
            ))
            .build()
            .unwrap();
        let value = to_value(&dashboard);

        let panels = value["panels"].as_array().unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0]["type"], json!("row"));
        assert_eq!(panels[0]["title"], json!("r"));
        assert_eq!(panels[1]["type"], json!("graph"));
        assert_eq!(panels[1]["id"], json!(2));
        let target = &panels[1]["targets"][0];
        assert_eq!(target["refId"], json!("A"));
        assert_eq!(target["expr"], json!("up"));
        assert_eq!(target["legendFormat"], json!("{{job}}"));
    }

    #[test]
    fn test_threshold_stepped_gauge() {
        let dashboard = DashboardBuilder::new("d")
            .row(Row::new("r").with_panel(Gauge::new("g").absolute_thresholds(vec![
                ThresholdStep::base("green"),
                ThresholdStep::at("orange", 80.0),
                ThresholdStep::at("red", 90.0),
            ])))
            .build()
            .unwrap();
        let value = to_value(&dashboard);

        let thresholds = &value["panels"][1]["fieldConfig"]["defaults"]["thresholds"];
        assert_eq!(thresholds["mode"], json!("absolute"));
        assert_eq!(thresholds["steps"][0], json!({"color": "green", "value": null}));
        assert_eq!(thresholds["steps"][1], json!({"color": "orange", "value": 80.0}));
        assert_eq!(thresholds["steps"][2], json!({"color": "red", "value": 90.0}));
    }

    #[test]
    fn test_general_settings() {
        let dashboard = DashboardBuilder::new("d")
            .uid("service-overview")
            .id(42)
            .slug("service-overview")
            .description("all the things")
            .tags(["api", "generated"])
            .timezone(Timezone::Utc)
            .auto_refresh("30s")
            .time("now-6h", "now")
            .read_only()
            .shared_tooltip()
            .hide_variables()
            .hide_time_picker()
            .week_start("monday")
            .fiscal_year_start_month(3)
            .live_now()
            .annotation("deploys", "loki", ["deploy"])
            .variable(Query::new("job").request("label_values(up, job)"))
            .variable(Custom::new("env").values([("prod", "prod")]))
            .external_link(ExternalLink::new("Runbook", "https://runbooks"))
            .dashboard_link(DashboardLink::new("Related").tags(["api"]))
            .build()
            .unwrap();
        let value = to_value(&dashboard);

        assert_eq!(value["uid"], json!("service-overview"));
        assert_eq!(value["id"], json!(42));
        assert_eq!(value["tags"], json!(["api", "generated"]));
        assert_eq!(value["timezone"], json!("utc"));
        assert_eq!(value["refresh"], json!("30s"));
        assert_eq!(value["time"], json!({"from": "now-6h", "to": "now"}));
        assert_eq!(value["editable"], json!(false));
        assert_eq!(value["graphTooltip"], json!(2));
        assert_eq!(value["hideControls"], json!(true));
        assert_eq!(value["timepicker"]["hidden"], json!(true));
        assert_eq!(value["weekStart"], json!("monday"));
        assert_eq!(value["fiscalYearStartMonth"], json!(3));
        assert_eq!(value["liveNow"], json!(true));
        assert_eq!(
            value["annotations"]["list"][0],
            json!({
                "name": "deploys",
                "datasource": "loki",
                "enable": true,
                "iconColor": "#5794F2",
                "tags": ["deploy"],
                "type": "tags"
            })
        );
        assert_eq!(value["templating"]["list"][1]["name"], json!("env"));
        assert_eq!(value["links"][0]["type"], json!("link"));
        assert_eq!(value["links"][1]["type"], json!("dashboards"));
    }

    #[test]
    fn test_invalid_settings() {
        match DashboardBuilder::new("d").uid("tiny").build() {
            Err(Error::InvalidArgument { field, value, .. }) => {
                assert_eq!(field, "uid");
                assert_eq!(value, "tiny");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        match DashboardBuilder::new("d").time("now-6h", "tomorrow").build() {
            Err(Error::InvalidArgument { field, .. }) => assert_eq!(field, "time.to"),
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(DashboardBuilder::new("d")
            .fiscal_year_start_month(12)
            .build()
            .is_err());
    }

    #[test]
    fn test_duplicate_variable_names() {
        let result = DashboardBuilder::new("d")
            .variable(Query::new("job").request("label_values(up, job)"))
            .variable(Custom::new("env").values([("prod", "prod")]))
            .variable(Query::new("job").request("label_values(job)"))
            .build();
        match result {
            Err(Error::InvalidArgument { field, value, reason, .. }) => {
                assert_eq!(field, "name");
                assert_eq!(value, "job");
                assert_eq!(reason, "defined more than once");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_first_error_wins() {
        let result = DashboardBuilder::new("d")
            .row(Row::new("r").with_panel(Text::new("t").span(20.0)))
            .uid("x")
            .build();
        match result {
            Err(Error::InvalidArgument { field, .. }) => assert_eq!(field, "span"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_panel_alerts_are_linked() {
        let alert = Alert::new("high latency")
            .with_query(crate::alert::query::Prometheus::new("A", "histogram_quantile(0.99, x)"))
            .if_(Reducer::Avg, "A", Evaluator::IsAbove(0.5));

        let dashboard = DashboardBuilder::new("d")
            .uid("latency-board")
            .row(
                Row::new("r")
                    .with_panel(Text::new("notes"))
                    .with_panel(TimeSeries::new("latency").datasource("prom").alert(alert)),
            )
            .build()
            .unwrap();

        assert_eq!(dashboard.alerts().len(), 1);
        let rule = &dashboard.alerts()[0].rules[0];
        assert_eq!(rule.annotations.get("__panelId__").map(String::as_str), Some("3"));
        assert_eq!(
            rule.annotations.get("__dashboardUid__").map(String::as_str),
            Some("latency-board")
        );
        let query = rule
            .grafana_alert
            .data
            .iter()
            .find(|q| q.ref_id == "A")
            .unwrap();
        assert_eq!(query.datasource_uid, "prom");
    }

    #[test]
    fn test_from_json_round_trip() {
        let dashboard = DashboardBuilder::new("d")
            .row(Row::new("r").with_panel(Text::new("notes").markdown("# hi")))
            .build()
            .unwrap();

        let decoded = Dashboard::from_json(&dashboard.to_json_pretty().unwrap()).unwrap();
        assert_eq!(decoded.board(), dashboard.board());
    }
}
