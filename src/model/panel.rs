use super::field::FieldConfig;
use super::target::Target;
use super::value::{is_false, DatasourceRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// === Core Types ===

/// Position of a panel in the 24-column dashboard grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub target_blank: bool,
}

/// A dashboard panel. Fields common to every kind live here, the rest is
/// carried by `kind` and flattened next to them, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub transparent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_direction: Option<String>,
    #[serde(default)]
    pub grid_pos: GridPos,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<PanelLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,
    #[serde(flatten)]
    pub kind: PanelKind,
}

impl Panel {
    pub fn new(title: impl Into<String>, kind: PanelKind) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: None,
            transparent: false,
            repeat: None,
            repeat_direction: None,
            grid_pos: GridPos::default(),
            datasource: None,
            links: Vec::new(),
            targets: Vec::new(),
            kind,
        }
    }

    pub fn panel_type(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_row(&self) -> bool {
        matches!(self.kind, PanelKind::Row(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PanelKind {
    Graph(GraphPanel),
    Timeseries(TimeseriesPanel),
    Stat(StatPanel),
    Singlestat(SinglestatPanel),
    Table(TablePanel),
    Text(TextPanel),
    Heatmap(HeatmapPanel),
    Logs(LogsPanel),
    Gauge(GaugePanel),
    Row(RowPanel),
}

impl PanelKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            PanelKind::Graph(_) => "graph",
            PanelKind::Timeseries(_) => "timeseries",
            PanelKind::Stat(_) => "stat",
            PanelKind::Singlestat(_) => "singlestat",
            PanelKind::Table(_) => "table",
            PanelKind::Text(_) => "text",
            PanelKind::Heatmap(_) => "heatmap",
            PanelKind::Logs(_) => "logs",
            PanelKind::Gauge(_) => "gauge",
            PanelKind::Row(_) => "row",
        }
    }
}

// === Legacy graph ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPanel {
    pub bars: bool,
    pub lines: bool,
    pub points: bool,
    pub fill: u32,
    pub linewidth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointradius: Option<f32>,
    pub null_point_mode: String,
    #[serde(default)]
    pub stepped_line: bool,
    #[serde(default)]
    pub stack: bool,
    pub legend: GraphLegend,
    pub tooltip: GraphTooltipOptions,
    #[serde(default)]
    pub alias_colors: BTreeMap<String, String>,
    pub yaxes: Vec<Axis>,
    pub xaxis: Axis,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series_overrides: Vec<SeriesOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLegend {
    pub show: bool,
    #[serde(default)]
    pub align_as_table: bool,
    #[serde(default)]
    pub right_side: bool,
    #[serde(default)]
    pub min: bool,
    #[serde(default)]
    pub max: bool,
    #[serde(default)]
    pub avg: bool,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub total: bool,
    #[serde(default)]
    pub values: bool,
    #[serde(default)]
    pub hide_empty: bool,
    #[serde(default)]
    pub hide_zero: bool,
}

// Grafana keeps `value_type` in snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTooltipOptions {
    pub shared: bool,
    pub sort: u8,
    pub value_type: String,
}

/// Legacy axis, used by graph and heatmap panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub format: String,
    pub show: bool,
    pub log_base: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            format: "short".to_string(),
            show: true,
            log_base: 1,
            min: None,
            max: None,
            decimals: None,
            label: None,
            mode: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesOverride {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<u32>,
}

// === Field based panels ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesPanel {
    pub options: TimeseriesOptions,
    pub field_config: FieldConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesOptions {
    pub legend: TimeseriesLegend,
    pub tooltip: TimeseriesTooltip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesLegend {
    pub display_mode: String,
    pub placement: String,
    #[serde(default)]
    pub calcs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesTooltip {
    pub mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReduceOptions {
    #[serde(default)]
    pub values: bool,
    #[serde(default)]
    pub fields: String,
    #[serde(default)]
    pub calcs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSizes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPanel {
    pub options: StatOptions,
    pub field_config: FieldConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatOptions {
    pub reduce_options: ReduceOptions,
    pub orientation: String,
    pub text_mode: String,
    pub color_mode: String,
    pub graph_mode: String,
    pub justify_mode: String,
    #[serde(default)]
    pub text: TextSizes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugePanel {
    pub options: GaugeOptions,
    pub field_config: FieldConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeOptions {
    pub reduce_options: ReduceOptions,
    pub orientation: String,
    pub show_threshold_labels: bool,
    pub show_threshold_markers: bool,
    #[serde(default)]
    pub text: TextSizes,
}

// === Legacy singlestat ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglestatPanel {
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    pub value_name: String,
    pub value_font_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix_font_size: Option<String>,
    #[serde(default)]
    pub color_value: bool,
    #[serde(default)]
    pub color_background: bool,
    #[serde(default)]
    pub thresholds: String,
    pub colors: Vec<String>,
    pub sparkline: Sparkline,
    pub mapping_type: u8,
    pub mapping_types: Vec<MappingType>,
    #[serde(default)]
    pub value_maps: Vec<ValueMap>,
    #[serde(default)]
    pub range_maps: Vec<RangeMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sparkline {
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub full: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingType {
    pub name: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMap {
    pub op: String,
    pub value: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeMap {
    pub from: String,
    pub to: String,
    pub text: String,
}

// === Legacy table ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePanel {
    pub styles: Vec<ColumnStyle>,
    pub transform: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<TableColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStyle {
    pub alias: String,
    pub pattern: String,
    #[serde(rename = "type")]
    pub style_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub text: String,
    pub value: String,
}

// === Text ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPanel {
    pub options: TextOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOptions {
    pub mode: String,
    pub content: String,
}

// === Legacy heatmap ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPanel {
    pub data_format: String,
    pub hide_zero_buckets: bool,
    pub highlight_cards: bool,
    #[serde(default)]
    pub reverse_y_buckets: bool,
    pub cards: HeatmapCards,
    pub color: HeatmapColor,
    pub legend: Toggle,
    pub tooltip: HeatmapTooltip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_decimals: Option<u32>,
    pub x_axis: Toggle,
    pub y_axis: Axis,
    pub y_bucket_bound: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCards {
    pub card_padding: Option<f64>,
    pub card_round: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapColor {
    pub card_color: String,
    pub color_scale: String,
    pub color_scheme: String,
    pub exponent: f64,
    pub mode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle {
    pub show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapTooltip {
    pub show: bool,
    pub show_histogram: bool,
}

// === Logs ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsPanel {
    pub options: LogsOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsOptions {
    pub show_time: bool,
    pub show_labels: bool,
    pub show_common_labels: bool,
    pub wrap_log_message: bool,
    pub prettify_log_message: bool,
    pub enable_log_details: bool,
    pub sort_order: String,
    pub dedup_strategy: String,
}

// === Row ===

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPanel {
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default = "default_show_title")]
    pub show_title: bool,
    /// Children of a collapsed row. Expanded rows keep their panels in the
    /// dashboard list right after the row.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panels: Vec<Panel>,
}

fn default_show_title() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_is_flattened_under_type() {
        let mut panel = Panel::new(
            "notes",
            PanelKind::Text(TextPanel {
                options: TextOptions {
                    mode: "markdown".to_string(),
                    content: "# hi".to_string(),
                },
            }),
        );
        panel.id = 3;
        panel.grid_pos = GridPos { x: 0, y: 0, w: 12, h: 8 };

        assert_eq!(
            serde_json::to_value(&panel).unwrap(),
            json!({
                "id": 3,
                "title": "notes",
                "type": "text",
                "gridPos": {"x": 0, "y": 0, "w": 12, "h": 8},
                "options": {"mode": "markdown", "content": "# hi"}
            })
        );
    }

    #[test]
    fn test_row_panel_round_trip() {
        let value = json!({
            "id": 1,
            "title": "Overview",
            "type": "row",
            "collapsed": true,
            "showTitle": true,
            "gridPos": {"x": 0, "y": 0, "w": 24, "h": 0}
        });

        let panel: Panel = serde_json::from_value(value.clone()).unwrap();
        assert!(panel.is_row());
        assert_eq!(panel.panel_type(), "row");
        assert_eq!(serde_json::to_value(&panel).unwrap(), value);
    }

    #[test]
    fn test_default_axis() {
        assert_eq!(
            serde_json::to_value(Axis::default()).unwrap(),
            json!({"format": "short", "show": true, "logBase": 1})
        );
    }
}
