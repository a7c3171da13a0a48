use super::axis::Axis;
use super::{build_alert, CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::alert::Alert;
use crate::error::ensure_range;
use crate::kernel::{Builder, ErrorSlot};
use crate::model::{self, GraphLegend, GraphPanel, GraphTooltipOptions, PanelKind};
use crate::Result;
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Bars,
    Lines,
    Points,
}

/// How null values are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullValue {
    AsZero,
    AsNull,
    Connected,
}

impl NullValue {
    pub fn as_str(self) -> &'static str {
        match self {
            NullValue::AsZero => "null as zero",
            NullValue::AsNull => "null",
            NullValue::Connected => "connected",
        }
    }
}

impl FromStr for NullValue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "as_zero" => Ok(NullValue::AsZero),
            "as_null" => Ok(NullValue::AsNull),
            "connected" => Ok(NullValue::Connected),
            other => Err(format!("unknown null value mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendOption {
    Hide,
    AsTable,
    ToTheRight,
    Min,
    Max,
    Avg,
    Current,
    Total,
    /// Hides series with only null values.
    NoNullSeries,
    /// Hides series with only zero values.
    NoZeroSeries,
}

impl FromStr for LegendOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hide" => Ok(LegendOption::Hide),
            "as_table" => Ok(LegendOption::AsTable),
            "to_the_right" => Ok(LegendOption::ToTheRight),
            "min" => Ok(LegendOption::Min),
            "max" => Ok(LegendOption::Max),
            "avg" => Ok(LegendOption::Avg),
            "current" => Ok(LegendOption::Current),
            "total" => Ok(LegendOption::Total),
            "no_null_series" => Ok(LegendOption::NoNullSeries),
            "no_zero_series" => Ok(LegendOption::NoZeroSeries),
            other => Err(format!("unknown legend option '{}'", other)),
        }
    }
}

/// Per-series display overrides, matched by alias.
#[derive(Debug)]
pub struct SeriesOverride {
    series: model::SeriesOverride,
    errors: ErrorSlot,
}

impl Builder for SeriesOverride {}

impl SeriesOverride {
    /// `alias` is a series name or a `/regex/`.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            series: model::SeriesOverride {
                alias: alias.into(),
                ..Default::default()
            },
            errors: ErrorSlot::default(),
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.series.color = Some(color.into());
        self
    }

    pub fn dashes(mut self, enabled: bool) -> Self {
        self.series.dashes = Some(enabled);
        self
    }

    pub fn lines(mut self, enabled: bool) -> Self {
        self.series.lines = Some(enabled);
        self
    }

    pub fn fill(mut self, fill: u32) -> Self {
        let resource = format!("series override '{}'", self.series.alias);
        self.series.fill = self.errors.take(ensure_range(&resource, "fill", fill, 0, 10));
        self
    }

    pub fn line_width(mut self, width: u32) -> Self {
        let resource = format!("series override '{}'", self.series.alias);
        self.series.linewidth = self
            .errors
            .take(ensure_range(&resource, "linewidth", width, 0, 10));
        self
    }

    fn build(self) -> Result<model::SeriesOverride> {
        self.errors.into_result()?;
        Ok(self.series)
    }
}

/// Legacy graph panel.
#[derive(Debug)]
pub struct Graph {
    base: PanelBase,
    graph: GraphPanel,
    alert: Option<Alert>,
}

impl Builder for Graph {}

impl CommonOptions for Graph {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for Graph {}

impl Graph {
    pub fn new(title: impl Into<String>) -> Self {
        let hidden = model::Axis {
            show: false,
            ..Default::default()
        };

        Self {
            base: PanelBase::new("graph", title),
            graph: GraphPanel {
                bars: false,
                lines: true,
                points: false,
                fill: 1,
                linewidth: 1,
                pointradius: None,
                null_point_mode: NullValue::AsZero.as_str().to_string(),
                stepped_line: false,
                stack: false,
                legend: GraphLegend {
                    show: true,
                    ..Default::default()
                },
                tooltip: GraphTooltipOptions {
                    shared: true,
                    sort: 2,
                    value_type: "individual".to_string(),
                },
                alias_colors: BTreeMap::new(),
                yaxes: vec![model::Axis::default(), hidden],
                xaxis: model::Axis {
                    mode: Some("time".to_string()),
                    ..Default::default()
                },
                series_overrides: Vec::new(),
            },
            alert: None,
        }
        .span(6.0)
    }

    pub fn draw(mut self, modes: &[DrawMode]) -> Self {
        self.graph.bars = modes.contains(&DrawMode::Bars);
        self.graph.lines = modes.contains(&DrawMode::Lines);
        self.graph.points = modes.contains(&DrawMode::Points);
        self
    }

    pub fn null(mut self, mode: NullValue) -> Self {
        self.graph.null_point_mode = mode.as_str().to_string();
        self
    }

    /// Area fill, `0..=10`.
    pub fn fill(mut self, fill: u32) -> Self {
        let resource = self.base.resource();
        if let Some(fill) = self.base.take(ensure_range(&resource, "fill", fill, 0, 10)) {
            self.graph.fill = fill;
        }
        self
    }

    pub fn line_width(mut self, width: u32) -> Self {
        let resource = self.base.resource();
        if let Some(width) = self
            .base
            .take(ensure_range(&resource, "linewidth", width, 0, 10))
        {
            self.graph.linewidth = width;
        }
        self
    }

    pub fn point_radius(mut self, radius: f32) -> Self {
        let resource = self.base.resource();
        if let Some(radius) = self
            .base
            .take(ensure_range(&resource, "pointradius", radius, 0.0, 10.0))
        {
            self.graph.pointradius = Some(radius);
        }
        self
    }

    pub fn staircase(mut self) -> Self {
        self.graph.stepped_line = true;
        self
    }

    pub fn stack(mut self) -> Self {
        self.graph.stack = true;
        self
    }

    pub fn legend(mut self, options: &[LegendOption]) -> Self {
        let legend = &mut self.graph.legend;
        for option in options {
            match option {
                LegendOption::Hide => legend.show = false,
                LegendOption::AsTable => legend.align_as_table = true,
                LegendOption::ToTheRight => legend.right_side = true,
                LegendOption::Min => legend.min = true,
                LegendOption::Max => legend.max = true,
                LegendOption::Avg => legend.avg = true,
                LegendOption::Current => legend.current = true,
                LegendOption::Total => legend.total = true,
                LegendOption::NoNullSeries => legend.hide_empty = true,
                LegendOption::NoZeroSeries => legend.hide_zero = true,
            }
        }
        legend.values = legend.min || legend.max || legend.avg || legend.current || legend.total;
        self
    }

    pub fn left_y_axis(mut self, axis: Axis) -> Self {
        if let Some(axis) = self.base.take(axis.build()) {
            self.graph.yaxes[0] = axis;
        }
        self
    }

    pub fn right_y_axis(mut self, axis: Axis) -> Self {
        if let Some(axis) = self.base.take(axis.build()) {
            self.graph.yaxes[1] = axis;
        }
        self
    }

    pub fn x_axis(mut self, axis: Axis) -> Self {
        if let Some(mut axis) = self.base.take(axis.build()) {
            axis.mode = Some("time".to_string());
            self.graph.xaxis = axis;
        }
        self
    }

    pub fn series_override(mut self, series: SeriesOverride) -> Self {
        if let Some(series) = self.base.take(series.build()) {
            self.graph.series_overrides.push(series);
        }
        self
    }

    pub fn alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

impl IntoPanel for Graph {
    fn into_panel(self) -> Result<PanelDraft> {
        let alert = build_alert(self.alert, self.base.datasource_name())?;
        let panel = self.base.finish(PanelKind::Graph(self.graph))?;
        Ok(PanelDraft { panel, alert })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{Evaluator, Reducer};
    use crate::target::Prometheus;
    use crate::Error;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let draft = Graph::new("cpu").into_panel().unwrap();
        let value = serde_json::to_value(&draft.panel).unwrap();

        assert_eq!(value["type"], json!("graph"));
        assert_eq!(value["gridPos"]["w"], json!(12));
        assert_eq!(value["lines"], json!(true));
        assert_eq!(value["bars"], json!(false));
        assert_eq!(value["fill"], json!(1));
        assert_eq!(value["linewidth"], json!(1));
        assert_eq!(value["nullPointMode"], json!("null as zero"));
        assert_eq!(
            value["tooltip"],
            json!({"shared": true, "sort": 2, "value_type": "individual"})
        );
        assert_eq!(value["aliasColors"], json!({}));
        assert_eq!(value["yaxes"][1]["show"], json!(false));
        assert_eq!(value["xaxis"]["mode"], json!("time"));
        assert!(draft.alert.is_none());
    }

    #[test]
    fn test_draw_and_legend() {
        let draft = Graph::new("cpu")
            .draw(&[DrawMode::Bars, DrawMode::Points])
            .legend(&[LegendOption::AsTable, LegendOption::Max, LegendOption::NoZeroSeries])
            .staircase()
            .stack()
            .null(NullValue::Connected)
            .into_panel()
            .unwrap();

        let PanelKind::Graph(graph) = draft.panel.kind else {
            panic!("not a graph");
        };
        assert!(graph.bars && graph.points && !graph.lines);
        assert!(graph.legend.align_as_table);
        assert!(graph.legend.max && graph.legend.values);
        assert!(graph.legend.hide_zero);
        assert!(graph.stepped_line && graph.stack);
        assert_eq!(graph.null_point_mode, "connected");
    }

    #[test]
    fn test_range_validation() {
        assert!(Graph::new("cpu").fill(11).into_panel().is_err());
        assert!(Graph::new("cpu").line_width(11).into_panel().is_err());
        assert!(Graph::new("cpu").point_radius(10.5).into_panel().is_err());
        assert!(Graph::new("cpu")
            .series_override(SeriesOverride::new("/errors/").fill(12))
            .into_panel()
            .is_err());
    }

    #[test]
    fn test_axes_and_overrides() {
        let draft = Graph::new("memory")
            .left_y_axis(Axis::new().unit("bytes").min(0.0))
            .right_y_axis(Axis::new().hide())
            .series_override(
                SeriesOverride::new("/free/")
                    .color("green")
                    .dashes(true)
                    .line_width(2),
            )
            .into_panel()
            .unwrap();

        let value = serde_json::to_value(&draft.panel).unwrap();
        assert_eq!(value["yaxes"][0]["format"], json!("bytes"));
        assert_eq!(value["yaxes"][0]["min"], json!(0.0));
        assert_eq!(
            value["seriesOverrides"],
            json!([{"alias": "/free/", "color": "green", "dashes": true, "linewidth": 2}])
        );
    }

    #[test]
    fn test_invalid_axis_is_forwarded() {
        let result = Graph::new("cpu").left_y_axis(Axis::new().log_base(7)).into_panel();
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_alert_uses_panel_datasource() {
        let draft = Graph::new("cpu")
            .datasource("prom-main")
            .with_target(Prometheus::new("avg(cpu)").ref_id("A"))
            .alert(
                Alert::new("cpu")
                    .with_query(crate::alert::query::Prometheus::new("A", "avg(cpu)"))
                    .if_(Reducer::Avg, "A", Evaluator::IsAbove(0.9)),
            )
            .into_panel()
            .unwrap();

        let group = draft.alert.unwrap();
        assert_eq!(group.rules[0].grafana_alert.data[1].datasource_uid, "prom-main");
    }
}
