use super::scheme::ColorScheme;
use super::threshold::thresholds;
use super::{build_alert, CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::alert::Alert;
use crate::error::ensure_range;
use crate::kernel::Builder;
use crate::model::{
    FieldConfig, FieldDefaults, FieldMatcher, FieldOverride, OverrideProperty, PanelKind,
    ScaleDistribution, SeriesCustom, Stacking, ThresholdMode, ThresholdStep, ThresholdsStyle,
    TimeseriesLegend, TimeseriesOptions, TimeseriesPanel, TimeseriesTooltip,
};
use crate::Result;
use serde_json::json;
use std::str::FromStr;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)*
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }
    };
}

wire_enum!(
    /// Interpolation between two points of a line.
    LineInterpolation {
        Linear => "linear",
        Smooth => "smooth",
        StepBefore => "stepBefore",
        StepAfter => "stepAfter",
    }
);

wire_enum!(
    GradientMode {
        None => "none",
        Opacity => "opacity",
        Hue => "hue",
        Scheme => "scheme",
    }
);

wire_enum!(
    TooltipMode {
        Single => "single",
        Multi => "multi",
        None => "none",
    }
);

wire_enum!(
    StackMode {
        None => "none",
        Normal => "normal",
        Percent => "percent",
    }
);

wire_enum!(
    AxisPlacement {
        Hidden => "hidden",
        Auto => "auto",
        Left => "left",
        Right => "right",
    }
);

wire_enum!(
    /// How thresholds are drawn on the graph.
    ThresholdsDisplay {
        Off => "off",
        Area => "area",
        Line => "line",
        LineAndArea => "line+area",
    }
);

/// Position of a bar relative to its data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAlignment {
    Before,
    Center,
    After,
}

impl BarAlignment {
    fn as_i8(self) -> i8 {
        match self {
            BarAlignment::Before => -1,
            BarAlignment::Center => 0,
            BarAlignment::After => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log2,
    Log10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendOption {
    Hide,
    AsTable,
    AsList,
    Bottom,
    ToTheRight,
    First,
    FirstNonNull,
    Last,
    LastNonNull,
    Min,
    Max,
    Avg,
    Count,
    Total,
    Range,
}

impl FromStr for LegendOption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hide" => Ok(LegendOption::Hide),
            "as_table" => Ok(LegendOption::AsTable),
            "as_list" => Ok(LegendOption::AsList),
            "bottom" => Ok(LegendOption::Bottom),
            "to_the_right" => Ok(LegendOption::ToTheRight),
            "first" => Ok(LegendOption::First),
            "first_non_null" => Ok(LegendOption::FirstNonNull),
            "last" => Ok(LegendOption::Last),
            "last_non_null" => Ok(LegendOption::LastNonNull),
            "min" => Ok(LegendOption::Min),
            "max" => Ok(LegendOption::Max),
            "avg" => Ok(LegendOption::Avg),
            "count" => Ok(LegendOption::Count),
            "total" => Ok(LegendOption::Total),
            "range" => Ok(LegendOption::Range),
            other => Err(format!("unknown legend option '{}'", other)),
        }
    }
}

/// Y axis of a time series panel.
#[derive(Debug, Clone, Default)]
pub struct Axis {
    placement: Option<AxisPlacement>,
    soft_min: Option<f64>,
    soft_max: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    unit: Option<String>,
    scale: Option<Scale>,
    label: Option<String>,
    decimals: Option<u32>,
}

impl Builder for Axis {}

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placement(mut self, placement: AxisPlacement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Minimum of the axis unless the data goes below it.
    pub fn soft_min(mut self, min: f64) -> Self {
        self.soft_min = Some(min);
        self
    }

    pub fn soft_max(mut self, max: f64) -> Self {
        self.soft_max = Some(max);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    fn apply(self, defaults: &mut FieldDefaults) {
        if self.unit.is_some() {
            defaults.unit = self.unit;
        }
        if self.decimals.is_some() {
            defaults.decimals = self.decimals;
        }
        if self.min.is_some() {
            defaults.min = self.min;
        }
        if self.max.is_some() {
            defaults.max = self.max;
        }

        let custom = defaults.custom.get_or_insert_with(SeriesCustom::default);
        if let Some(placement) = self.placement {
            custom.axis_placement = Some(placement.as_str().to_string());
        }
        if self.label.is_some() {
            custom.axis_label = self.label;
        }
        if self.soft_min.is_some() {
            custom.axis_soft_min = self.soft_min;
        }
        if self.soft_max.is_some() {
            custom.axis_soft_max = self.soft_max;
        }
        if let Some(scale) = self.scale {
            custom.scale_distribution = Some(scale_distribution(scale));
        }
    }
}

fn scale_distribution(scale: Scale) -> ScaleDistribution {
    match scale {
        Scale::Linear => ScaleDistribution {
            scale_type: "linear".to_string(),
            log: None,
        },
        Scale::Log2 => ScaleDistribution {
            scale_type: "log".to_string(),
            log: Some(2),
        },
        Scale::Log10 => ScaleDistribution {
            scale_type: "log".to_string(),
            log: Some(10),
        },
    }
}

/// Field configuration applied to the series matching a name or a query.
#[derive(Debug, Clone)]
pub struct Override {
    matcher: FieldMatcher,
    properties: Vec<OverrideProperty>,
}

impl Builder for Override {}

impl Override {
    /// Matches the field with the given display name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new("byName", name.into())
    }

    /// Matches every field returned by the query with the given ref.
    pub fn by_query(ref_id: impl Into<String>) -> Self {
        Self::new("byFrameRefID", ref_id.into())
    }

    fn new(id: &str, options: String) -> Self {
        Self {
            matcher: FieldMatcher {
                id: id.to_string(),
                options,
            },
            properties: Vec::new(),
        }
    }

    fn property(mut self, id: &str, value: serde_json::Value) -> Self {
        self.properties.push(OverrideProperty {
            id: id.to_string(),
            value,
        });
        self
    }

    pub fn unit(self, unit: impl Into<String>) -> Self {
        self.property("unit", json!(unit.into()))
    }

    pub fn fill_opacity(self, opacity: u32) -> Self {
        self.property("custom.fillOpacity", json!(opacity))
    }

    pub fn fixed_color(self, color: impl Into<String>) -> Self {
        self.property("color", json!({"mode": "fixed", "fixedColor": color.into()}))
    }

    /// Draws the matching series below the X axis.
    pub fn negative_y(self) -> Self {
        self.property("custom.transform", json!("negative-Y"))
    }

    pub fn axis_placement(self, placement: AxisPlacement) -> Self {
        self.property("custom.axisPlacement", json!(placement.as_str()))
    }

    pub fn stack(self, mode: StackMode) -> Self {
        self.property(
            "custom.stacking",
            json!({"mode": mode.as_str(), "group": false}),
        )
    }

    fn into_model(self) -> FieldOverride {
        FieldOverride {
            matcher: self.matcher,
            properties: self.properties,
        }
    }
}

#[derive(Debug)]
pub struct TimeSeries {
    base: PanelBase,
    panel: TimeseriesPanel,
    alert: Option<Alert>,
}

impl Builder for TimeSeries {}

impl CommonOptions for TimeSeries {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for TimeSeries {}

impl TimeSeries {
    pub fn new(title: impl Into<String>) -> Self {
        let custom = SeriesCustom {
            show_points: Some("auto".to_string()),
            axis_placement: Some(AxisPlacement::Auto.as_str().to_string()),
            scale_distribution: Some(scale_distribution(Scale::Linear)),
            ..Default::default()
        };

        Self {
            base: PanelBase::new("timeseries", title),
            panel: TimeseriesPanel {
                options: TimeseriesOptions {
                    legend: TimeseriesLegend {
                        display_mode: "list".to_string(),
                        placement: "bottom".to_string(),
                        calcs: Vec::new(),
                    },
                    tooltip: TimeseriesTooltip {
                        mode: String::new(),
                    },
                },
                field_config: FieldConfig {
                    defaults: FieldDefaults {
                        custom: Some(custom),
                        color: Some(ColorScheme::PaletteClassic.to_field_color()),
                        ..Default::default()
                    },
                    overrides: Vec::new(),
                },
            },
            alert: None,
        }
        .span(6.0)
        .line_width(1)
        .fill_opacity(25)
        .point_size(5)
        .tooltip(TooltipMode::Single)
        .lines(LineInterpolation::Linear)
        .gradient(GradientMode::Opacity)
    }

    fn custom(&mut self) -> &mut SeriesCustom {
        self.panel
            .field_config
            .defaults
            .custom
            .get_or_insert_with(SeriesCustom::default)
    }

    pub fn tooltip(mut self, mode: TooltipMode) -> Self {
        self.panel.options.tooltip.mode = mode.as_str().to_string();
        self
    }

    pub fn legend(mut self, options: &[LegendOption]) -> Self {
        let legend = &mut self.panel.options.legend;
        for option in options {
            let calc = match option {
                LegendOption::Hide => {
                    legend.display_mode = "hidden".to_string();
                    continue;
                }
                LegendOption::AsTable => {
                    legend.display_mode = "table".to_string();
                    continue;
                }
                LegendOption::AsList => {
                    legend.display_mode = "list".to_string();
                    continue;
                }
                LegendOption::Bottom => {
                    legend.placement = "bottom".to_string();
                    continue;
                }
                LegendOption::ToTheRight => {
                    legend.placement = "right".to_string();
                    continue;
                }
                LegendOption::First => "first",
                LegendOption::FirstNonNull => "firstNotNull",
                LegendOption::Last => "last",
                LegendOption::LastNonNull => "lastNotNull",
                LegendOption::Min => "min",
                LegendOption::Max => "max",
                LegendOption::Avg => "mean",
                LegendOption::Count => "count",
                LegendOption::Total => "sum",
                LegendOption::Range => "range",
            };
            if !legend.calcs.iter().any(|c| c == calc) {
                legend.calcs.push(calc.to_string());
            }
        }
        self
    }

    pub fn line_width(mut self, width: u32) -> Self {
        let resource = self.base.resource();
        if let Some(width) = self
            .base
            .take(ensure_range(&resource, "lineWidth", width, 0, 10))
        {
            self.custom().line_width = Some(width);
        }
        self
    }

    /// Area fill opacity, `0..=100`.
    pub fn fill_opacity(mut self, opacity: u32) -> Self {
        let resource = self.base.resource();
        if let Some(opacity) = self
            .base
            .take(ensure_range(&resource, "fillOpacity", opacity, 0, 100))
        {
            self.custom().fill_opacity = Some(opacity);
        }
        self
    }

    pub fn point_size(mut self, size: u32) -> Self {
        let resource = self.base.resource();
        if let Some(size) = self
            .base
            .take(ensure_range(&resource, "pointSize", size, 0, 40))
        {
            self.custom().point_size = Some(size);
        }
        self
    }

    pub fn gradient(mut self, mode: GradientMode) -> Self {
        self.custom().gradient_mode = Some(mode.as_str().to_string());
        self
    }

    pub fn lines(mut self, interpolation: LineInterpolation) -> Self {
        let custom = self.custom();
        custom.draw_style = Some("line".to_string());
        custom.line_interpolation = Some(interpolation.as_str().to_string());
        custom.bar_alignment = None;
        self
    }

    pub fn bars(mut self, alignment: BarAlignment) -> Self {
        let custom = self.custom();
        custom.draw_style = Some("bars".to_string());
        custom.bar_alignment = Some(alignment.as_i8());
        custom.line_interpolation = None;
        self
    }

    pub fn points(mut self) -> Self {
        let custom = self.custom();
        custom.draw_style = Some("points".to_string());
        custom.line_interpolation = None;
        custom.bar_alignment = None;
        self
    }

    pub fn stack(mut self, mode: StackMode) -> Self {
        self.custom().stacking = Some(Stacking {
            mode: mode.as_str().to_string(),
            group: false,
        });
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        axis.apply(&mut self.panel.field_config.defaults);
        self
    }

    /// Absolute thresholds, drawn as lines unless told otherwise.
    pub fn thresholds(mut self, steps: Vec<ThresholdStep>) -> Self {
        let resource = self.base.resource();
        if let Some(thresholds) =
            self.base
                .take(thresholds(&resource, ThresholdMode::Absolute, steps))
        {
            self.panel.field_config.defaults.thresholds = Some(thresholds);
            let custom = self.custom();
            if custom.thresholds_style.is_none() {
                custom.thresholds_style = Some(ThresholdsStyle {
                    mode: ThresholdsDisplay::Line.as_str().to_string(),
                });
            }
        }
        self
    }

    pub fn thresholds_style(mut self, display: ThresholdsDisplay) -> Self {
        self.custom().thresholds_style = Some(ThresholdsStyle {
            mode: display.as_str().to_string(),
        });
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.panel.field_config.defaults.color = Some(scheme.to_field_color());
        self
    }

    pub fn field_override(mut self, field_override: Override) -> Self {
        self.panel
            .field_config
            .overrides
            .push(field_override.into_model());
        self
    }

    pub fn alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

impl IntoPanel for TimeSeries {
    fn into_panel(self) -> Result<PanelDraft> {
        let alert = build_alert(self.alert, self.base.datasource_name())?;
        let panel = self.base.finish(PanelKind::Timeseries(self.panel))?;
        Ok(PanelDraft { panel, alert })
    }
}
