use super::mapping::{self, Mapping};
use super::options::{Orientation, ValueType};
use super::scheme::{ColorScheme, SeriesBy};
use super::threshold::thresholds;
use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::kernel::Builder;
use crate::model::{
    FieldConfig, FieldDefaults, PanelKind, ReduceOptions, StatOptions, StatPanel, TextSizes,
    ThresholdMode, ThresholdStep,
};
use crate::Result;
use std::str::FromStr;

/// What the stat panel shows next to, or instead of, the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Auto,
    Value,
    Name,
    ValueAndName,
    None,
}

impl TextMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TextMode::Auto => "auto",
            TextMode::Value => "value",
            TextMode::Name => "name",
            TextMode::ValueAndName => "value_and_name",
            TextMode::None => "none",
        }
    }
}

impl FromStr for TextMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(TextMode::Auto),
            "value" => Ok(TextMode::Value),
            "name" => Ok(TextMode::Name),
            "value_and_name" => Ok(TextMode::ValueAndName),
            "none" => Ok(TextMode::None),
            other => Err(format!("unknown text mode '{}'", other)),
        }
    }
}

/// Which part of the panel takes the threshold color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    None,
    Value,
    Background,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::None => "none",
            ColorMode::Value => "value",
            ColorMode::Background => "background",
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(ColorMode::None),
            "value" => Ok(ColorMode::Value),
            "background" => Ok(ColorMode::Background),
            other => Err(format!("unknown color mode '{}'", other)),
        }
    }
}

/// Single reduced value, optionally over a sparkline.
#[derive(Debug)]
pub struct Stat {
    base: PanelBase,
    options: StatOptions,
    defaults: FieldDefaults,
}

impl Builder for Stat {}

impl CommonOptions for Stat {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for Stat {}

impl Stat {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("stat", title),
            options: StatOptions {
                reduce_options: ReduceOptions::default(),
                orientation: String::new(),
                text_mode: String::new(),
                color_mode: String::new(),
                graph_mode: "none".to_string(),
                justify_mode: "auto".to_string(),
                text: TextSizes::default(),
            },
            defaults: FieldDefaults {
                no_value: Some("N/A".to_string()),
                ..Default::default()
            },
        }
        .span(6.0)
        .value_type(ValueType::Last)
        .text(TextMode::Value)
        .color_mode(ColorMode::Value)
        .orientation(Orientation::Vertical)
        .color_scheme(ColorScheme::Thresholds(SeriesBy::Last))
        .absolute_thresholds(Vec::new())
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.options.reduce_options.calcs = vec![value_type.as_str().to_string()];
        self
    }

    pub fn text(mut self, mode: TextMode) -> Self {
        self.options.text_mode = mode.as_str().to_string();
        self
    }

    pub fn color_mode(mut self, mode: ColorMode) -> Self {
        self.options.color_mode = mode.as_str().to_string();
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.options.orientation = orientation.as_str().to_string();
        self
    }

    /// Draws the series behind the value.
    pub fn sparkline(mut self) -> Self {
        self.options.graph_mode = "area".to_string();
        self
    }

    pub fn sparkline_y_min(mut self, min: f64) -> Self {
        self.defaults.min = Some(min);
        self
    }

    pub fn sparkline_y_max(mut self, max: f64) -> Self {
        self.defaults.max = Some(max);
        self
    }

    pub fn value_font_size(mut self, size: u32) -> Self {
        self.options.text.value_size = Some(size);
        self
    }

    pub fn title_font_size(mut self, size: u32) -> Self {
        self.options.text.title_size = Some(size);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.defaults.unit = Some(unit.into());
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.defaults.decimals = Some(decimals);
        self
    }

    /// Text shown when the query returns nothing.
    pub fn no_value(mut self, text: impl Into<String>) -> Self {
        self.defaults.no_value = Some(text.into());
        self
    }

    pub fn absolute_thresholds(self, steps: Vec<ThresholdStep>) -> Self {
        self.thresholds(ThresholdMode::Absolute, steps)
    }

    /// Thresholds expressed as percentages of the min..max range.
    pub fn relative_thresholds(self, steps: Vec<ThresholdStep>) -> Self {
        self.thresholds(ThresholdMode::Percentage, steps)
    }

    fn thresholds(mut self, mode: ThresholdMode, steps: Vec<ThresholdStep>) -> Self {
        let resource = self.base.resource();
        if let Some(thresholds) = self.base.take(thresholds(&resource, mode, steps)) {
            self.defaults.thresholds = Some(thresholds);
        }
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.defaults.color = Some(scheme.to_field_color());
        self
    }

    pub fn mappings(mut self, mappings: Vec<Mapping>) -> Self {
        self.defaults.mappings = mapping::to_model(mappings);
        self
    }
}

impl IntoPanel for Stat {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Stat(StatPanel {
            options: self.options,
            field_config: FieldConfig {
                defaults: self.defaults,
                overrides: Vec::new(),
            },
        }))?;
        Ok(PanelDraft { panel, alert: None })
    }
}
