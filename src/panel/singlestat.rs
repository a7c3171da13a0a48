use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::kernel::Builder;
use crate::model::{MappingType, PanelKind, RangeMap, SinglestatPanel, Sparkline, ValueMap};
use crate::Result;
use std::str::FromStr;

const VALUE_TO_TEXT: u8 = 1;
const RANGE_TO_TEXT: u8 = 2;

/// Reduction applied by the legacy singlestat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Min,
    Max,
    Avg,
    Current,
    Total,
    First,
    Delta,
    Diff,
    Range,
    Name,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Min => "min",
            ValueType::Max => "max",
            ValueType::Avg => "avg",
            ValueType::Current => "current",
            ValueType::Total => "total",
            ValueType::First => "first",
            ValueType::Delta => "delta",
            ValueType::Diff => "diff",
            ValueType::Range => "range",
            ValueType::Name => "name",
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "min" => Ok(ValueType::Min),
            "max" => Ok(ValueType::Max),
            "avg" => Ok(ValueType::Avg),
            "current" => Ok(ValueType::Current),
            "total" => Ok(ValueType::Total),
            "first" => Ok(ValueType::First),
            "delta" => Ok(ValueType::Delta),
            "diff" => Ok(ValueType::Diff),
            "range" => Ok(ValueType::Range),
            "name" => Ok(ValueType::Name),
            other => Err(format!("unknown value type '{}'", other)),
        }
    }
}

/// The pre-7.0 single value panel.
#[derive(Debug)]
pub struct SingleStat {
    base: PanelBase,
    panel: SinglestatPanel,
}

impl Builder for SingleStat {}

impl CommonOptions for SingleStat {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for SingleStat {}

impl SingleStat {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("singlestat", title),
            panel: SinglestatPanel {
                format: "none".to_string(),
                decimals: None,
                value_name: String::new(),
                value_font_size: String::new(),
                prefix: None,
                prefix_font_size: None,
                postfix: None,
                postfix_font_size: None,
                color_value: false,
                color_background: false,
                thresholds: String::new(),
                colors: Vec::new(),
                sparkline: Sparkline::default(),
                mapping_type: VALUE_TO_TEXT,
                mapping_types: vec![
                    MappingType {
                        name: "value to text".to_string(),
                        value: VALUE_TO_TEXT,
                    },
                    MappingType {
                        name: "range to text".to_string(),
                        value: RANGE_TO_TEXT,
                    },
                ],
                value_maps: Vec::new(),
                range_maps: Vec::new(),
            },
        }
        .span(6.0)
        .value_font_size("100%")
        .value_type(ValueType::Avg)
        .colors(["#299c46", "rgba(237, 129, 40, 0.89)", "#d44a3a"])
        .values_to_text([("null", "N/A")])
        .sparkline_colors("rgb(31, 120, 193)", "rgba(31, 118, 189, 0.18)")
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.panel.format = unit.into();
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.panel.decimals = Some(decimals);
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.panel.value_name = value_type.as_str().to_string();
        self
    }

    pub fn value_font_size(mut self, size: impl Into<String>) -> Self {
        self.panel.value_font_size = size.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.panel.prefix = Some(prefix.into());
        self
    }

    pub fn prefix_font_size(mut self, size: impl Into<String>) -> Self {
        self.panel.prefix_font_size = Some(size.into());
        self
    }

    pub fn postfix(mut self, postfix: impl Into<String>) -> Self {
        self.panel.postfix = Some(postfix.into());
        self
    }

    pub fn postfix_font_size(mut self, size: impl Into<String>) -> Self {
        self.panel.postfix_font_size = Some(size.into());
        self
    }

    /// Applies the threshold colors to the value.
    pub fn color_value(mut self) -> Self {
        self.panel.color_value = true;
        self
    }

    /// Applies the threshold colors to the panel background.
    pub fn color_background(mut self) -> Self {
        self.panel.color_background = true;
        self
    }

    /// Two boundaries splitting values into the three colors.
    pub fn thresholds(mut self, low: f64, high: f64) -> Self {
        self.panel.thresholds = format!("{},{}", low, high);
        self
    }

    /// Colors for values below, between and above the thresholds.
    pub fn colors(mut self, colors: [&str; 3]) -> Self {
        self.panel.colors = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn sparkline(mut self) -> Self {
        self.panel.sparkline.show = true;
        self
    }

    /// Sparkline spanning the whole panel height.
    pub fn full_sparkline(mut self) -> Self {
        self.panel.sparkline.show = true;
        self.panel.sparkline.full = true;
        self
    }

    pub fn sparkline_colors(mut self, line: impl Into<String>, fill: impl Into<String>) -> Self {
        self.panel.sparkline.line_color = Some(line.into());
        self.panel.sparkline.fill_color = Some(fill.into());
        self
    }

    pub fn sparkline_y_min(mut self, min: f64) -> Self {
        self.panel.sparkline.y_min = Some(min);
        self
    }

    pub fn sparkline_y_max(mut self, max: f64) -> Self {
        self.panel.sparkline.y_max = Some(max);
        self
    }

    /// Replaces exact values with a text.
    pub fn values_to_text<I, V, T>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (V, T)>,
        V: Into<String>,
        T: Into<String>,
    {
        self.panel.mapping_type = VALUE_TO_TEXT;
        self.panel.value_maps = mappings
            .into_iter()
            .map(|(value, text)| ValueMap {
                op: "=".to_string(),
                value: value.into(),
                text: text.into(),
            })
            .collect();
        self
    }

    /// Replaces values within `from..=to` with a text.
    pub fn ranges_to_text<I, T>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, T)>,
        T: Into<String>,
    {
        self.panel.mapping_type = RANGE_TO_TEXT;
        self.panel.range_maps = mappings
            .into_iter()
            .map(|(from, to, text)| RangeMap {
                from: from.to_string(),
                to: to.to_string(),
                text: text.into(),
            })
            .collect();
        self
    }
}

impl IntoPanel for SingleStat {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Singlestat(self.panel))?;
        Ok(PanelDraft { panel, alert: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn panel_json(stat: SingleStat) -> serde_json::Value {
        serde_json::to_value(&stat.into_panel().unwrap().panel).unwrap()
    }

    #[test]
    fn test_defaults() {
        let value = panel_json(SingleStat::new("errors"));

        assert_eq!(value["type"], json!("singlestat"));
        assert_eq!(value["gridPos"]["w"], json!(12));
        assert_eq!(value["valueFontSize"], json!("100%"));
        assert_eq!(value["valueName"], json!("avg"));
        assert_eq!(
            value["colors"],
            json!(["#299c46", "rgba(237, 129, 40, 0.89)", "#d44a3a"])
        );
        assert_eq!(
            value["valueMaps"],
            json!([{"op": "=", "value": "null", "text": "N/A"}])
        );
        assert_eq!(value["mappingType"], json!(1));
        assert_eq!(
            value["sparkline"],
            json!({
                "show": false,
                "full": false,
                "lineColor": "rgb(31, 120, 193)",
                "fillColor": "rgba(31, 118, 189, 0.18)"
            })
        );
    }

    #[test]
    fn test_thresholds_and_colors() {
        let value = panel_json(
            SingleStat::new("errors")
                .thresholds(10.0, 20.5)
                .color_background()
                .prefix("~")
                .postfix("ms")
                .unit("ms")
                .value_type(ValueType::Current),
        );

        assert_eq!(value["thresholds"], json!("10,20.5"));
        assert_eq!(value["colorBackground"], json!(true));
        assert_eq!(value["colorValue"], json!(false));
        assert_eq!(value["prefix"], json!("~"));
        assert_eq!(value["postfix"], json!("ms"));
        assert_eq!(value["format"], json!("ms"));
        assert_eq!(value["valueName"], json!("current"));
    }

    #[test]
    fn test_ranges_to_text() {
        let value = panel_json(
            SingleStat::new("status").ranges_to_text([(0.0, 10.0, "low"), (10.0, 100.0, "high")]),
        );

        assert_eq!(value["mappingType"], json!(2));
        assert_eq!(
            value["rangeMaps"],
            json!([
                {"from": "0", "to": "10", "text": "low"},
                {"from": "10", "to": "100", "text": "high"}
            ])
        );
    }

    #[test]
    fn test_value_type_from_str() {
        assert_eq!("delta".parse::<ValueType>(), Ok(ValueType::Delta));
        assert!("mean".parse::<ValueType>().is_err());
    }
}
