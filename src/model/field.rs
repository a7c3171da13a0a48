use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `fieldConfig` block shared by the field-based panels (timeseries, stat,
/// gauge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub defaults: FieldDefaults,
    #[serde(default)]
    pub overrides: Vec<FieldOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<FieldColor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<ValueMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<SeriesCustom>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    #[default]
    Absolute,
    Percentage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub mode: ThresholdMode,
    pub steps: Vec<ThresholdStep>,
}

/// A `(color, value)` pair. The base step has no value and is emitted with
/// `"value": null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStep {
    pub color: String,
    #[serde(default)]
    pub value: Option<f64>,
}

impl ThresholdStep {
    pub fn base(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            value: None,
        }
    }

    pub fn at(color: impl Into<String>, value: f64) -> Self {
        Self {
            color: color.into(),
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldColor {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum ValueMapping {
    Value(BTreeMap<String, MappingResult>),
    Range {
        #[serde(default)]
        from: Option<f64>,
        #[serde(default)]
        to: Option<f64>,
        result: MappingResult,
    },
    Regex {
        pattern: String,
        result: MappingResult,
    },
    Special {
        #[serde(rename = "match")]
        special: String,
        result: MappingResult,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOverride {
    pub matcher: FieldMatcher,
    #[serde(default)]
    pub properties: Vec<OverrideProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatcher {
    pub id: String,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideProperty {
    pub id: String,
    pub value: serde_json::Value,
}

/// `fieldConfig.defaults.custom` for series-drawing panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCustom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_interpolation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_alignment: Option<i8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_nulls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacking: Option<Stacking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_placement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_soft_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_soft_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_distribution: Option<ScaleDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds_style: Option<ThresholdsStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacking {
    pub mode: String,
    #[serde(default)]
    pub group: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDistribution {
    #[serde(rename = "type")]
    pub scale_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdsStyle {
    pub mode: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_step_value_is_null() {
        let thresholds = Thresholds {
            mode: ThresholdMode::Absolute,
            steps: vec![ThresholdStep::base("green"), ThresholdStep::at("red", 90.0)],
        };

        assert_eq!(
            serde_json::to_value(&thresholds).unwrap(),
            json!({
                "mode": "absolute",
                "steps": [
                    {"color": "green", "value": null},
                    {"color": "red", "value": 90.0}
                ]
            })
        );
    }

    #[test]
    fn test_color_omits_unused_keys() {
        let color = FieldColor {
            mode: "palette-classic".to_string(),
            fixed_color: None,
            series_by: None,
        };
        assert_eq!(
            serde_json::to_value(&color).unwrap(),
            json!({"mode": "palette-classic"})
        );
    }

    #[test]
    fn test_value_mapping_shapes() {
        let mut values = BTreeMap::new();
        values.insert(
            "1".to_string(),
            MappingResult {
                text: Some("up".to_string()),
                color: Some("green".to_string()),
                index: Some(0),
            },
        );
        assert_eq!(
            serde_json::to_value(ValueMapping::Value(values)).unwrap(),
            json!({
                "type": "value",
                "options": {"1": {"text": "up", "color": "green", "index": 0}}
            })
        );

        let special = ValueMapping::Special {
            special: "null".to_string(),
            result: MappingResult {
                text: Some("N/A".to_string()),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&special).unwrap(),
            json!({"type": "special", "options": {"match": "null", "result": {"text": "N/A"}}})
        );

        let decoded: ValueMapping = serde_json::from_value(json!({
            "type": "range",
            "options": {"from": 0, "to": 10, "result": {"text": "low"}}
        }))
        .unwrap();
        assert_eq!(
            decoded,
            ValueMapping::Range {
                from: Some(0.0),
                to: Some(10.0),
                result: MappingResult {
                    text: Some("low".to_string()),
                    ..Default::default()
                },
            }
        );
    }
}
