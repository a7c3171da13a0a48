use crate::model::{MappingResult, ValueMapping};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Special values a mapping can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialValue {
    Null,
    NaN,
    NullAndNaN,
    True,
    False,
    Empty,
}

impl SpecialValue {
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialValue::Null => "null",
            SpecialValue::NaN => "nan",
            SpecialValue::NullAndNaN => "null+nan",
            SpecialValue::True => "true",
            SpecialValue::False => "false",
            SpecialValue::Empty => "empty",
        }
    }
}

impl FromStr for SpecialValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(SpecialValue::Null),
            "nan" => Ok(SpecialValue::NaN),
            "null+nan" => Ok(SpecialValue::NullAndNaN),
            "true" => Ok(SpecialValue::True),
            "false" => Ok(SpecialValue::False),
            "empty" => Ok(SpecialValue::Empty),
            other => Err(format!("unknown special value '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    Value(String),
    Range(Option<f64>, Option<f64>),
    Regex(String),
    Special(SpecialValue),
}

/// Replaces matching values with a text and an optional color.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    matcher: Matcher,
    text: String,
    color: Option<String>,
}

impl Mapping {
    pub fn value(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Matcher::Value(value.into()), text)
    }

    /// Either bound may be left open.
    pub fn range(from: Option<f64>, to: Option<f64>, text: impl Into<String>) -> Self {
        Self::new(Matcher::Range(from, to), text)
    }

    pub fn regex(pattern: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Matcher::Regex(pattern.into()), text)
    }

    pub fn special(value: SpecialValue, text: impl Into<String>) -> Self {
        Self::new(Matcher::Special(value), text)
    }

    fn new(matcher: Matcher, text: impl Into<String>) -> Self {
        Self {
            matcher,
            text: text.into(),
            color: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    fn into_model(self, index: u32) -> ValueMapping {
        let result = MappingResult {
            text: Some(self.text),
            color: self.color,
            index: Some(index),
        };

        match self.matcher {
            Matcher::Value(value) => ValueMapping::Value(BTreeMap::from([(value, result)])),
            Matcher::Range(from, to) => ValueMapping::Range { from, to, result },
            Matcher::Regex(pattern) => ValueMapping::Regex { pattern, result },
            Matcher::Special(special) => ValueMapping::Special {
                special: special.as_str().to_string(),
                result,
            },
        }
    }
}

/// Converts mappings, indexed in the order they are given.
pub(crate) fn to_model(mappings: Vec<Mapping>) -> Vec<ValueMapping> {
    mappings
        .into_iter()
        .zip(0..)
        .map(|(mapping, index)| mapping.into_model(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mappings_are_indexed() {
        let mappings = to_model(vec![
            Mapping::value("1", "up").color("green"),
            Mapping::range(Some(0.0), None, "positive"),
            Mapping::special(SpecialValue::Null, "N/A"),
        ]);

        assert_eq!(
            serde_json::to_value(&mappings).unwrap(),
            json!([
                {"type": "value", "options": {"1": {"text": "up", "color": "green", "index": 0}}},
                {"type": "range", "options": {"from": 0.0, "to": null, "result": {"text": "positive", "index": 1}}},
                {"type": "special", "options": {"match": "null", "result": {"text": "N/A", "index": 2}}}
            ])
        );
    }

    #[test]
    fn test_regex_mapping() {
        let mappings = to_model(vec![Mapping::regex("^err.*", "error")]);
        match &mappings[0] {
            ValueMapping::Regex { pattern, result } => {
                assert_eq!(pattern, "^err.*");
                assert_eq!(result.text.as_deref(), Some("error"));
            }
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
