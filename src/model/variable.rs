use super::value::DatasourceRef;
use serde::{Deserialize, Serialize};

/// A templating variable, one entry of `templating.list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVar {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 0 shows everything, 1 hides the label, 2 hides the variable.
    #[serde(default)]
    pub hide: u8,
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<u8>,
    #[serde(default)]
    pub multi: bool,
    #[serde(default)]
    pub include_all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_value: Option<String>,
    #[serde(default)]
    pub options: Vec<VarOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Current>,
}

impl TemplateVar {
    pub fn new(name: impl Into<String>, var_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: Some(name.clone()),
            name,
            var_type: var_type.into(),
            hide: 0,
            query: String::new(),
            datasource: None,
            refresh: None,
            regex: None,
            sort: None,
            multi: false,
            include_all: false,
            all_value: None,
            options: Vec::new(),
            current: None,
        }
    }
}

/// Either a single value or a list of values; multi-valued variables store
/// their selection as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        VarValue::One(value.to_string())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        VarValue::One(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Current {
    pub text: VarValue,
    pub value: VarValue,
}

impl Current {
    pub fn new(text: impl Into<VarValue>, value: impl Into<VarValue>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarOption {
    pub text: String,
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

impl VarOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            selected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_accepts_both_shapes() {
        let single: Current = serde_json::from_value(json!({"text": "a", "value": "a"})).unwrap();
        assert_eq!(single.value, VarValue::One("a".into()));

        let multi: Current =
            serde_json::from_value(json!({"text": ["a", "b"], "value": ["a", "b"]})).unwrap();
        assert_eq!(multi.value, VarValue::Many(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_new_variable_uses_name_as_label() {
        let var = TemplateVar::new("job", "query");
        let value = serde_json::to_value(&var).unwrap();
        assert_eq!(value["label"], json!("job"));
        assert_eq!(value["type"], json!("query"));
        assert_eq!(value["hide"], json!(0));
        assert!(value.get("current").is_none());
    }
}
