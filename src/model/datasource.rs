use super::value::SecureSettings;
use serde::{Deserialize, Serialize};

/// Body of `/api/datasources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub name: String,
    #[serde(rename = "type")]
    pub datasource_type: String,
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth_user: Option<String>,
    #[serde(default)]
    pub with_credentials: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub json_data: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub secure_json_data: SecureSettings,
}

impl Datasource {
    pub fn new(name: impl Into<String>, datasource_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datasource_type: datasource_type.into(),
            access: "proxy".to_string(),
            url: None,
            is_default: false,
            basic_auth: None,
            basic_auth_user: None,
            with_credentials: false,
            database: None,
            user: None,
            json_data: serde_json::Map::new(),
            secure_json_data: SecureSettings::new(),
        }
    }
}
