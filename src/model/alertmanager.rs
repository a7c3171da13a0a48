use super::value::SecureSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `/api/alertmanager/grafana/config/api/v1/alerts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertManager {
    #[serde(default)]
    pub template_files: BTreeMap<String, String>,
    pub alertmanager_config: AlertManagerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertManagerConfig {
    pub route: NotificationPolicies,
    #[serde(default)]
    pub receivers: Vec<ContactPoint>,
    #[serde(default)]
    pub templates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grafana_managed_receiver_configs: Vec<Receiver>,
}

/// One channel of a contact point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub receiver_type: String,
    #[serde(default)]
    pub disable_resolve_message: bool,
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "SecureSettings::is_empty")]
    pub secure_settings: SecureSettings,
}

/// Root of the routing tree. Its receiver is the default contact point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPolicies {
    pub receiver: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RoutingPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    pub receiver: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    #[serde(default)]
    pub object_matchers: Vec<ObjectMatcher>,
}

/// `[label, operator, value]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMatcher(pub String, pub String, pub String);
