use super::IntoReceiver;
use crate::kernel::Builder;
use crate::model::{Receiver, SecureSettings};
use crate::Result;
use serde_json::{json, Map};
use std::str::FromStr;

/// Where alert labels end up in the Opsgenie alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagForwardMode {
    Tags,
    ExtraProperties,
    TagsAndExtraProperties,
}

impl TagForwardMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TagForwardMode::Tags => "tags",
            TagForwardMode::ExtraProperties => "details",
            TagForwardMode::TagsAndExtraProperties => "both",
        }
    }
}

impl FromStr for TagForwardMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tags" => Ok(TagForwardMode::Tags),
            "details" => Ok(TagForwardMode::ExtraProperties),
            "both" => Ok(TagForwardMode::TagsAndExtraProperties),
            other => Err(format!("unknown tag forward mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Opsgenie {
    settings: Map<String, serde_json::Value>,
    secure: SecureSettings,
}

impl Builder for Opsgenie {}

impl Opsgenie {
    pub fn with(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut settings = Map::new();
        settings.insert("apiUrl".to_string(), json!(api_url.into()));
        let mut secure = SecureSettings::new();
        secure.insert("apiKey", api_key);

        Self { settings, secure }.send_tags_as(TagForwardMode::Tags)
    }

    /// Closes the Opsgenie alert when the Grafana alert resolves.
    pub fn auto_close(mut self) -> Self {
        self.settings.insert("autoClose".to_string(), json!(true));
        self
    }

    /// Uses the `og_priority` annotation as the alert priority.
    pub fn override_priority(mut self) -> Self {
        self.settings
            .insert("overridePriority".to_string(), json!(true));
        self
    }

    pub fn send_tags_as(mut self, mode: TagForwardMode) -> Self {
        self.settings
            .insert("sendTagsAs".to_string(), json!(mode.as_str()));
        self
    }
}

impl IntoReceiver for Opsgenie {
    fn into_receiver(self) -> Result<Receiver> {
        Ok(Receiver {
            uid: None,
            name: String::new(),
            receiver_type: "opsgenie".to_string(),
            disable_resolve_message: false,
            settings: self.settings,
            secure_settings: self.secure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opsgenie_with_credentials() {
        let receiver = Opsgenie::with("url", "key")
            .auto_close()
            .into_receiver()
            .unwrap();
        let value = serde_json::to_value(&receiver).unwrap();

        assert_eq!(value["type"], json!("opsgenie"));
        assert_eq!(value["settings"]["apiUrl"], json!("url"));
        assert_eq!(value["settings"]["autoClose"], json!(true));
        assert_eq!(value["settings"]["sendTagsAs"], json!("tags"));
        assert_eq!(value["secureSettings"]["apiKey"], json!("key"));
    }

    #[test]
    fn test_options() {
        let receiver = Opsgenie::with("url", "key")
            .override_priority()
            .send_tags_as(TagForwardMode::TagsAndExtraProperties)
            .into_receiver()
            .unwrap();

        assert_eq!(receiver.settings["overridePriority"], json!(true));
        assert_eq!(receiver.settings["sendTagsAs"], json!("both"));
        assert!(format!("{:?}", receiver).contains("<redacted>"));
    }
}
