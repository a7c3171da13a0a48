use super::IntoReceiver;
use crate::kernel::Builder;
use crate::model::{Receiver, SecureSettings};
use crate::Result;
use serde_json::{json, Map};

#[derive(Debug, Clone)]
pub struct Slack {
    settings: Map<String, serde_json::Value>,
    secure: SecureSettings,
}

impl Builder for Slack {}

impl Slack {
    /// The webhook URL is a credential and is sent as a secure setting.
    pub fn webhook(url: impl Into<String>) -> Self {
        let mut secure = SecureSettings::new();
        secure.insert("url", url);
        Self {
            settings: Map::new(),
            secure,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.settings.insert("title".to_string(), json!(title.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.settings.insert("text".to_string(), json!(body.into()));
        self
    }
}

impl IntoReceiver for Slack {
    fn into_receiver(self) -> Result<Receiver> {
        Ok(Receiver {
            uid: None,
            name: String::new(),
            receiver_type: "slack".to_string(),
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
    fn test_slack() {
        let receiver = Slack::webhook("https://hooks.slack.com/services/T/B/X")
            .title("{{ .CommonLabels.alertname }}")
            .body("firing")
            .into_receiver()
            .unwrap();

        assert_eq!(receiver.receiver_type, "slack");
        assert_eq!(receiver.settings["title"], json!("{{ .CommonLabels.alertname }}"));
        assert_eq!(receiver.settings["text"], json!("firing"));
        assert!(!receiver.settings.contains_key("url"));
        assert_eq!(
            receiver.secure_settings.get("url"),
            Some("https://hooks.slack.com/services/T/B/X")
        );
    }
}
