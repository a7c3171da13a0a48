use super::IntoReceiver;
use crate::kernel::Builder;
use crate::model::{Receiver, SecureSettings};
use crate::Result;
use serde_json::{json, Map};

#[derive(Debug, Clone)]
pub struct Discord {
    settings: Map<String, serde_json::Value>,
}

impl Builder for Discord {}

impl Discord {
    // Grafana expects the webhook URL among the plain settings for discord.
    pub fn with(url: impl Into<String>) -> Self {
        let mut settings = Map::new();
        settings.insert("url".to_string(), json!(url.into()));
        Self { settings }
    }

    /// Uses the webhook's default username instead of "Grafana".
    pub fn use_discord_username(mut self) -> Self {
        self.settings
            .insert("use_discord_username".to_string(), json!(true));
        self
    }
}

impl IntoReceiver for Discord {
    fn into_receiver(self) -> Result<Receiver> {
        Ok(Receiver {
            uid: None,
            name: String::new(),
            receiver_type: "discord".to_string(),
            disable_resolve_message: false,
            settings: self.settings,
            secure_settings: SecureSettings::new(),
        })
    }
}
