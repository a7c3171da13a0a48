use super::IntoReceiver;
use crate::kernel::Builder;
use crate::model::{Receiver, SecureSettings};
use crate::Result;
use serde_json::{json, Map};

#[derive(Debug, Clone)]
pub struct Email {
    settings: Map<String, serde_json::Value>,
}

impl Builder for Email {}

impl Email {
    pub fn to<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addresses: Vec<String> = addresses.into_iter().map(Into::into).collect();
        let mut settings = Map::new();
        settings.insert("addresses".to_string(), json!(addresses.join(",")));
        Self { settings }
    }

    /// Sends one email to every address instead of one per address.
    pub fn single(mut self) -> Self {
        self.settings.insert("singleEmail".to_string(), json!(true));
        self
    }

    pub fn message(mut self, content: impl Into<String>) -> Self {
        self.settings
            .insert("message".to_string(), json!(content.into()));
        self
    }
}

impl IntoReceiver for Email {
    fn into_receiver(self) -> Result<Receiver> {
        Ok(Receiver {
            uid: None,
            name: String::new(),
            receiver_type: "email".to_string(),
            disable_resolve_message: false,
            settings: self.settings,
            secure_settings: SecureSettings::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        let receiver = Email::to(["a@example.com", "b@example.com"])
            .single()
            .message("{{ template \"default.message\" . }}")
            .into_receiver()
            .unwrap();

        assert_eq!(receiver.receiver_type, "email");
        assert_eq!(
            serde_json::Value::Object(receiver.settings),
            json!({
                "addresses": "a@example.com,b@example.com",
                "singleEmail": true,
                "message": "{{ template \"default.message\" . }}"
            })
        );
        assert!(receiver.secure_settings.is_empty());
    }
}
