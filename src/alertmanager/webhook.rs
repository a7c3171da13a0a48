use super::IntoReceiver;
use crate::kernel::{Builder, ErrorSlot};
use crate::model::{Receiver, SecureSettings};
use crate::{Error, Result};
use serde_json::{json, Map};

const METHODS: [&str; 3] = ["GET", "POST", "PUT"];

/// Calls an HTTP endpoint with the alert payload.
#[derive(Debug)]
pub struct Webhook {
    settings: Map<String, serde_json::Value>,
    secure: SecureSettings,
    errors: ErrorSlot,
}

impl Builder for Webhook {}

impl Webhook {
    pub fn call(url: impl Into<String>) -> Self {
        let mut settings = Map::new();
        settings.insert("url".to_string(), json!(url.into()));
        Self {
            settings,
            secure: SecureSettings::new(),
            errors: ErrorSlot::default(),
        }
    }

    /// One of GET, POST or PUT, in any case.
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        let method = method.as_ref().to_uppercase();
        if METHODS.contains(&method.as_str()) {
            self.settings.insert("httpMethod".to_string(), json!(method));
        } else {
            self.errors.record(Error::invalid(
                "webhook contact point",
                "httpMethod",
                method,
                "must be one of GET, POST or PUT",
            ));
        }
        self
    }

    /// Basic auth credentials. The password is a secure setting.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.settings
            .insert("username".to_string(), json!(username.into()));
        self.secure.insert("password", password);
        self
    }

    /// Maximum number of alerts sent per call, 0 for no limit.
    pub fn max_alerts(mut self, max: u32) -> Self {
        self.settings
            .insert("maxAlerts".to_string(), json!(max.to_string()));
        self
    }
}

impl IntoReceiver for Webhook {
    fn into_receiver(self) -> Result<Receiver> {
        self.errors.into_result()?;
        Ok(Receiver {
            uid: None,
            name: String::new(),
            receiver_type: "webhook".to_string(),
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
    fn test_webhook() {
        let receiver = Webhook::call("https://hooks.example.com")
            .method("put")
            .credentials("grafana", "s3cret")
            .max_alerts(10)
            .into_receiver()
            .unwrap();

        assert_eq!(
            serde_json::Value::Object(receiver.settings.clone()),
            json!({
                "url": "https://hooks.example.com",
                "httpMethod": "PUT",
                "username": "grafana",
                "maxAlerts": "10"
            })
        );
        assert_eq!(receiver.secure_settings.get("password"), Some("s3cret"));
        assert!(!format!("{:?}", receiver).contains("s3cret"));
    }

    #[test]
    fn test_invalid_method() {
        match Webhook::call("https://hooks.example.com")
            .method("patch")
            .into_receiver()
        {
            Err(Error::InvalidArgument { field, value, .. }) => {
                assert_eq!(field, "httpMethod");
                assert_eq!(value, "PATCH");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
