use super::{CommonSettings, Datasource, DatasourceBase};
use crate::kernel::Builder;
use crate::Result;
use serde_json::json;

#[derive(Debug)]
pub struct Loki {
    base: DatasourceBase,
}

impl Builder for Loki {}

impl CommonSettings for Loki {
    fn base_mut(&mut self) -> &mut DatasourceBase {
        &mut self.base
    }
}

impl Loki {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            base: DatasourceBase::new(name, "loki", Some(url.into())),
        }
    }

    /// HTTP request timeout, sent in whole seconds.
    pub fn timeout(mut self, timeout: impl AsRef<str>) -> Self {
        if let Some(timeout) = self.base.duration("timeout", timeout.as_ref()) {
            self.base.set_json("timeout", json!(timeout.as_secs()));
        }
        self
    }

    /// Maximum number of log lines returned by a query. Loki defaults to 1000.
    pub fn maximum_lines(mut self, max: u32) -> Self {
        self.base.set_json("maxLines", json!(max));
        self
    }

    pub fn build(self) -> Result<Datasource> {
        self.base.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loki() {
        let datasource = Loki::new("logs", "http://loki:3100")
            .timeout("1m")
            .maximum_lines(5000)
            .skip_tls_verify()
            .with_credentials()
            .build()
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&datasource.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], json!("loki"));
        assert_eq!(value["withCredentials"], json!(true));
        assert_eq!(
            value["jsonData"],
            json!({"timeout": 60, "maxLines": 5000, "tlsSkipVerify": true})
        );
    }

    #[test]
    fn test_no_http_method_by_default() {
        let datasource = Loki::new("logs", "http://loki:3100").build().unwrap();
        assert!(datasource.model().json_data.is_empty());
    }
}
