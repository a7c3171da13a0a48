use super::{Access, CommonSettings, Datasource, DatasourceBase};
use crate::kernel::Builder;
use crate::Result;
use serde_json::json;

/// InfluxDB queried with InfluxQL.
#[derive(Debug)]
pub struct InfluxDb {
    base: DatasourceBase,
}

impl Builder for InfluxDb {}

impl CommonSettings for InfluxDb {
    fn base_mut(&mut self) -> &mut DatasourceBase {
        &mut self.base
    }
}

impl InfluxDb {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let mut base = DatasourceBase::new(name, "influxdb", Some(url.into()));
        base.set_json("version", json!("InfluxQL"));

        Self { base }
            .http_method("GET")
            .access_mode(Access::Proxy)
            .max_series(1000)
    }

    /// POST allows queries too large for a GET request.
    pub fn http_method(mut self, method: impl AsRef<str>) -> Self {
        self.base.http_method(method.as_ref());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.base.datasource.database = Some(database.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.base.datasource.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.base.set_secure("password", password);
        self
    }

    /// HTTP request timeout, sent in whole seconds.
    pub fn timeout(mut self, timeout: impl AsRef<str>) -> Self {
        if let Some(timeout) = self.base.duration("timeout", timeout.as_ref()) {
            self.base.set_json("timeout", json!(timeout.as_secs()));
        }
        self
    }

    /// Lower bound of the automatic group by time interval.
    pub fn min_time_interval(mut self, interval: impl AsRef<str>) -> Self {
        let interval = interval.as_ref();
        if self.base.duration("timeInterval", interval).is_some() {
            self.base.set_json("timeInterval", json!(interval));
        }
        self
    }

    /// Maximum number of series Grafana processes.
    pub fn max_series(mut self, max: u32) -> Self {
        self.base.set_json("maxSeries", json!(max));
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
    fn test_defaults() {
        let datasource = InfluxDb::new("influx", "http://influx:8086").build().unwrap();

        let model = datasource.model();
        assert_eq!(model.datasource_type, "influxdb");
        assert_eq!(
            serde_json::Value::Object(model.json_data.clone()),
            json!({"version": "InfluxQL", "httpMethod": "GET", "maxSeries": 1000})
        );
    }

    #[test]
    fn test_credentials() {
        let datasource = InfluxDb::new("influx", "http://influx:8086")
            .database("telegraf")
            .user("grafana")
            .password("s3cret")
            .timeout("30s")
            .min_time_interval("1m")
            .build()
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&datasource.to_json().unwrap()).unwrap();
        assert_eq!(value["database"], json!("telegraf"));
        assert_eq!(value["user"], json!("grafana"));
        assert_eq!(value["secureJsonData"], json!({"password": "s3cret"}));
        assert_eq!(value["jsonData"]["timeout"], json!(30));
        assert_eq!(value["jsonData"]["timeInterval"], json!("1m"));
        assert!(!format!("{:?}", datasource).contains("s3cret"));
    }
}
