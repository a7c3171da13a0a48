//! Data source definitions, as accepted by `/api/datasources`.

pub mod influxdb;
pub mod loki;
pub mod prometheus;
pub mod stackdriver;

use crate::kernel::ErrorSlot;
use crate::model;
use crate::{Error, Result};
use ringlog::*;
use serde_json::json;
use std::str::FromStr;
use std::time::Duration;

/// How Grafana reaches the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Requests go through the Grafana backend.
    Proxy,
    /// The browser queries the data source itself. Deprecated in Grafana.
    Direct,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Proxy => "proxy",
            Access::Direct => "direct",
        }
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "proxy" => Ok(Access::Proxy),
            "direct" | "browser" => Ok(Access::Direct),
            other => Err(format!("unknown access mode '{}'", other)),
        }
    }
}

/// A built data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasource {
    datasource: model::Datasource,
}

impl Datasource {
    pub fn name(&self) -> &str {
        &self.datasource.name
    }

    pub fn model(&self) -> &model::Datasource {
        &self.datasource
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.datasource)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.datasource)?)
    }
}

/// State shared by every data source builder.
#[derive(Debug)]
pub struct DatasourceBase {
    pub(crate) datasource: model::Datasource,
    errors: ErrorSlot,
}

impl DatasourceBase {
    pub(crate) fn new(name: impl Into<String>, datasource_type: &str, url: Option<String>) -> Self {
        let mut datasource = model::Datasource::new(name, datasource_type);
        datasource.url = url;
        Self {
            datasource,
            errors: ErrorSlot::default(),
        }
    }

    fn resource(&self) -> String {
        format!(
            "{} datasource '{}'",
            self.datasource.datasource_type, self.datasource.name
        )
    }

    pub(crate) fn set_json(&mut self, key: &str, value: serde_json::Value) {
        self.datasource.json_data.insert(key.to_string(), value);
    }

    pub(crate) fn set_secure(&mut self, key: &str, value: impl Into<String>) {
        self.datasource.secure_json_data.insert(key, value);
    }

    pub(crate) fn invalid(&mut self, field: &str, value: impl std::fmt::Display, reason: &str) {
        let err = Error::invalid(self.resource(), field, value, reason);
        self.errors.record(err);
    }

    /// Parses a human readable duration such as `15s` or `1m30s`.
    pub(crate) fn duration(&mut self, field: &str, value: &str) -> Option<Duration> {
        match humantime::parse_duration(value) {
            Ok(duration) => Some(duration),
            Err(e) => {
                self.invalid(field, value, &e.to_string());
                None
            }
        }
    }

    /// Accepts GET or POST in any case.
    pub(crate) fn http_method(&mut self, method: &str) {
        let method = method.to_uppercase();
        if method == "GET" || method == "POST" {
            self.set_json("httpMethod", json!(method));
        } else {
            self.invalid("httpMethod", method, "must be GET or POST");
        }
    }

    pub(crate) fn finish(self) -> Result<Datasource> {
        self.errors.into_result()?;
        debug!(
            "built {} datasource '{}'",
            self.datasource.datasource_type, self.datasource.name
        );
        Ok(Datasource {
            datasource: self.datasource,
        })
    }
}

/// Settings common to the HTTP based data sources.
pub trait CommonSettings: Sized {
    fn base_mut(&mut self) -> &mut DatasourceBase;

    /// Makes this data source the default one of the organization.
    fn default(mut self) -> Self {
        self.base_mut().datasource.is_default = true;
        self
    }

    fn access_mode(mut self, access: Access) -> Self {
        self.base_mut().datasource.access = access.as_str().to_string();
        self
    }

    fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        let base = self.base_mut();
        base.datasource.basic_auth = Some(true);
        base.datasource.basic_auth_user = Some(username.into());
        base.set_secure("basicAuthPassword", password);
        self
    }

    fn skip_tls_verify(mut self) -> Self {
        self.base_mut().set_json("tlsSkipVerify", json!(true));
        self
    }

    /// Trusts a self-signed CA certificate, PEM encoded.
    fn with_certificate(mut self, certificate: impl Into<String>) -> Self {
        let base = self.base_mut();
        base.set_json("tlsSkipVerify", json!(false));
        base.set_json("tlsAuthWithCACert", json!(true));
        base.set_secure("tlsCACert", certificate);
        self
    }

    /// Enables TLS client authentication. Expects PEM encoded content.
    fn tls_client_auth(mut self, certificate: impl Into<String>, key: impl Into<String>) -> Self {
        let base = self.base_mut();
        base.set_json("tlsAuth", json!(true));
        base.set_secure("tlsClientCert", certificate);
        base.set_secure("tlsClientKey", key);
        self
    }

    /// Sends cookies and auth headers along with cross-site requests.
    fn with_credentials(mut self) -> Self {
        self.base_mut().datasource.with_credentials = true;
        self
    }

    /// Passes the user's upstream OAuth token to the data source.
    fn forward_oauth_identity(mut self) -> Self {
        self.base_mut().set_json("oauthPassThru", json!(true));
        self
    }

    fn forward_cookies<I, S>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cookies: Vec<String> = cookies.into_iter().map(Into::into).collect();
        self.base_mut().set_json("keepCookies", json!(cookies));
        self
    }
}
