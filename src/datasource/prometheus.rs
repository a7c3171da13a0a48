use super::{Access, CommonSettings, Datasource, DatasourceBase};
use crate::kernel::Builder;
use crate::Result;
use serde::Serialize;
use serde_json::json;

/// Link from an exemplar label to a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exemplar {
    /// Label holding the trace id.
    #[serde(rename = "name")]
    pub label_name: String,
    /// Internal link: the data source the trace is opened in.
    #[serde(rename = "datasourceUid")]
    pub datasource_uid: String,
    /// External link: URL of the trace backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug)]
pub struct Prometheus {
    base: DatasourceBase,
}

impl Builder for Prometheus {}

impl CommonSettings for Prometheus {
    fn base_mut(&mut self) -> &mut DatasourceBase {
        &mut self.base
    }
}

impl Prometheus {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            base: DatasourceBase::new(name, "prometheus", Some(url.into())),
        }
        .http_method("POST")
        .access_mode(Access::Proxy)
    }

    /// GET is needed for Prometheus older than 2.1.
    pub fn http_method(mut self, method: impl AsRef<str>) -> Self {
        self.base.http_method(method.as_ref());
        self
    }

    /// Typical scrape and evaluation interval of the server.
    pub fn scrape_interval(mut self, interval: impl AsRef<str>) -> Self {
        let interval = interval.as_ref();
        if self.base.duration("timeInterval", interval).is_some() {
            self.base.set_json("timeInterval", json!(interval));
        }
        self
    }

    pub fn query_timeout(mut self, timeout: impl AsRef<str>) -> Self {
        let timeout = timeout.as_ref();
        if self.base.duration("queryTimeout", timeout).is_some() {
            self.base.set_json("queryTimeout", json!(timeout));
        }
        self
    }

    pub fn exemplars<I>(mut self, exemplars: I) -> Self
    where
        I: IntoIterator<Item = Exemplar>,
    {
        let exemplars: Vec<Exemplar> = exemplars.into_iter().collect();
        self.base
            .set_json("exemplarTraceIdDestinations", json!(exemplars));
        self
    }

    pub fn build(self) -> Result<Datasource> {
        self.base.finish()
    }
}
