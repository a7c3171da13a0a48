use super::IntoTarget;
use crate::kernel::Builder;
use crate::model::Target;

/// An InfluxQL or Flux query, always sent raw and read as time series.
#[derive(Debug, Clone)]
pub struct InfluxDB {
    target: Target,
}

impl Builder for InfluxDB {}

impl InfluxDB {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            target: Target {
                query: Some(query.into()),
                raw_query: Some(true),
                result_format: Some("time_series".to_string()),
                ..Default::default()
            },
        }
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.target.ref_id = ref_id.into();
        self
    }

    pub fn hide(mut self) -> Self {
        self.target.hide = Some(true);
        self
    }
}

impl IntoTarget for InfluxDB {
    fn into_target(self) -> Target {
        self.target
    }
}
