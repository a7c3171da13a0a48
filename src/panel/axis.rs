use crate::kernel::{Builder, ErrorSlot};
use crate::model;
use crate::{Error, Result};

const LOG_BASES: [u32; 5] = [1, 2, 10, 32, 1024];

/// Axis of the legacy graph and heatmap panels.
#[derive(Debug, Default)]
pub struct Axis {
    axis: model::Axis,
    errors: ErrorSlot,
}

impl Builder for Axis {}

impl Axis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display unit, e.g. `bytes` or `percentunit`.
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.axis.format = unit.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.axis.label = Some(label.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.axis.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.axis.max = Some(max);
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.axis.decimals = Some(decimals);
        self
    }

    pub fn hide(mut self) -> Self {
        self.axis.show = false;
        self
    }

    /// One of 1 (linear), 2, 10, 32 or 1024.
    pub fn log_base(mut self, base: u32) -> Self {
        if LOG_BASES.contains(&base) {
            self.axis.log_base = base;
        } else {
            self.errors.record(Error::invalid(
                "axis",
                "logBase",
                base,
                "must be one of 1, 2, 10, 32 or 1024",
            ));
        }
        self
    }

    pub(crate) fn build(self) -> Result<model::Axis> {
        self.errors.into_result()?;
        Ok(self.axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let axis = Axis::new().build().unwrap();
        assert_eq!(
            serde_json::to_value(&axis).unwrap(),
            json!({"format": "short", "show": true, "logBase": 1})
        );
    }

    #[test]
    fn test_options() {
        let axis = Axis::new()
            .unit("bytes")
            .label("memory")
            .min(0.0)
            .max(100.0)
            .decimals(2)
            .log_base(2)
            .hide()
            .build()
            .unwrap();

        assert_eq!(axis.format, "bytes");
        assert_eq!(axis.label.as_deref(), Some("memory"));
        assert_eq!(axis.min, Some(0.0));
        assert_eq!(axis.max, Some(100.0));
        assert_eq!(axis.decimals, Some(2));
        assert_eq!(axis.log_base, 2);
        assert!(!axis.show);
    }

    #[test]
    fn test_invalid_log_base() {
        let result = Axis::new().log_base(3).build();
        match result {
            Err(Error::InvalidArgument { field, value, .. }) => {
                assert_eq!(field, "logBase");
                assert_eq!(value, "3");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
