use super::{set_default, IntoVariable, VariableOptions};
use crate::kernel::{Builder, ErrorSlot};
use crate::model::{TemplateVar, VarOption};
use crate::{Error, Result};
use std::time::Duration;

/// A choice of durations, typically used as `rate(x[$interval])`.
#[derive(Debug)]
pub struct Interval {
    var: TemplateVar,
    errors: ErrorSlot,
}

impl Builder for Interval {}

impl VariableOptions for Interval {
    fn var_mut(&mut self) -> &mut TemplateVar {
        &mut self.var
    }
}

impl Interval {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            var: TemplateVar::new(name, "interval"),
            errors: ErrorSlot::default(),
        }
    }

    /// Durations such as `30s` or `1h`, sorted shortest first.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed: Vec<(Duration, String)> = Vec::new();
        for value in values {
            let value = value.into();
            match humantime::parse_duration(&value) {
                Ok(duration) => parsed.push((duration, value)),
                Err(e) => {
                    let resource = format!("interval variable '{}'", self.var.name);
                    self.errors
                        .record(Error::invalid(resource, "values", &value, e.to_string()));
                }
            }
        }
        parsed.sort_by_key(|(duration, _)| *duration);

        self.var.options = parsed
            .iter()
            .map(|(_, value)| VarOption::new(value.as_str(), value.as_str()))
            .collect();
        self.var.query = parsed
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self
    }

    pub fn default(mut self, value: impl AsRef<str>) -> Self {
        set_default(&mut self.var, value.as_ref());
        self
    }
}

impl IntoVariable for Interval {
    fn into_variable(self) -> Result<TemplateVar> {
        self.errors.into_result()?;
        Ok(self.var)
    }
}
