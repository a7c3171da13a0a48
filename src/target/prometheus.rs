use super::IntoTarget;
use crate::kernel::Builder;
use crate::model::Target;

/// How Grafana shapes the query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    TimeSeries,
    Table,
    Heatmap,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::TimeSeries => "time_series",
            Format::Table => "table",
            Format::Heatmap => "heatmap",
        }
    }
}

/// A PromQL query.
#[derive(Debug, Clone)]
pub struct Prometheus {
    target: Target,
}

impl Builder for Prometheus {}

impl Prometheus {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            target: Target {
                expr: Some(expr.into()),
                format: Some(Format::TimeSeries.as_str().to_string()),
                ..Default::default()
            },
        }
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.target.ref_id = ref_id.into();
        self
    }

    /// Keeps the query referenceable while skipping its execution.
    pub fn hide(mut self) -> Self {
        self.target.hide = Some(true);
        self
    }

    pub fn legend(mut self, legend: impl Into<String>) -> Self {
        self.target.legend_format = Some(legend.into());
        self
    }

    pub fn interval_factor(mut self, factor: u32) -> Self {
        self.target.interval_factor = Some(factor);
        self
    }

    /// Lower limit for the step, e.g. `"30s"`.
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.target.interval = Some(interval.into());
        self
    }

    pub fn step(mut self, step: u32) -> Self {
        self.target.step = Some(step);
        self
    }

    /// Only evaluates the query at the end of the time range.
    pub fn instant(mut self) -> Self {
        self.target.instant = Some(true);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.target.format = Some(format.as_str().to_string());
        self
    }
}

impl IntoTarget for Prometheus {
    fn into_target(self) -> Target {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let target = Prometheus::new("up").into_target();
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({"refId": "", "expr": "up", "format": "time_series"})
        );
    }

    #[test]
    fn test_options() {
        let target = Prometheus::new("rate(http_requests_total[5m])")
            .ref_id("B")
            .legend("{{ code }}")
            .interval_factor(2)
            .interval("30s")
            .step(10)
            .instant()
            .hide()
            .format(Format::Heatmap)
            .into_target();

        assert_eq!(target.ref_id, "B");
        assert_eq!(target.legend_format.as_deref(), Some("{{ code }}"));
        assert_eq!(target.interval_factor, Some(2));
        assert_eq!(target.interval.as_deref(), Some("30s"));
        assert_eq!(target.step, Some(10));
        assert_eq!(target.instant, Some(true));
        assert_eq!(target.hide, Some(true));
        assert_eq!(target.format.as_deref(), Some("heatmap"));
    }

    #[test]
    fn test_last_format_wins() {
        let target = Prometheus::new("up")
            .format(Format::Table)
            .format(Format::TimeSeries)
            .into_target();
        assert_eq!(target.format.as_deref(), Some("time_series"));
    }
}
