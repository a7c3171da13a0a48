use super::IntoTarget;
use crate::kernel::Builder;
use crate::model::Target;
use std::collections::BTreeMap;

/// A CloudWatch metric query.
#[derive(Debug, Clone)]
pub struct CloudWatch {
    target: Target,
}

impl Builder for CloudWatch {}

impl CloudWatch {
    pub fn new(metric_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            target: Target {
                metric_name: Some(metric_name.into()),
                namespace: Some(namespace.into()),
                region: Some("default".to_string()),
                statistics: Some(vec!["Average".to_string()]),
                query_mode: Some("Metrics".to_string()),
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

    pub fn legend(mut self, label: impl Into<String>) -> Self {
        self.target.label = Some(label.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.target.region = Some(region.into());
        self
    }

    pub fn statistics<I, S>(mut self, statistics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target.statistics = Some(statistics.into_iter().map(Into::into).collect());
        self
    }

    pub fn dimensions<I, K, V>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let dimensions: BTreeMap<String, String> = dimensions
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.target.dimensions = Some(dimensions);
        self
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.target.period = Some(period.into());
        self
    }

    /// Metric math expression evaluated on top of the metric query.
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.target.expression = Some(expression.into());
        self
    }

    pub fn match_exact(mut self, exact: bool) -> Self {
        self.target.match_exact = Some(exact);
        self
    }
}

impl IntoTarget for CloudWatch {
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
        let target = CloudWatch::new("CPUUtilization", "AWS/EC2").into_target();
        let value = serde_json::to_value(&target).unwrap();

        assert_eq!(value["metricName"], json!("CPUUtilization"));
        assert_eq!(value["namespace"], json!("AWS/EC2"));
        assert_eq!(value["region"], json!("default"));
        assert_eq!(value["statistics"], json!(["Average"]));
        assert_eq!(value["queryMode"], json!("Metrics"));
    }

    #[test]
    fn test_options() {
        let target = CloudWatch::new("CPUUtilization", "AWS/EC2")
            .ref_id("A")
            .region("eu-west-3")
            .statistics(["Maximum", "Minimum"])
            .dimensions([("InstanceId", "i-abc")])
            .period("300")
            .legend("{{ InstanceId }}")
            .match_exact(true)
            .into_target();

        let value = serde_json::to_value(&target).unwrap();
        assert_eq!(value["region"], json!("eu-west-3"));
        assert_eq!(value["statistics"], json!(["Maximum", "Minimum"]));
        assert_eq!(value["dimensions"], json!({"InstanceId": "i-abc"}));
        assert_eq!(value["period"], json!("300"));
        assert_eq!(value["label"], json!("{{ InstanceId }}"));
        assert_eq!(value["matchExact"], json!(true));
    }
}
