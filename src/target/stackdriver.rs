//! Google Cloud Monitoring (formerly Stackdriver) queries.
//!
//! Cloud Monitoring targets come in four shapes, told apart by `queryType`:
//! metric time-series lists ([`Stackdriver`]), MQL queries ([`Mql`]), PromQL
//! queries ([`PromQl`]) and service level objectives ([`Slo`]).

use super::IntoTarget;
use crate::kernel::Builder;
use crate::model::{PromQLQuery, SloQuery, Target, TimeSeriesList, TimeSeriesQuery};

/// Alignment period chosen by Cloud Monitoring from the query range.
pub const ALIGNMENT_CLOUD_MONITORING_AUTO: &str = "cloud-monitoring-auto";
/// Alignment period derived by Grafana from the panel interval.
pub const ALIGNMENT_GRAFANA_AUTO: &str = "grafana-auto";

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }
    };
}

string_enum!(
    /// Operation applied to the data points of each alignment period.
    Aligner {
        None => "ALIGN_NONE",
        Delta => "ALIGN_DELTA",
        Rate => "ALIGN_RATE",
        Interpolate => "ALIGN_INTERPOLATE",
        NextOlder => "ALIGN_NEXT_OLDER",
        Min => "ALIGN_MIN",
        Max => "ALIGN_MAX",
        Mean => "ALIGN_MEAN",
        Count => "ALIGN_COUNT",
        Sum => "ALIGN_SUM",
        StdDev => "ALIGN_STDDEV",
        CountTrue => "ALIGN_COUNT_TRUE",
        CountFalse => "ALIGN_COUNT_FALSE",
        FractionTrue => "ALIGN_FRACTION_TRUE",
        Percentile99 => "ALIGN_PERCENTILE_99",
        Percentile95 => "ALIGN_PERCENTILE_95",
        Percentile50 => "ALIGN_PERCENTILE_50",
        Percentile05 => "ALIGN_PERCENTILE_05",
        PercentChange => "ALIGN_PERCENT_CHANGE",
    }
);

string_enum!(
    /// Aggregation of several aligned time series into one.
    Reducer {
        None => "REDUCE_NONE",
        Mean => "REDUCE_MEAN",
        Min => "REDUCE_MIN",
        Max => "REDUCE_MAX",
        Sum => "REDUCE_SUM",
        StdDev => "REDUCE_STDDEV",
        Count => "REDUCE_COUNT",
        CountTrue => "REDUCE_COUNT_TRUE",
        CountFalse => "REDUCE_COUNT_FALSE",
        FractionTrue => "REDUCE_FRACTION_TRUE",
        Percentile99 => "REDUCE_PERCENTILE_99",
        Percentile95 => "REDUCE_PERCENTILE_95",
        Percentile50 => "REDUCE_PERCENTILE_50",
        Percentile05 => "REDUCE_PERCENTILE_05",
    }
);

string_enum!(
    Preprocessor {
        None => "none",
        Rate => "rate",
        Delta => "delta",
    }
);

string_enum!(
    FilterOp {
        Eq => "=",
        Neq => "!=",
        Matches => "=~",
        NotMatches => "!=~",
    }
);

string_enum!(
    GraphPeriod {
        Disabled => "disabled",
        Auto => "auto",
    }
);

impl std::str::FromStr for Aligner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALIGNERS
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown aligner '{}'", s))
    }
}

impl std::str::FromStr for Reducer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REDUCERS
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown reducer '{}'", s))
    }
}

const ALIGNERS: [Aligner; 19] = [
    Aligner::None,
    Aligner::Delta,
    Aligner::Rate,
    Aligner::Interpolate,
    Aligner::NextOlder,
    Aligner::Min,
    Aligner::Max,
    Aligner::Mean,
    Aligner::Count,
    Aligner::Sum,
    Aligner::StdDev,
    Aligner::CountTrue,
    Aligner::CountFalse,
    Aligner::FractionTrue,
    Aligner::Percentile99,
    Aligner::Percentile95,
    Aligner::Percentile50,
    Aligner::Percentile05,
    Aligner::PercentChange,
];

const REDUCERS: [Reducer; 14] = [
    Reducer::None,
    Reducer::Mean,
    Reducer::Min,
    Reducer::Max,
    Reducer::Sum,
    Reducer::StdDev,
    Reducer::Count,
    Reducer::CountTrue,
    Reducer::CountFalse,
    Reducer::FractionTrue,
    Reducer::Percentile99,
    Reducer::Percentile95,
    Reducer::Percentile50,
    Reducer::Percentile05,
];

/// Metric time-series list query.
///
/// The metric type is always the first filter. Additional filters are
/// appended in call order, joined with `AND`.
#[derive(Debug, Clone)]
pub struct Stackdriver {
    ref_id: String,
    hide: bool,
    alias_by: Option<String>,
    list: TimeSeriesList,
}

impl Builder for Stackdriver {}

impl Stackdriver {
    pub fn new(metric_type: impl Into<String>) -> Self {
        Self {
            ref_id: String::new(),
            hide: false,
            alias_by: None,
            list: TimeSeriesList {
                filters: vec![
                    "metric.type".to_string(),
                    FilterOp::Eq.as_str().to_string(),
                    metric_type.into(),
                ],
                ..Default::default()
            },
        }
        .aggregation(Reducer::Mean)
        .alignment(Aligner::Delta, ALIGNMENT_CLOUD_MONITORING_AUTO)
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }

    pub fn hide(mut self) -> Self {
        self.hide = true;
        self
    }

    /// Alias pattern, e.g. `{{metric.label.instance_name}}`.
    pub fn legend(mut self, legend: impl Into<String>) -> Self {
        self.alias_by = Some(legend.into());
        self
    }

    /// Project to query. Grafana falls back to the data source's default
    /// project when it is left empty.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.list.project_name = project.into();
        self
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<String>,
    ) -> Self {
        self.list.filters.push("AND".to_string());
        self.list.filters.push(field.into());
        self.list.filters.push(op.as_str().to_string());
        self.list.filters.push(value.into());
        self
    }

    pub fn group_bys<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list.group_bys = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn aggregation(mut self, reducer: Reducer) -> Self {
        self.list.cross_series_reducer = Some(reducer.as_str().to_string());
        self
    }

    pub fn alignment(mut self, aligner: Aligner, period: impl Into<String>) -> Self {
        self.list.per_series_aligner = Some(aligner.as_str().to_string());
        self.list.alignment_period = Some(period.into());
        self
    }

    pub fn preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.list.preprocessor = Some(preprocessor.as_str().to_string());
        self
    }

    /// `FULL` or `HEADERS`.
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.list.view = Some(view.into());
        self
    }

    pub fn secondary_aggregation(mut self, reducer: Reducer) -> Self {
        self.list.secondary_cross_series_reducer = Some(reducer.as_str().to_string());
        self
    }

    pub fn secondary_alignment(mut self, aligner: Aligner, period: impl Into<String>) -> Self {
        self.list.secondary_per_series_aligner = Some(aligner.as_str().to_string());
        self.list.secondary_alignment_period = Some(period.into());
        self
    }

    pub fn secondary_group_bys<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list.secondary_group_bys = fields.into_iter().map(Into::into).collect();
        self
    }
}

impl IntoTarget for Stackdriver {
    fn into_target(self) -> Target {
        Target {
            ref_id: self.ref_id,
            hide: self.hide.then_some(true),
            query_type: Some("timeSeriesList".to_string()),
            alias_by: self.alias_by,
            time_series_list: Some(self.list),
            ..Default::default()
        }
    }
}

/// Monitoring Query Language query.
#[derive(Debug, Clone)]
pub struct Mql {
    ref_id: String,
    hide: bool,
    alias_by: Option<String>,
    query: TimeSeriesQuery,
}

impl Builder for Mql {}

impl Mql {
    pub fn new(project: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            ref_id: String::new(),
            hide: false,
            alias_by: None,
            query: TimeSeriesQuery {
                project_name: project.into(),
                query: query.into(),
                graph_period: None,
            },
        }
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }

    pub fn hide(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn legend(mut self, legend: impl Into<String>) -> Self {
        self.alias_by = Some(legend.into());
        self
    }

    pub fn graph_period(mut self, period: GraphPeriod) -> Self {
        self.query.graph_period = Some(period.as_str().to_string());
        self
    }
}

impl IntoTarget for Mql {
    fn into_target(self) -> Target {
        Target {
            ref_id: self.ref_id,
            hide: self.hide.then_some(true),
            query_type: Some("timeSeriesQuery".to_string()),
            alias_by: self.alias_by,
            time_series_query: Some(self.query),
            ..Default::default()
        }
    }
}

/// PromQL evaluated by Cloud Monitoring.
#[derive(Debug, Clone)]
pub struct PromQl {
    ref_id: String,
    hide: bool,
    query: PromQLQuery,
}

impl Builder for PromQl {}

impl PromQl {
    pub fn new(project: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            ref_id: String::new(),
            hide: false,
            query: PromQLQuery {
                project_name: project.into(),
                expr: expr.into(),
                step: "10s".to_string(),
            },
        }
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }

    pub fn hide(mut self) -> Self {
        self.hide = true;
        self
    }

    /// Minimum step between two points.
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.query.step = step.into();
        self
    }
}

impl IntoTarget for PromQl {
    fn into_target(self) -> Target {
        Target {
            ref_id: self.ref_id,
            hide: self.hide.then_some(true),
            query_type: Some("promQL".to_string()),
            promql_query: Some(self.query),
            ..Default::default()
        }
    }
}

/// Service level objective query.
#[derive(Debug, Clone)]
pub struct Slo {
    ref_id: String,
    hide: bool,
    query: SloQuery,
}

impl Builder for Slo {}

impl Slo {
    pub fn new(
        project: impl Into<String>,
        service_id: impl Into<String>,
        slo_id: impl Into<String>,
    ) -> Self {
        Self {
            ref_id: String::new(),
            hide: false,
            query: SloQuery {
                project_name: project.into(),
                service_id: Some(service_id.into()),
                slo_id: Some(slo_id.into()),
                selector_name: Some("select_slo_health".to_string()),
                alignment_period: Some(ALIGNMENT_CLOUD_MONITORING_AUTO.to_string()),
                per_series_aligner: Some(Aligner::Mean.as_str().to_string()),
                ..Default::default()
            },
        }
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }

    pub fn hide(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn legend(mut self, legend: impl Into<String>) -> Self {
        self.query.alias_by = Some(legend.into());
        self
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.query.service_name = Some(name.into());
        self
    }

    pub fn slo_name(mut self, name: impl Into<String>) -> Self {
        self.query.slo_name = Some(name.into());
        self
    }

    /// `select_slo_health`, `select_slo_compliance` or `select_slo_budget_fraction`.
    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.query.selector_name = Some(selector.into());
        self
    }

    pub fn alignment(mut self, aligner: Aligner, period: impl Into<String>) -> Self {
        self.query.per_series_aligner = Some(aligner.as_str().to_string());
        self.query.alignment_period = Some(period.into());
        self
    }

    pub fn lookback_period(mut self, period: impl Into<String>) -> Self {
        self.query.lookback_period = Some(period.into());
        self
    }
}

impl IntoTarget for Slo {
    fn into_target(self) -> Target {
        Target {
            ref_id: self.ref_id,
            hide: self.hide.then_some(true),
            query_type: Some("slo".to_string()),
            slo_query: Some(self.query),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_series_list_defaults() {
        let target = Stackdriver::new("pubsub.googleapis.com/subscription/ack_message_count")
            .into_target();
        let value = serde_json::to_value(&target).unwrap();

        assert_eq!(value["queryType"], json!("timeSeriesList"));
        assert_eq!(
            value["timeSeriesList"],
            json!({
                "projectName": "",
                "filters": [
                    "metric.type", "=", "pubsub.googleapis.com/subscription/ack_message_count"
                ],
                "crossSeriesReducer": "REDUCE_MEAN",
                "perSeriesAligner": "ALIGN_DELTA",
                "alignmentPeriod": "cloud-monitoring-auto"
            })
        );
    }

    #[test]
    fn test_filters_are_and_joined() {
        let target = Stackdriver::new("compute.googleapis.com/instance/cpu/utilization")
            .project("my-project")
            .filter("resource.label.zone", FilterOp::Eq, "europe-west1-b")
            .filter("metric.label.instance_name", FilterOp::NotMatches, "gke-.*")
            .group_bys(["resource.label.zone"])
            .aggregation(Reducer::Max)
            .alignment(Aligner::Mean, ALIGNMENT_GRAFANA_AUTO)
            .legend("{{resource.label.zone}}")
            .into_target();

        let list = target.time_series_list.as_ref().unwrap();
        assert_eq!(list.project_name, "my-project");
        assert_eq!(
            list.filters,
            vec![
                "metric.type",
                "=",
                "compute.googleapis.com/instance/cpu/utilization",
                "AND",
                "resource.label.zone",
                "=",
                "europe-west1-b",
                "AND",
                "metric.label.instance_name",
                "!=~",
                "gke-.*",
            ]
        );
        assert_eq!(list.group_bys, vec!["resource.label.zone"]);
        assert_eq!(list.cross_series_reducer.as_deref(), Some("REDUCE_MAX"));
        assert_eq!(list.per_series_aligner.as_deref(), Some("ALIGN_MEAN"));
        assert_eq!(list.alignment_period.as_deref(), Some("grafana-auto"));
        assert_eq!(target.alias_by.as_deref(), Some("{{resource.label.zone}}"));
    }

    #[test]
    fn test_mql_query() {
        let target = Mql::new("my-project", "fetch gce_instance | metric 'cpu'")
            .graph_period(GraphPeriod::Disabled)
            .ref_id("B")
            .into_target();

        let value = serde_json::to_value(&target).unwrap();
        assert_eq!(value["queryType"], json!("timeSeriesQuery"));
        assert_eq!(
            value["timeSeriesQuery"],
            json!({
                "projectName": "my-project",
                "query": "fetch gce_instance | metric 'cpu'",
                "graphPeriod": "disabled"
            })
        );
    }

    #[test]
    fn test_promql_default_step() {
        let target = PromQl::new("my-project", "up").into_target();
        assert_eq!(target.query_type.as_deref(), Some("promQL"));
        assert_eq!(target.promql_query.unwrap().step, "10s");
    }

    #[test]
    fn test_slo_query() {
        let target = Slo::new("my-project", "svc", "availability")
            .lookback_period("1h")
            .into_target();

        let slo = target.slo_query.unwrap();
        assert_eq!(target.query_type.as_deref(), Some("slo"));
        assert_eq!(slo.service_id.as_deref(), Some("svc"));
        assert_eq!(slo.slo_id.as_deref(), Some("availability"));
        assert_eq!(slo.selector_name.as_deref(), Some("select_slo_health"));
        assert_eq!(slo.lookback_period.as_deref(), Some("1h"));
    }

    #[test]
    fn test_parse_aligner_and_reducer() {
        assert_eq!("align_rate".parse::<Aligner>().unwrap(), Aligner::Rate);
        assert_eq!("REDUCE_SUM".parse::<Reducer>().unwrap(), Reducer::Sum);
        assert!("ALIGN_UNKNOWN".parse::<Aligner>().is_err());
    }
}
