//! Data source queries evaluated by an alert rule.
//!
//! Queries are created with a placeholder data source uid. When the alert is
//! attached to a panel, the panel's data source takes its place.

use crate::model::{AlertModel, AlertQuery, DatasourceRef, RelativeTimeRange, Target};
use std::time::Duration;

/// Data source uid left for the panel (or external tooling) to fill.
pub const DATASOURCE_PLACEHOLDER: &str = "__FILL_ME__";

const DEFAULT_INTERVAL_MS: u64 = 15_000;

/// Conversion of a query builder into an entry of an alert rule's `data`.
pub trait IntoAlertQuery {
    fn into_alert_query(self) -> AlertQuery;
}

impl IntoAlertQuery for AlertQuery {
    fn into_alert_query(self) -> AlertQuery {
        self
    }
}

#[derive(Debug, Clone)]
struct Query {
    datasource_type: &'static str,
    from: Duration,
    to: Duration,
    target: Target,
}

impl Query {
    fn new(datasource_type: &'static str, ref_id: String, lookback: Duration) -> Self {
        Self {
            datasource_type,
            from: lookback,
            to: Duration::ZERO,
            target: Target {
                ref_id,
                format: Some("time_series".to_string()),
                hide: Some(false),
                ..Default::default()
            },
        }
    }

    fn into_alert_query(self) -> AlertQuery {
        let mut target = self.target;
        target.datasource = Some(DatasourceRef::uid(
            self.datasource_type,
            DATASOURCE_PLACEHOLDER,
        ));

        AlertQuery {
            ref_id: target.ref_id.clone(),
            query_type: String::new(),
            relative_time_range: Some(RelativeTimeRange {
                from: self.from.as_secs(),
                to: self.to.as_secs(),
            }),
            datasource_uid: DATASOURCE_PLACEHOLDER.to_string(),
            model: AlertModel {
                query: target,
                interval_ms: Some(DEFAULT_INTERVAL_MS),
                ..Default::default()
            },
        }
    }
}

macro_rules! alert_query {
    ($(#[$meta:meta])* $name:ident, $datasource_type:literal, $lookback:expr, |$target:ident, $query:ident| $fill:block) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: Query,
        }

        impl crate::kernel::Builder for $name {}

        impl $name {
            pub fn new(ref_id: impl Into<String>, query: impl Into<String>) -> Self {
                let mut inner = Query::new($datasource_type, ref_id.into(), $lookback);
                let $target = &mut inner.target;
                let $query: String = query.into();
                $fill
                Self { inner }
            }

            pub fn legend(mut self, legend: impl Into<String>) -> Self {
                self.inner.target.legend_format = Some(legend.into());
                self
            }

            /// Evaluated window, as durations before now.
            pub fn time_range(mut self, from: Duration, to: Duration) -> Self {
                self.inner.from = from;
                self.inner.to = to;
                self
            }
        }

        impl IntoAlertQuery for $name {
            fn into_alert_query(self) -> AlertQuery {
                self.inner.into_alert_query()
            }
        }
    };
}

alert_query!(
    /// PromQL alert query. Looks back one hour by default.
    Prometheus,
    "prometheus",
    Duration::from_secs(3600),
    |target, query| {
        target.expr = Some(query);
    }
);

alert_query!(
    Loki,
    "loki",
    Duration::from_secs(600),
    |target, query| {
        target.expr = Some(query);
    }
);

alert_query!(
    Graphite,
    "graphite",
    Duration::from_secs(600),
    |target, query| {
        target.target = Some(query);
    }
);

alert_query!(
    InfluxDB,
    "influxdb",
    Duration::from_secs(600),
    |target, query| {
        target.query = Some(query);
        target.raw_query = Some(true);
    }
);

alert_query!(
    /// CloudWatch metric math expression.
    CloudWatch,
    "cloudwatch",
    Duration::from_secs(600),
    |target, query| {
        target.expression = Some(query);
    }
);

alert_query!(
    /// Cloud Monitoring time-series list, given as a filter expression.
    Stackdriver,
    "stackdriver",
    Duration::from_secs(600),
    |target, query| {
        target.expr = Some(query);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Builder;
    use serde_json::json;

    #[test]
    fn test_prometheus_query() {
        let query = Prometheus::new("A", "sum(rate(errors_total[5m]))")
            .legend("errors")
            .into_alert_query();

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "refId": "A",
                "queryType": "",
                "relativeTimeRange": {"from": 3600, "to": 0},
                "datasourceUid": "__FILL_ME__",
                "model": {
                    "refId": "A",
                    "hide": false,
                    "datasource": {"type": "prometheus", "uid": "__FILL_ME__"},
                    "expr": "sum(rate(errors_total[5m]))",
                    "legendFormat": "errors",
                    "format": "time_series",
                    "intervalMs": 15000
                }
            })
        );
    }

    #[test]
    fn test_family_specific_fields() {
        let graphite = Graphite::new("A", "stats.errors").into_alert_query();
        assert_eq!(graphite.model.query.target.as_deref(), Some("stats.errors"));
        assert_eq!(graphite.relative_time_range.unwrap().from, 600);

        let influx = InfluxDB::new("B", "SELECT 1").into_alert_query();
        assert_eq!(influx.model.query.query.as_deref(), Some("SELECT 1"));
        assert_eq!(influx.model.query.raw_query, Some(true));
    }

    #[test]
    fn test_time_range() {
        let query = Loki::new("A", "count_over_time({app=\"api\"}[5m])")
            .with(|q| q.time_range(Duration::from_secs(1800), Duration::from_secs(60)))
            .into_alert_query();

        let range = query.relative_time_range.unwrap();
        assert_eq!(range.from, 1800);
        assert_eq!(range.to, 60);
    }
}
