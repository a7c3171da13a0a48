use super::value::*;
use crate::alert::query;
use crate::alert::{Alert, ErrorMode, Evaluator, IntoAlertQuery, NoDataMode, Operator, Reducer};
use crate::model::{AlertQuery, Target};
use crate::target::stackdriver::{self, Aligner, FilterOp, Preprocessor};
use crate::target::{CloudWatch, Format, Graphite, InfluxDB, IntoTarget, Loki, Prometheus, Stackdriver};
use crate::{Error, Result};
use std::time::Duration;
use yaml_rust::Yaml;

const TARGET_KINDS: [&str; 6] = [
    "prometheus",
    "loki",
    "graphite",
    "influxdb",
    "stackdriver",
    "cloudwatch",
];

/// Decodes one `targets` entry of a panel.
pub(super) fn decode_target(v: &Yaml, path: &str) -> Result<Target> {
    let (kind, v, path) = variant(v, path, &TARGET_KINDS)?;
    let target = match kind {
        "prometheus" => decode_prometheus(v, &path)?.into_target(),
        "loki" => decode_loki(v, &path)?.into_target(),
        "graphite" => {
            let mut target = Graphite::new(required_string(v, &path, "query")?);
            for (key, value, path) in entries(v, &path)? {
                target = match key {
                    "query" => target,
                    "ref" => target.ref_id(as_string(value, &path)?),
                    "hidden" => flag(target, value, &path, Graphite::hide)?,
                    _ => return Err(unknown_key(&path)),
                };
            }
            target.into_target()
        }
        "influxdb" => {
            let mut target = InfluxDB::new(required_string(v, &path, "query")?);
            for (key, value, path) in entries(v, &path)? {
                target = match key {
                    "query" => target,
                    "ref" => target.ref_id(as_string(value, &path)?),
                    "hidden" => flag(target, value, &path, InfluxDB::hide)?,
                    _ => return Err(unknown_key(&path)),
                };
            }
            target.into_target()
        }
        "stackdriver" => decode_stackdriver(v, &path)?.into_target(),
        _ => decode_cloudwatch(v, &path)?.into_target(),
    };
    Ok(target)
}

fn decode_prometheus(v: &Yaml, path: &str) -> Result<Prometheus> {
    let mut target = Prometheus::new(required_string(v, path, "query")?);
    for (key, value, path) in entries(v, path)? {
        target = match key {
            "query" => target,
            "ref" => target.ref_id(as_string(value, &path)?),
            "hidden" => flag(target, value, &path, Prometheus::hide)?,
            "legend" => target.legend(as_string(value, &path)?),
            "format" => target.format(match as_string(value, &path)?.as_str() {
                "time_series" => Format::TimeSeries,
                "table" => Format::Table,
                "heatmap" => Format::Heatmap,
                other => {
                    return Err(Error::decode(path, format!("unknown format '{}'", other)));
                }
            }),
            "instant" => flag(target, value, &path, Prometheus::instant)?,
            "interval_factor" => target.interval_factor(as_u32(value, &path)?),
            "interval" => target.interval(as_string(value, &path)?),
            "step" => target.step(as_u32(value, &path)?),
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(target)
}

/// Loki targets are also the only targets of logs panels.
pub(super) fn decode_loki(v: &Yaml, path: &str) -> Result<Loki> {
    let mut target = Loki::new(required_string(v, path, "query")?);
    for (key, value, path) in entries(v, path)? {
        target = match key {
            "query" => target,
            "ref" => target.ref_id(as_string(value, &path)?),
            "hidden" => flag(target, value, &path, Loki::hide)?,
            "legend" => target.legend(as_string(value, &path)?),
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(target)
}

// Accepts both the short form (`delta`, `mean`) and the wire form
// (`ALIGN_DELTA`, `REDUCE_MEAN`).
fn aligner(v: &Yaml, path: &str) -> Result<Aligner> {
    let name = as_string(v, path)?;
    name.parse()
        .or_else(|_| format!("ALIGN_{}", name).parse())
        .map_err(|e: String| Error::decode(path, e))
}

fn reducer(v: &Yaml, path: &str) -> Result<stackdriver::Reducer> {
    let name = as_string(v, path)?;
    name.parse()
        .or_else(|_| format!("REDUCE_{}", name).parse())
        .map_err(|e: String| Error::decode(path, e))
}

fn decode_stackdriver(v: &Yaml, path: &str) -> Result<Stackdriver> {
    let mut target = Stackdriver::new(required_string(v, path, "metric")?);
    for (key, value, path) in entries(v, path)? {
        target = match key {
            "metric" => target,
            "ref" => target.ref_id(as_string(value, &path)?),
            "hidden" => flag(target, value, &path, Stackdriver::hide)?,
            "legend" => target.legend(as_string(value, &path)?),
            "project" => target.project(as_string(value, &path)?),
            "aggregation" => target.aggregation(reducer(value, &path)?),
            "group_by" => target.group_bys(as_string_list(value, &path)?),
            "preprocessor" => target.preprocessor(match as_string(value, &path)?.as_str() {
                "none" => Preprocessor::None,
                "rate" => Preprocessor::Rate,
                "delta" => Preprocessor::Delta,
                other => {
                    return Err(Error::decode(
                        path,
                        format!("unknown preprocessor '{}'", other),
                    ));
                }
            }),
            "alignment" => {
                let method = lookup(value, "method")
                    .ok_or_else(|| Error::decode(child(&path, "method"), "missing required key"))?;
                let method = aligner(method, &child(&path, "method"))?;
                let period = optional_string(value, &path, "period")?
                    .unwrap_or_else(|| stackdriver::ALIGNMENT_CLOUD_MONITORING_AUTO.to_string());
                for (key, _, path) in entries(value, &path)? {
                    if key != "method" && key != "period" {
                        return Err(unknown_key(&path));
                    }
                }
                target.alignment(method, period)
            }
            "filters" => {
                let mut target = target;
                for (op, labels, path) in entries(value, &path)? {
                    let op = match op {
                        "eq" => FilterOp::Eq,
                        "neq" => FilterOp::Neq,
                        "matches" => FilterOp::Matches,
                        "not_matches" => FilterOp::NotMatches,
                        _ => return Err(unknown_key(&path)),
                    };
                    for (field, value) in as_string_pairs(labels, &path)? {
                        target = target.filter(field, op, value);
                    }
                }
                target
            }
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(target)
}

fn decode_cloudwatch(v: &Yaml, path: &str) -> Result<CloudWatch> {
    let mut target = CloudWatch::new(
        required_string(v, path, "metric_name")?,
        required_string(v, path, "namespace")?,
    );
    for (key, value, path) in entries(v, path)? {
        target = match key {
            "metric_name" | "namespace" => target,
            "ref" => target.ref_id(as_string(value, &path)?),
            "hidden" => flag(target, value, &path, CloudWatch::hide)?,
            "label" | "legend" => target.legend(as_string(value, &path)?),
            "region" => target.region(as_string(value, &path)?),
            "statistics" => target.statistics(as_string_list(value, &path)?),
            "dimensions" => target.dimensions(as_string_pairs(value, &path)?),
            "period" => target.period(as_string(value, &path)?),
            "expression" => target.expression(as_string(value, &path)?),
            "match_exact" => target.match_exact(as_bool(value, &path)?),
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(target)
}

struct QueryArgs {
    ref_id: String,
    query: String,
    legend: Option<String>,
    lookback: Option<Duration>,
}

fn query_args(v: &Yaml, path: &str) -> Result<QueryArgs> {
    let mut args = QueryArgs {
        ref_id: required_string(v, path, "ref")?,
        query: required_string(v, path, "query")?,
        legend: None,
        lookback: None,
    };
    for (key, value, path) in entries(v, path)? {
        match key {
            "ref" | "query" => {}
            "legend" => args.legend = Some(as_string(value, &path)?),
            "lookback" => args.lookback = Some(as_duration(value, &path)?),
            _ => return Err(unknown_key(&path)),
        }
    }
    Ok(args)
}

macro_rules! alert_query {
    ($ty:ty, $args:expr) => {{
        let args = $args;
        let mut query = <$ty>::new(args.ref_id, args.query);
        if let Some(legend) = args.legend {
            query = query.legend(legend);
        }
        if let Some(lookback) = args.lookback {
            query = query.time_range(lookback, Duration::ZERO);
        }
        query.into_alert_query()
    }};
}

/// Decodes one `targets` entry of an alert.
fn decode_alert_query(v: &Yaml, path: &str) -> Result<AlertQuery> {
    let (kind, v, path) = variant(v, path, &TARGET_KINDS)?;
    let args = query_args(v, &path)?;
    Ok(match kind {
        "prometheus" => alert_query!(query::Prometheus, args),
        "loki" => alert_query!(query::Loki, args),
        "graphite" => alert_query!(query::Graphite, args),
        "influxdb" => alert_query!(query::InfluxDB, args),
        "stackdriver" => alert_query!(query::Stackdriver, args),
        _ => alert_query!(query::CloudWatch, args),
    })
}

fn evaluator(v: &Yaml, path: &str) -> Result<Evaluator> {
    let kinds = [
        "above",
        "below",
        "outside_range",
        "within_range",
        "has_no_value",
    ];
    let (kind, v, path) = variant(v, path, &kinds)?;
    let range = |v: &Yaml| -> Result<(f64, f64)> {
        let bounds = items(v, &path)?;
        match bounds.as_slice() {
            [(lo, lo_path), (hi, hi_path)] => Ok((as_f64(lo, lo_path)?, as_f64(hi, hi_path)?)),
            _ => Err(Error::decode(&path, "expected two bounds")),
        }
    };

    Ok(match kind {
        "above" => Evaluator::IsAbove(as_f64(v, &path)?),
        "below" => Evaluator::IsBelow(as_f64(v, &path)?),
        "outside_range" => {
            let (lo, hi) = range(v)?;
            Evaluator::IsOutsideRange(lo, hi)
        }
        "within_range" => {
            let (lo, hi) = range(v)?;
            Evaluator::IsWithinRange(lo, hi)
        }
        _ => Evaluator::HasNoValue,
    })
}

fn decode_condition(alert: Alert, v: &Yaml, path: &str) -> Result<Alert> {
    let reducer: Reducer = match lookup(v, "func") {
        Some(func) => parse(func, &child(path, "func"))?,
        None => return Err(Error::decode(child(path, "func"), "missing required key")),
    };
    let query_ref = required_string(v, path, "ref")?;
    let evaluator = match lookup(v, "threshold") {
        Some(threshold) => evaluator(threshold, &child(path, "threshold"))?,
        None => {
            return Err(Error::decode(
                child(path, "threshold"),
                "missing required key",
            ))
        }
    };

    let mut operator = Operator::And;
    for (key, value, path) in entries(v, path)? {
        match key {
            "func" | "ref" | "threshold" => {}
            "operator" => {
                operator = match as_string(value, &path)?.as_str() {
                    "and" => Operator::And,
                    "or" => Operator::Or,
                    other => {
                        return Err(Error::decode(path, format!("unknown operator '{}'", other)))
                    }
                }
            }
            _ => return Err(unknown_key(&path)),
        }
    }

    Ok(match operator {
        Operator::And => alert.if_(reducer, query_ref, evaluator),
        Operator::Or => alert.if_or(reducer, query_ref, evaluator),
    })
}

/// Decodes the `alert` block of a graph or time series panel. The rule is
/// named after the panel unless it has its own title.
pub(super) fn decode_alert(v: &Yaml, path: &str, panel_title: &str) -> Result<Alert> {
    let title = optional_string(v, path, "title")?.unwrap_or_else(|| panel_title.to_string());
    let mut alert = Alert::new(title);

    for (key, value, path) in entries(v, path)? {
        alert = match key {
            "title" => alert,
            "summary" => alert.summary(as_string(value, &path)?),
            "description" => alert.description(as_string(value, &path)?),
            "runbook" => alert.runbook(as_string(value, &path)?),
            "tags" => alert.tags(as_string_pairs(value, &path)?),
            "evaluate_every" => alert.evaluate_every(as_string(value, &path)?),
            "for" => alert.for_duration(as_string(value, &path)?),
            "on_no_data" => alert.on_no_data(match as_string(value, &path)?.as_str() {
                "no_data" => NoDataMode::NoData,
                "alerting" => NoDataMode::Alerting,
                "ok" => NoDataMode::Ok,
                other => {
                    return Err(Error::decode(path, format!("unknown no data mode '{}'", other)))
                }
            }),
            "on_execution_error" => {
                alert.on_execution_error(match as_string(value, &path)?.as_str() {
                    "alerting" => ErrorMode::Alerting,
                    "error" => ErrorMode::Error,
                    "ok" => ErrorMode::Ok,
                    other => {
                        return Err(Error::decode(path, format!("unknown error mode '{}'", other)))
                    }
                })
            }
            "if" => {
                let mut alert = alert;
                for (condition, path) in items(value, &path)? {
                    alert = decode_condition(alert, condition, &path)?;
                }
                alert
            }
            "targets" => {
                let mut alert = alert;
                for (target, path) in items(value, &path)? {
                    alert = alert.with_query(decode_alert_query(target, &path)?);
                }
                alert
            }
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(alert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    fn load(source: &str) -> Yaml {
        YamlLoader::load_from_str(source).unwrap().remove(0)
    }

    #[test]
    fn test_prometheus_target() {
        let doc = load(
            "prometheus:\n  query: up\n  legend: \"{{ instance }}\"\n  ref: B\n  instant: true",
        );
        let target = decode_target(&doc, "targets[0]").unwrap();

        assert_eq!(target.expr.as_deref(), Some("up"));
        assert_eq!(target.ref_id, "B");
        assert_eq!(target.legend_format.as_deref(), Some("{{ instance }}"));
        assert_eq!(target.instant, Some(true));
    }

    #[test]
    fn test_unknown_target_key() {
        let doc = load("prometheus:\n  query: up\n  legnd: x");
        match decode_target(&doc, "targets[0]") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "targets[0].prometheus.legnd");
                assert_eq!(message, "unknown key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_stackdriver_target() {
        let doc = load(
            "stackdriver:
  metric: compute.googleapis.com/instance/cpu/utilization
  filters:
    eq:
      resource.label.zone: europe-west1-b
  aggregation: max
  alignment: {method: mean, period: stackdriver-auto}
  group_by: [resource.label.instance_id]",
        );
        let target = decode_target(&doc, "targets[0]").unwrap();

        let list = target.time_series_list.unwrap();
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
            ]
        );
        assert_eq!(list.cross_series_reducer.as_deref(), Some("REDUCE_MAX"));
        assert_eq!(list.per_series_aligner.as_deref(), Some("ALIGN_MEAN"));
        assert_eq!(list.alignment_period.as_deref(), Some("stackdriver-auto"));
        assert_eq!(list.group_bys, vec!["resource.label.instance_id"]);
    }

    #[test]
    fn test_alert() {
        let doc = load(
            "summary: Too many heap allocations
evaluate_every: 1m
for: 1m
on_no_data: alerting
tags:
  service: api
if:
  - {func: avg, ref: A, threshold: {above: 23000000}}
  - {func: max, ref: A, threshold: {outside_range: [1, 2]}, operator: or}
targets:
  - prometheus:
      ref: A
      query: go_memstats_heap_alloc_bytes
      lookback: 30m",
        );
        let group = decode_alert(&doc, "alert", "Heap allocations")
            .unwrap()
            .build()
            .unwrap();

        let rule = &group.rules[0];
        assert_eq!(rule.grafana_alert.title, "Heap allocations");
        assert_eq!(rule.grafana_alert.no_data_state, "Alerting");
        assert_eq!(rule.annotations["summary"], "Too many heap allocations");
        assert_eq!(rule.labels["service"], "api");
        assert_eq!(rule.grafana_alert.data.len(), 2);

        let query = &rule.grafana_alert.data[1];
        assert_eq!(query.ref_id, "A");
        assert_eq!(query.relative_time_range.as_ref().unwrap().from, 1800);
    }

    #[test]
    fn test_alert_threshold_needs_one_kind() {
        let doc = load("if:\n  - {func: avg, ref: A, threshold: {}}");
        match decode_alert(&doc, "alert", "panel") {
            Err(Error::Decode { path, .. }) => assert_eq!(path, "alert.if[0].threshold"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
