//! Grafana managed alert rules.
//!
//! An [`Alert`] holds a single rule whose `data` starts with a classic
//! conditions expression. Conditions added with [`Alert::if_`] and
//! [`Alert::if_or`] reference the data source queries added with
//! [`Alert::with_query`] by their ref.

mod condition;
pub mod query;

pub use condition::{Evaluator, Operator, Reducer};
pub use query::IntoAlertQuery;

use query::DATASOURCE_PLACEHOLDER;

use crate::kernel::{Builder, ErrorSlot};
use crate::model::{AlertGroup, AlertModel, AlertQuery, AlertRule, DatasourceRef, GrafanaAlert, Target};
use crate::{Error, Result};
use ringlog::*;
use std::collections::{BTreeMap, HashSet};

/// RefId of the classic conditions expression every rule starts with.
pub const CONDITION_REF: &str = "_alert_condition_";

const EXPRESSION_DATASOURCE_UID: &str = "-100";

/// Rule state when the queries return no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoDataMode {
    #[default]
    NoData,
    Alerting,
    Ok,
}

impl NoDataMode {
    pub fn as_str(self) -> &'static str {
        match self {
            NoDataMode::NoData => "NoData",
            NoDataMode::Alerting => "Alerting",
            NoDataMode::Ok => "OK",
        }
    }
}

/// Rule state when the evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    #[default]
    Alerting,
    Error,
    Ok,
}

impl ErrorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorMode::Alerting => "Alerting",
            ErrorMode::Error => "Error",
            ErrorMode::Ok => "OK",
        }
    }
}

#[derive(Debug)]
pub struct Alert {
    interval: String,
    rule: AlertRule,
    errors: ErrorSlot,
}

impl Builder for Alert {}

impl Alert {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let expression = AlertQuery {
            ref_id: CONDITION_REF.to_string(),
            query_type: String::new(),
            relative_time_range: None,
            datasource_uid: EXPRESSION_DATASOURCE_UID.to_string(),
            model: AlertModel {
                query: Target {
                    ref_id: CONDITION_REF.to_string(),
                    hide: Some(false),
                    datasource: Some(DatasourceRef::uid("__expr__", EXPRESSION_DATASOURCE_UID)),
                    ..Default::default()
                },
                model_type: Some("classic_conditions".to_string()),
                ..Default::default()
            },
        };

        Self {
            interval: String::new(),
            rule: AlertRule {
                for_duration: String::new(),
                grafana_alert: GrafanaAlert {
                    title,
                    condition: CONDITION_REF.to_string(),
                    no_data_state: String::new(),
                    exec_err_state: String::new(),
                    data: vec![expression],
                },
                annotations: BTreeMap::new(),
                labels: BTreeMap::new(),
            },
            errors: ErrorSlot::default(),
        }
        .evaluate_every("1m")
        .for_duration("5m")
        .on_no_data(NoDataMode::NoData)
        .on_execution_error(ErrorMode::Alerting)
    }

    fn resource(&self) -> String {
        format!("alert '{}'", self.rule.grafana_alert.title)
    }

    fn duration(&mut self, field: &str, value: String) -> Option<String> {
        match humantime::parse_duration(&value) {
            Ok(_) => Some(value),
            Err(e) => {
                let err = Error::invalid(self.resource(), field, &value, e.to_string());
                self.errors.record(err);
                None
            }
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.rule.grafana_alert.title = title.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.rule
            .annotations
            .insert("summary".to_string(), summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.rule
            .annotations
            .insert("description".to_string(), description.into());
        self
    }

    pub fn runbook(mut self, url: impl Into<String>) -> Self {
        self.rule
            .annotations
            .insert("runbook_url".to_string(), url.into());
        self
    }

    /// Pending period before a firing condition turns into an alert.
    pub fn for_duration(mut self, duration: impl Into<String>) -> Self {
        if let Some(duration) = self.duration("for", duration.into()) {
            self.rule.for_duration = duration;
        }
        self
    }

    pub fn evaluate_every(mut self, interval: impl Into<String>) -> Self {
        if let Some(interval) = self.duration("interval", interval.into()) {
            self.interval = interval;
        }
        self
    }

    pub fn on_no_data(mut self, mode: NoDataMode) -> Self {
        self.rule.grafana_alert.no_data_state = mode.as_str().to_string();
        self
    }

    pub fn on_execution_error(mut self, mode: ErrorMode) -> Self {
        self.rule.grafana_alert.exec_err_state = mode.as_str().to_string();
        self
    }

    /// Labels attached to the alert, used to route notifications.
    pub fn tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rule.labels = tags
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Points the rule at another entry of its data.
    pub fn condition(mut self, ref_id: impl Into<String>) -> Self {
        self.rule.grafana_alert.condition = ref_id.into();
        self
    }

    pub fn with_query(mut self, query: impl IntoAlertQuery) -> Self {
        self.rule.grafana_alert.data.push(query.into_alert_query());
        self
    }

    /// Adds a condition joined to the previous ones with `and`.
    pub fn if_(self, reducer: Reducer, query_ref: impl AsRef<str>, evaluator: Evaluator) -> Self {
        self.push_condition(Operator::And, reducer, query_ref.as_ref(), evaluator)
    }

    /// Adds a condition joined to the previous ones with `or`.
    pub fn if_or(self, reducer: Reducer, query_ref: impl AsRef<str>, evaluator: Evaluator) -> Self {
        self.push_condition(Operator::Or, reducer, query_ref.as_ref(), evaluator)
    }

    fn push_condition(
        mut self,
        operator: Operator,
        reducer: Reducer,
        query_ref: &str,
        evaluator: Evaluator,
    ) -> Self {
        let cond = condition::condition(operator, reducer, query_ref, evaluator);
        if let Some(expression) = self
            .rule
            .grafana_alert
            .data
            .iter_mut()
            .find(|q| q.ref_id == CONDITION_REF)
        {
            expression.model.conditions.push(cond);
        }
        self
    }

    /// Replaces the placeholder data source of every query.
    pub(crate) fn datasource_uid(mut self, uid: &str) -> Self {
        for entry in self
            .rule
            .grafana_alert
            .data
            .iter_mut()
            .filter(|q| q.ref_id != CONDITION_REF)
        {
            if entry.datasource_uid == DATASOURCE_PLACEHOLDER {
                entry.datasource_uid = uid.to_string();
            }
            if let Some(DatasourceRef::Ref { uid: Some(current), .. }) =
                entry.model.query.datasource.as_mut()
            {
                if current == DATASOURCE_PLACEHOLDER {
                    *current = uid.to_string();
                }
            }
        }
        self
    }

    /// Builds the rule group, named after the rule title.
    pub fn build(self) -> Result<AlertGroup> {
        let Alert {
            interval,
            rule,
            errors,
        } = self;
        errors.into_result()?;

        let group = AlertGroup {
            name: rule.grafana_alert.title.clone(),
            interval,
            rules: vec![rule],
        };
        validate(&group.rules[0])?;

        debug!(
            "built alert group '{}' with {} queries",
            group.name,
            group.rules[0].grafana_alert.data.len()
        );
        Ok(group)
    }
}

fn validate(rule: &AlertRule) -> Result<()> {
    let alert = &rule.grafana_alert;
    let resource = format!("alert '{}'", alert.title);

    let mut refs = HashSet::new();
    for query in &alert.data {
        if !refs.insert(query.ref_id.as_str()) {
            return Err(Error::invalid(
                &resource,
                "refId",
                &query.ref_id,
                "used by more than one query",
            ));
        }
    }

    match alert.data.iter().find(|q| q.ref_id == alert.condition) {
        None => {
            return Err(Error::referential(
                &resource,
                &alert.condition,
                "condition does not match any query",
            ));
        }
        Some(query) if query.model.model_type.is_none() => {
            return Err(Error::referential(
                &resource,
                &alert.condition,
                "condition must name an expression query",
            ));
        }
        Some(_) => {}
    }

    for query in alert.data.iter().filter(|q| q.model.model_type.is_some()) {
        for cond in &query.model.conditions {
            for param in &cond.query.params {
                let is_query = alert
                    .data
                    .iter()
                    .any(|q| &q.ref_id == param && q.model.model_type.is_none());
                if !is_query {
                    return Err(Error::referential(
                        &resource,
                        param,
                        "condition references an unknown query",
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Annotations linking every rule of `group` to its panel.
pub(crate) fn link_to_panel(group: &mut AlertGroup, panel_id: u32, dashboard_uid: Option<&str>) {
    for rule in &mut group.rules {
        rule.annotations
            .insert("__panelId__".to_string(), panel_id.to_string());
        if let Some(uid) = dashboard_uid {
            rule.annotations
                .insert("__dashboardUid__".to_string(), uid.to_string());
        }
    }
}

impl AlertGroup {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
