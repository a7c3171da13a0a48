//! Contact points and notification routing of Grafana's alertmanager.

pub mod discord;
pub mod email;
pub mod opsgenie;
pub mod slack;
pub mod webhook;

mod routing;

pub use routing::{Matcher, Policy};

use crate::kernel::{Builder, ErrorSlot};
use crate::model::{self, ContactPoint as ContactPointModel, Receiver};
use crate::{Error, Result};
use ringlog::*;
use std::collections::{BTreeMap, HashSet};

/// A notification channel of a contact point.
pub trait IntoReceiver {
    fn into_receiver(self) -> Result<Receiver>;
}

impl IntoReceiver for Receiver {
    fn into_receiver(self) -> Result<Receiver> {
        Ok(self)
    }
}

/// A named set of channels alerts are delivered to.
#[derive(Debug)]
pub struct ContactPoint {
    point: ContactPointModel,
    errors: ErrorSlot,
}

impl Builder for ContactPoint {}

impl ContactPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            point: ContactPointModel {
                name: name.into(),
                grafana_managed_receiver_configs: Vec::new(),
            },
            errors: ErrorSlot::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.point.name
    }

    pub fn with_channel(mut self, channel: impl IntoReceiver) -> Self {
        if let Some(mut receiver) = self.errors.take(channel.into_receiver()) {
            receiver.name = self.point.name.clone();
            self.point.grafana_managed_receiver_configs.push(receiver);
        }
        self
    }

    fn build(self) -> Result<ContactPointModel> {
        self.errors.into_result()?;
        Ok(self.point)
    }
}

/// The built alertmanager configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertManager {
    config: model::AlertManager,
}

impl AlertManager {
    pub fn builder() -> AlertManagerBuilder {
        AlertManagerBuilder::new()
    }

    pub fn config(&self) -> &model::AlertManager {
        &self.config
    }

    /// Name of the contact point receiving unrouted alerts.
    pub fn default_contact_point(&self) -> &str {
        &self.config.alertmanager_config.route.receiver
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.config)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }
}

#[derive(Debug, Default)]
pub struct AlertManagerBuilder {
    config: model::AlertManager,
    default_contact_point: Option<String>,
    errors: ErrorSlot,
}

impl Builder for AlertManagerBuilder {}

impl AlertManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contact points. Without an explicit default, the first
    /// one receives unrouted alerts.
    pub fn contact_points<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = ContactPoint>,
    {
        self.config.alertmanager_config.receivers.clear();
        for point in points {
            self = self.contact_point(point);
        }
        self
    }

    pub fn contact_point(mut self, point: ContactPoint) -> Self {
        if let Some(point) = self.errors.take(point.build()) {
            self.config.alertmanager_config.receivers.push(point);
        }
        self
    }

    pub fn default_contact_point(mut self, name: impl Into<String>) -> Self {
        self.default_contact_point = Some(name.into());
        self
    }

    /// Replaces the routing policies, evaluated in order.
    pub fn routing<I>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = Policy>,
    {
        self.config.alertmanager_config.route.routes =
            policies.into_iter().map(Policy::into_model).collect();
        self
    }

    /// Notification templates, by name.
    pub fn templates<I, K, V>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.config.template_files = templates
            .into_iter()
            .map(|(name, content)| (name.into(), content.into()))
            .collect::<BTreeMap<_, _>>();
        self
    }

    pub fn group_by<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.alertmanager_config.route.group_by =
            labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn group_wait(mut self, wait: impl Into<String>) -> Self {
        self.config.alertmanager_config.route.group_wait = Some(wait.into());
        self
    }

    pub fn group_interval(mut self, interval: impl Into<String>) -> Self {
        self.config.alertmanager_config.route.group_interval = Some(interval.into());
        self
    }

    pub fn repeat_interval(mut self, interval: impl Into<String>) -> Self {
        self.config.alertmanager_config.route.repeat_interval = Some(interval.into());
        self
    }

    pub fn build(self) -> Result<AlertManager> {
        let AlertManagerBuilder {
            mut config,
            default_contact_point,
            errors,
        } = self;
        errors.into_result()?;

        let manager = &mut config.alertmanager_config;

        let mut names = HashSet::new();
        for point in &manager.receivers {
            if !names.insert(point.name.as_str()) {
                return Err(Error::invalid(
                    "alertmanager",
                    "name",
                    &point.name,
                    "defined more than once",
                ));
            }
        }

        let known = |name: &str| manager.receivers.iter().any(|point| point.name == name);

        let receiver = match default_contact_point {
            Some(name) if !known(&name) => {
                return Err(Error::referential(
                    "alertmanager",
                    name,
                    "default contact point is not defined",
                ));
            }
            Some(name) => name,
            None => manager
                .receivers
                .first()
                .map(|point| point.name.clone())
                .unwrap_or_default(),
        };

        if let Some(policy) = manager.route.routes.iter().find(|p| !known(&p.receiver)) {
            return Err(Error::referential(
                "alertmanager routing",
                policy.receiver.clone(),
                "contact point is not defined",
            ));
        }

        manager.route.receiver = receiver;
        manager.templates = config.template_files.keys().cloned().collect();

        debug!(
            "built alertmanager with {} contact points and {} routing policies",
            manager.receivers.len(),
            manager.route.routes.len()
        );

        Ok(AlertManager { config })
    }
}
