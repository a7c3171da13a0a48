use super::value::*;
use crate::alertmanager::discord::Discord;
use crate::alertmanager::email::Email;
use crate::alertmanager::opsgenie::Opsgenie;
use crate::alertmanager::slack::Slack;
use crate::alertmanager::webhook::Webhook;
use crate::alertmanager::{AlertManager, ContactPoint, Matcher, Policy};
use crate::model::Receiver;
use crate::{Error, Result};
use yaml_rust::Yaml;

const CHANNEL_KINDS: [&str; 5] = ["email", "slack", "discord", "opsgenie", "webhook"];

const MATCHER_KINDS: [&str; 4] = ["eq", "neq", "matches", "not_matches"];

/// Decodes the `alertmanager` section of a document.
pub(super) fn decode_alertmanager(v: &Yaml, path: &str) -> Result<AlertManager> {
    let mut builder = AlertManager::builder();
    for (key, value, path) in entries(v, path)? {
        builder = match key {
            "contact_points" => {
                let mut points = Vec::new();
                for (item, path) in items(value, &path)? {
                    points.push(decode_contact_point(item, &path)?);
                }
                builder.contact_points(points)
            }
            "default_contact_point" => builder.default_contact_point(as_string(value, &path)?),
            "routing" => {
                let mut policies = Vec::new();
                for (item, path) in items(value, &path)? {
                    policies.push(decode_policy(item, &path)?);
                }
                builder.routing(policies)
            }
            "templates" => builder.templates(as_string_pairs(value, &path)?),
            "group_by" => builder.group_by(as_string_list(value, &path)?),
            "group_wait" => builder.group_wait(duration_string(value, &path)?),
            "group_interval" => builder.group_interval(duration_string(value, &path)?),
            "repeat_interval" => builder.repeat_interval(duration_string(value, &path)?),
            _ => return Err(unknown_key(&path)),
        };
    }
    located(builder.build(), path)
}

/// A duration kept in its written form once it is known to parse.
fn duration_string(v: &Yaml, path: &str) -> Result<String> {
    as_duration(v, path)?;
    as_string(v, path)
}

fn decode_contact_point(v: &Yaml, path: &str) -> Result<ContactPoint> {
    let mut point = ContactPoint::new(required_string(v, path, "name")?);
    for (key, value, path) in entries(v, path)? {
        match key {
            "name" => {}
            "contacts" => {
                for (item, path) in items(value, &path)? {
                    point = point.with_channel(located(decode_channel(item, &path), &path)?);
                }
            }
            _ => return Err(unknown_key(&path)),
        }
    }
    Ok(point)
}

/// Channels are converted eagerly so errors carry the document path.
fn decode_channel(v: &Yaml, path: &str) -> Result<Receiver> {
    use crate::alertmanager::IntoReceiver;

    let (kind, v, path) = variant(v, path, &CHANNEL_KINDS)?;
    match kind {
        "email" => {
            let to = match lookup(v, "to") {
                Some(to) => as_string_list(to, &child(&path, "to"))?,
                None => return Err(Error::decode(child(&path, "to"), "missing required key")),
            };
            let mut email = Email::to(to);
            for (key, value, path) in entries(v, &path)? {
                email = match key {
                    "to" => email,
                    "single" => flag(email, value, &path, Email::single)?,
                    "message" => email.message(as_string(value, &path)?),
                    _ => return Err(unknown_key(&path)),
                };
            }
            email.into_receiver()
        }
        "slack" => {
            let mut slack = Slack::webhook(required_string(v, &path, "webhook")?);
            for (key, value, path) in entries(v, &path)? {
                slack = match key {
                    "webhook" => slack,
                    "title" => slack.title(as_string(value, &path)?),
                    "body" => slack.body(as_string(value, &path)?),
                    _ => return Err(unknown_key(&path)),
                };
            }
            slack.into_receiver()
        }
        "discord" => {
            let mut discord = Discord::with(required_string(v, &path, "webhook")?);
            for (key, value, path) in entries(v, &path)? {
                discord = match key {
                    "webhook" => discord,
                    "use_discord_username" => {
                        flag(discord, value, &path, Discord::use_discord_username)?
                    }
                    _ => return Err(unknown_key(&path)),
                };
            }
            discord.into_receiver()
        }
        "opsgenie" => {
            let mut opsgenie = Opsgenie::with(
                required_string(v, &path, "api_url")?,
                required_string(v, &path, "api_key")?,
            );
            for (key, value, path) in entries(v, &path)? {
                opsgenie = match key {
                    "api_url" | "api_key" => opsgenie,
                    "auto_close" => flag(opsgenie, value, &path, Opsgenie::auto_close)?,
                    "override_priority" => {
                        flag(opsgenie, value, &path, Opsgenie::override_priority)?
                    }
                    "send_tags_as" => opsgenie.send_tags_as(parse(value, &path)?),
                    _ => return Err(unknown_key(&path)),
                };
            }
            opsgenie.into_receiver()
        }
        _ => {
            let mut webhook = Webhook::call(required_string(v, &path, "url")?);
            if let Some(username) = optional_string(v, &path, "username")? {
                let password = optional_string(v, &path, "password")?.unwrap_or_default();
                webhook = webhook.credentials(username, password);
            }
            for (key, value, path) in entries(v, &path)? {
                webhook = match key {
                    "url" | "username" | "password" => webhook,
                    "method" => webhook.method(as_string(value, &path)?),
                    "max_alerts" => webhook.max_alerts(as_u32(value, &path)?),
                    _ => return Err(unknown_key(&path)),
                };
            }
            webhook.into_receiver()
        }
    }
}

fn decode_policy(v: &Yaml, path: &str) -> Result<Policy> {
    let mut policy = Policy::new(required_string(v, path, "to")?);
    for (key, value, path) in entries(v, path)? {
        match key {
            "to" => {}
            "if_labels" => {
                for (item, path) in items(value, &path)? {
                    let (kind, labels, path) = variant(item, &path, &MATCHER_KINDS)?;
                    let matcher: Matcher = kind.parse().map_err(|e: String| Error::decode(&path, e))?;
                    for (label, value) in as_string_pairs(labels, &path)? {
                        policy = policy.matching(label, matcher, value);
                    }
                }
            }
            _ => return Err(unknown_key(&path)),
        }
    }
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yaml_rust::YamlLoader;

    fn load(source: &str) -> Yaml {
        YamlLoader::load_from_str(source).unwrap().remove(0)
    }

    const CONFIG: &str = "
contact_points:
  - name: team-a
    contacts:
      - email: {to: [a@example.com, b@example.com], single: true}
      - slack: {webhook: 'https://hooks.slack.com/services/x', title: Alert}
  - name: oncall
    contacts:
      - opsgenie: {api_url: 'https://api.opsgenie.com', api_key: secret, auto_close: true}
default_contact_point: team-a
routing:
  - to: oncall
    if_labels:
      - eq: {severity: critical}
      - matches: {service: 'api-.*'}
templates:
  title: '{{ .CommonLabels.alertname }}'
";

    #[test]
    fn test_decode_alertmanager() {
        let manager = decode_alertmanager(&load(CONFIG), "alertmanager").unwrap();
        assert_eq!(manager.default_contact_point(), "team-a");

        let value: serde_json::Value = serde_json::from_str(&manager.to_json().unwrap()).unwrap();
        let config = &value["alertmanager_config"];
        assert_eq!(config["receivers"][0]["name"], json!("team-a"));
        assert_eq!(
            config["receivers"][0]["grafana_managed_receiver_configs"][0]["settings"]["addresses"],
            json!("a@example.com,b@example.com")
        );
        assert_eq!(
            config["route"]["routes"][0]["object_matchers"],
            json!([["severity", "=", "critical"], ["service", "=~", "api-.*"]])
        );
        assert_eq!(config["templates"], json!(["title"]));
    }

    #[test]
    fn test_unknown_channel() {
        let doc = load("contact_points:\n  - name: x\n    contacts:\n      - pager: {}");
        match decode_alertmanager(&doc, "alertmanager") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "alertmanager.contact_points[0].contacts[0].pager");
                assert_eq!(message, "unknown key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_routing_to_undefined_contact_point() {
        let doc = load(
            "contact_points:\n  - name: x\n    contacts: []\nrouting:\n  - to: y\n    if_labels: []",
        );
        match decode_alertmanager(&doc, "alertmanager") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "alertmanager");
                assert!(message.contains("unresolved reference 'y'"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_webhook_method() {
        let doc = load(
            "contact_points:\n  - name: x\n    contacts:\n      - webhook: {url: 'http://hook', method: DELETE}",
        );
        match decode_alertmanager(&doc, "alertmanager") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "alertmanager.contact_points[0].contacts[0]");
                assert!(message.contains("DELETE"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_contact_point() {
        let doc = load("contact_points:\n  - name: x\n    contacts: []\n  - name: x\n    contacts: []");
        match decode_alertmanager(&doc, "alertmanager") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "alertmanager");
                assert!(message.contains("defined more than once"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
