//! Declarative YAML front-end.
//!
//! A document describes one dashboard and, optionally, the alertmanager
//! configuration its alerts are routed through. Decoding walks the YAML tree
//! with an explicit key path, hands every value to the matching builder
//! setter and rejects unknown keys, so errors read like
//! `rows[0].panels[1].timeseries.targets[0].prometheus.legnd: unknown key`.

mod alertmanager;
mod panel;
mod target;
mod value;
mod variable;

use crate::alertmanager::AlertManager;
use crate::dashboard::{Dashboard, DashboardBuilder, DashboardLink, ExternalLink, TagsAnnotation};
use crate::row::Row;
use crate::{Error, Result};
use ringlog::*;
use value::*;
use yaml_rust::{Yaml, YamlLoader};

/// Settings supplied by the caller rather than by the document.
#[derive(Debug, Clone, Default)]
pub struct DecoderOptions {
    /// Datasource used when the document names none.
    pub default_datasource: Option<String>,
}

/// A decoded document.
#[derive(Debug, Clone)]
pub struct Document {
    pub dashboard: Dashboard,
    pub alertmanager: Option<AlertManager>,
}

/// Decodes a document with the default options.
pub fn decode(source: &str) -> Result<Document> {
    decode_with(source, &DecoderOptions::default())
}

pub fn decode_with(source: &str, options: &DecoderOptions) -> Result<Document> {
    let mut docs = YamlLoader::load_from_str(source).map_err(|e| Error::Yaml {
        line: e.marker().line(),
        col: e.marker().col(),
        message: e.to_string(),
    })?;
    if docs.is_empty() {
        return Err(Error::decode("", "empty document"));
    }
    let root = docs.swap_remove(0);

    let title = required_string(&root, "", "title")?;
    let datasource = optional_string(&root, "", "datasource")?.or_else(|| options.default_datasource.clone());
    let datasource = datasource.as_deref();

    let mut builder = Dashboard::builder(title);
    let mut alertmanager = None;
    let mut failed_at = None;

    for (key, value, path) in entries(&root, "")? {
        builder = match key {
            "title" | "datasource" => builder,
            "uid" => builder.uid(as_string(value, &path)?),
            "description" => builder.description(as_string(value, &path)?),
            "editable" => {
                if as_bool(value, &path)? {
                    builder.editable()
                } else {
                    builder.read_only()
                }
            }
            "shared_crosshair" => {
                if as_bool(value, &path)? {
                    builder.shared_crosshair()
                } else {
                    builder.default_tooltip()
                }
            }
            "tags" => builder.tags(as_string_list(value, &path)?),
            "auto_refresh" => builder.auto_refresh(as_string(value, &path)?),
            "time" => {
                let bounds = as_string_list(value, &path)?;
                let [from, to] = bounds.as_slice() else {
                    return Err(Error::decode(path, "expected [from, to]"));
                };
                builder.time(from, to)
            }
            "timezone" => builder.timezone(parse(value, &path)?),
            "tags_annotations" => decode_annotations(builder, value, &path, datasource)?,
            "variables" => {
                let mut builder = builder;
                for (item, path) in items(value, &path)? {
                    builder = builder.variable(variable::decode_variable(item, &path, datasource)?);
                }
                builder
            }
            "external_links" => {
                let mut builder = builder;
                for (item, path) in items(value, &path)? {
                    builder = builder.external_link(decode_external_link(item, &path)?);
                }
                builder
            }
            "dashboard_links" => {
                let mut builder = builder;
                for (item, path) in items(value, &path)? {
                    builder = builder.dashboard_link(decode_dashboard_link(item, &path)?);
                }
                builder
            }
            "rows" => {
                let mut builder = builder;
                for (item, path) in items(value, &path)? {
                    builder = builder.row(decode_row(item, &path, datasource)?);
                }
                builder
            }
            "alertmanager" => {
                alertmanager = Some(alertmanager::decode_alertmanager(value, &path)?);
                builder
            }
            _ => return Err(unknown_key(&path)),
        };
        if failed_at.is_none() && builder.has_errors() {
            failed_at = Some(path);
        }
    }

    let dashboard = located(builder.build(), failed_at.as_deref().unwrap_or_default())?;
    debug!(
        "decoded dashboard '{}' (alertmanager: {})",
        dashboard.board().title,
        alertmanager.is_some()
    );

    Ok(Document {
        dashboard,
        alertmanager,
    })
}

fn decode_row(v: &Yaml, path: &str, datasource: Option<&str>) -> Result<Row> {
    let mut row = Row::new(required_string(v, path, "name")?);
    for (key, value, path) in entries(v, path)? {
        row = match key {
            "name" => row,
            "repeat_for" => row.repeat_for(as_string(value, &path)?),
            "collapse" => flag(row, value, &path, Row::collapse)?,
            "hide_title" => flag(row, value, &path, Row::hide_title)?,
            "panels" => {
                let mut row = row;
                for (item, path) in items(value, &path)? {
                    row = row.with_panel(panel::decode_panel(item, &path, datasource)?);
                }
                row
            }
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(row)
}

fn decode_annotations(
    mut builder: DashboardBuilder,
    v: &Yaml,
    path: &str,
    datasource: Option<&str>,
) -> Result<DashboardBuilder> {
    for (item, path) in items(v, path)? {
        let name = required_string(item, &path, "name")?;
        let mut annotation = TagsAnnotation {
            name,
            datasource: String::new(),
            icon_color: "#5794F2".to_string(),
            tags: Vec::new(),
        };
        for (key, value, path) in entries(item, &path)? {
            match key {
                "name" => {}
                "datasource" => annotation.datasource = as_string(value, &path)?,
                "color" => annotation.icon_color = as_string(value, &path)?,
                "tags" => annotation.tags = as_string_list(value, &path)?,
                _ => return Err(unknown_key(&path)),
            }
        }
        if annotation.datasource.is_empty() {
            match datasource {
                Some(name) => annotation.datasource = name.to_string(),
                None => {
                    return Err(Error::decode(
                        child(&path, "datasource"),
                        "missing required key",
                    ))
                }
            }
        }
        builder = builder.tags_annotation(annotation);
    }
    Ok(builder)
}

fn decode_external_link(v: &Yaml, path: &str) -> Result<ExternalLink> {
    let mut link = ExternalLink::new(
        required_string(v, path, "title")?,
        required_string(v, path, "url")?,
    );
    for (key, value, path) in entries(v, path)? {
        link = match key {
            "title" | "url" => link,
            "description" => link.description(as_string(value, &path)?),
            "icon" => link.icon(parse(value, &path)?),
            "include_time_range" => flag(link, value, &path, ExternalLink::include_time_range)?,
            "include_variable_values" => {
                flag(link, value, &path, ExternalLink::include_variable_values)?
            }
            "open_in_new_tab" => flag(link, value, &path, ExternalLink::open_in_new_tab)?,
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(link)
}

fn decode_dashboard_link(v: &Yaml, path: &str) -> Result<DashboardLink> {
    let mut link = DashboardLink::new(required_string(v, path, "title")?);
    for (key, value, path) in entries(v, path)? {
        link = match key {
            "title" => link,
            "tags" => link.tags(as_string_list(value, &path)?),
            "as_dropdown" => flag(link, value, &path, DashboardLink::as_dropdown)?,
            "include_time_range" => flag(link, value, &path, DashboardLink::include_time_range)?,
            "include_variable_values" => {
                flag(link, value, &path, DashboardLink::include_variable_values)?
            }
            "open_in_new_tab" => flag(link, value, &path, DashboardLink::open_in_new_tab)?,
            _ => return Err(unknown_key(&path)),
        };
    }
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOCUMENT: &str = r#"
title: Service overview
uid: service-overview
editable: false
tags: [generated, service]
auto_refresh: 30s
time: [now-6h, now]
timezone: utc
datasource: prometheus-main

variables:
  - interval:
      name: interval
      values: [30s, 1m, 5m]
      default: 1m
  - query:
      name: instance
      request: label_values(up, instance)
      include_all: true

external_links:
  - title: Runbook
    url: https://runbooks.example.com
    open_in_new_tab: true

rows:
  - name: Traffic
    panels:
      - timeseries:
          title: Requests
          targets:
            - prometheus:
                query: sum(rate(http_requests_total[$interval]))
                legend: total
      - stat:
          title: Up
          span: 3
          targets:
            - prometheus: {query: up}
  - name: Logs
    collapse: true
    panels:
      - logs:
          title: Errors
          datasource: loki
          targets:
            - loki: {query: '{app="api"} |= "error"'}
"#;

    fn board(document: &Document) -> serde_json::Value {
        serde_json::from_str(&document.dashboard.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_decode_document() {
        let document = decode(DOCUMENT).unwrap();
        let value = board(&document);

        assert_eq!(value["title"], json!("Service overview"));
        assert_eq!(value["uid"], json!("service-overview"));
        assert_eq!(value["editable"], json!(false));
        assert_eq!(value["refresh"], json!("30s"));
        assert_eq!(value["time"], json!({"from": "now-6h", "to": "now"}));
        assert_eq!(value["timezone"], json!("utc"));
        assert_eq!(value["tags"], json!(["generated", "service"]));
        assert_eq!(value["templating"]["list"][0]["query"], json!("30s,1m,5m"));
        assert_eq!(
            value["templating"]["list"][1]["datasource"],
            json!("prometheus-main")
        );
        assert_eq!(value["links"][0]["targetBlank"], json!(true));
        assert!(document.alertmanager.is_none());
    }

    #[test]
    fn test_panels_inherit_datasource() {
        let value = board(&decode(DOCUMENT).unwrap());
        let panels = value["panels"].as_array().unwrap();

        // row, timeseries, stat, collapsed row
        assert_eq!(panels.len(), 4);
        assert_eq!(panels[1]["datasource"], json!("prometheus-main"));
        assert_eq!(panels[2]["datasource"], json!("prometheus-main"));
        assert_eq!(panels[3]["collapsed"], json!(true));
        assert_eq!(panels[3]["panels"][0]["datasource"], json!("loki"));
    }

    #[test]
    fn test_fallback_datasource_from_options() {
        let source = "title: x\nrows:\n  - name: r\n    panels:\n      - stat: {title: s}";
        let options = DecoderOptions {
            default_datasource: Some("fallback".to_string()),
        };
        let value = board(&decode_with(source, &options).unwrap());
        assert_eq!(value["panels"][1]["datasource"], json!("fallback"));

        let source = "title: x\ndatasource: doc\nrows:\n  - name: r\n    panels:\n      - stat: {title: s}";
        let value = board(&decode_with(source, &options).unwrap());
        assert_eq!(value["panels"][1]["datasource"], json!("doc"));
    }

    #[test]
    fn test_unknown_key_path() {
        let source = r#"
title: x
rows:
  - name: r
    panels:
      - text: {title: notes, markdown: hi}
      - timeseries:
          title: t
          targets:
            - prometheus: {query: up, legnd: x}
"#;
        match decode(source) {
            Err(Error::Decode { path, message }) => {
                assert_eq!(
                    path,
                    "rows[0].panels[1].timeseries.targets[0].prometheus.legnd"
                );
                assert_eq!(message, "unknown key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_top_level_key() {
        match decode("title: x\ncolumns: []") {
            Err(e) => assert_eq!(e.to_string(), "columns: unknown key"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_title() {
        match decode("uid: abcdefgh") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "title");
                assert_eq!(message, "missing required key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_yaml_syntax_error() {
        match decode("title: [unterminated") {
            Err(Error::Yaml { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(decode(""), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_builder_errors_surface() {
        match decode("title: x\nuid: bad uid!") {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "uid");
                assert!(message.contains("invalid uid"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let source = "title: x\nrows:\n  - name: r\n    panels:\n      - text: {title: t, span: 20}";
        match decode(source) {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "rows[0].panels[0].text");
                assert_eq!(
                    message,
                    "text 't': invalid span '20': must be between 1 and 12"
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let source = "title: x\nvariables:\n  - text: {name: env}\n  - text: {name: env}";
        match decode(source) {
            Err(Error::InvalidArgument { field, value, .. }) => {
                assert_eq!(field, "name");
                assert_eq!(value, "env");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_decoded_document_matches_builders() {
        use crate::panel::{CommonOptions, TimeSeries, WithTargets};
        use crate::target::Loki;

        let source = r#"
title: Logs
rows:
  - name: API
    panels:
      - timeseries:
          title: Error rate
          datasource: loki
          targets:
            - loki:
                query: 'sum(rate({app="api"} |= "error" [5m]))'
                legend: errors
"#;
        let decoded = board(&decode(source).unwrap());

        let built = DashboardBuilder::new("Logs")
            .row(
                Row::new("API").with_panel(
                    TimeSeries::new("Error rate")
                        .datasource("loki")
                        .with_target(
                            Loki::new(r#"sum(rate({app="api"} |= "error" [5m]))"#).legend("errors"),
                        ),
                ),
            )
            .build()
            .unwrap();
        let built: serde_json::Value = serde_json::from_str(&built.to_json().unwrap()).unwrap();

        assert_eq!(decoded, built);

        let panels = decoded["panels"].as_array().unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0]["type"], json!("row"));
        assert_eq!(panels[1]["type"], json!("timeseries"));
        assert_eq!(panels[1]["datasource"], json!("loki"));
        assert_eq!(panels[1]["targets"][0]["refId"], json!("A"));
        assert_eq!(
            panels[1]["targets"][0]["expr"],
            json!(r#"sum(rate({app="api"} |= "error" [5m]))"#)
        );
        assert_eq!(panels[1]["targets"][0]["legendFormat"], json!("errors"));
    }

    #[test]
    fn test_alertmanager_block() {
        let source = r#"
title: x
alertmanager:
  contact_points:
    - name: team
      contacts:
        - discord: {webhook: 'https://discord.example.com/hook'}
"#;
        let document = decode(source).unwrap();
        let manager = document.alertmanager.unwrap();
        assert_eq!(manager.default_contact_point(), "team");
    }
}
