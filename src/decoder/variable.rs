use super::value::*;
use crate::model::TemplateVar;
use crate::variable::{
    Constant, Custom, Datasource, Interval, IntoVariable, Query, TextBox, VariableOptions,
};
use crate::{Error, Result};
use yaml_rust::Yaml;

const VARIABLE_KINDS: [&str; 6] = ["query", "custom", "const", "interval", "datasource", "text"];

/// Decodes one `variables` entry. Query variables without a `datasource` key
/// use `datasource` when one is given.
pub(super) fn decode_variable(
    v: &Yaml,
    path: &str,
    datasource: Option<&str>,
) -> Result<TemplateVar> {
    let (kind, v, path) = variant(v, path, &VARIABLE_KINDS)?;
    let name = required_string(v, &path, "name")?;

    let variable = match kind {
        "query" => {
            let mut variable = Query::new(name);
            for (key, value, path) in entries(v, &path)? {
                variable = match key {
                    "datasource" => variable.datasource(as_string(value, &path)?),
                    "request" => variable.request(as_string(value, &path)?),
                    "regex" => variable.regex(as_string(value, &path)?),
                    "sort" => variable.sort(parse(value, &path)?),
                    "refresh" => variable.refresh(parse(value, &path)?),
                    "include_all" => flag(variable, value, &path, Query::include_all)?,
                    "default_all" => flag(variable, value, &path, Query::default_all)?,
                    "all_value" => variable.all_value(as_string(value, &path)?),
                    "default" => variable.default(as_string(value, &path)?),
                    "multi" => flag(variable, value, &path, Query::multi)?,
                    _ => common(variable, key, value, &path)?,
                };
            }
            match datasource {
                Some(name) if !variable.has_datasource() => variable.datasource(name),
                _ => variable,
            }
            .into_variable()
        }
        "custom" => {
            let mut variable = Custom::new(name);
            for (key, value, path) in entries(v, &path)? {
                variable = match key {
                    "values_map" => variable.values(as_string_pairs(value, &path)?),
                    "default" => variable.default(as_string(value, &path)?),
                    "include_all" => flag(variable, value, &path, Custom::include_all)?,
                    "default_all" => flag(variable, value, &path, Custom::default_all)?,
                    "all_value" => variable.all_value(as_string(value, &path)?),
                    "multi" => flag(variable, value, &path, Custom::multi)?,
                    _ => common(variable, key, value, &path)?,
                };
            }
            variable.into_variable()
        }
        "const" => {
            let mut variable = Constant::new(name);
            for (key, value, path) in entries(v, &path)? {
                variable = match key {
                    "values_map" => variable.values(as_string_pairs(value, &path)?),
                    "default" => variable.default(as_string(value, &path)?),
                    _ => common(variable, key, value, &path)?,
                };
            }
            variable.into_variable()
        }
        "interval" => {
            let mut variable = Interval::new(name);
            for (key, value, path) in entries(v, &path)? {
                variable = match key {
                    "values" => variable.values(as_string_list(value, &path)?),
                    "default" => variable.default(as_string(value, &path)?),
                    _ => common(variable, key, value, &path)?,
                };
            }
            variable.into_variable()
        }
        "datasource" => {
            let mut variable = Datasource::new(name);
            for (key, value, path) in entries(v, &path)? {
                variable = match key {
                    "type" => variable.datasource_type(as_string(value, &path)?),
                    "regex" => variable.regex(as_string(value, &path)?),
                    "include_all" => flag(variable, value, &path, Datasource::include_all)?,
                    "multi" => flag(variable, value, &path, Datasource::multi)?,
                    _ => common(variable, key, value, &path)?,
                };
            }
            variable.into_variable()
        }
        _ => {
            let mut variable = TextBox::new(name);
            for (key, value, path) in entries(v, &path)? {
                variable = match key {
                    "default" => variable.default(as_string(value, &path)?),
                    _ => common(variable, key, value, &path)?,
                };
            }
            variable.into_variable()
        }
    };
    located(variable, &path)
}

fn common<V: VariableOptions>(variable: V, key: &str, v: &Yaml, path: &str) -> Result<V> {
    Ok(match key {
        "name" => variable,
        "label" => variable.label(as_string(v, path)?),
        "hide" => match as_string(v, path)?.as_str() {
            "label" => variable.hide_label(),
            "variable" => variable.hide(),
            other => return Err(Error::decode(path, format!("unknown hide mode '{}'", other))),
        },
        _ => return Err(unknown_key(path)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yaml_rust::YamlLoader;

    fn load(source: &str) -> Yaml {
        YamlLoader::load_from_str(source).unwrap().remove(0)
    }

    fn to_json(variable: TemplateVar) -> serde_json::Value {
        serde_json::to_value(variable).unwrap()
    }

    #[test]
    fn test_query_variable() {
        let doc = load(
            "query:
  name: instance
  label: Instance
  request: label_values(up, instance)
  include_all: true
  refresh: time_change",
        );
        let value = to_json(decode_variable(&doc, "variables[0]", Some("prom")).unwrap());

        assert_eq!(value["type"], json!("query"));
        assert_eq!(value["name"], json!("instance"));
        assert_eq!(value["label"], json!("Instance"));
        assert_eq!(value["datasource"], json!("prom"));
        assert_eq!(value["refresh"], json!(2));
        assert_eq!(value["includeAll"], json!(true));
    }

    #[test]
    fn test_custom_values_keep_order() {
        let doc = load(
            "custom:
  name: env
  values_map:
    prod: production
    dev: development
  default: development",
        );
        let value = to_json(decode_variable(&doc, "variables[0]", None).unwrap());

        assert_eq!(value["query"], json!("production,development"));
        assert_eq!(value["options"][0]["text"], json!("prod"));
        assert_eq!(value["current"]["value"], json!("development"));
    }

    #[test]
    fn test_interval_values_sorted() {
        let doc = load("interval:\n  name: step\n  values: [1h, 30s, 5m]");
        let value = to_json(decode_variable(&doc, "variables[0]", None).unwrap());
        assert_eq!(value["query"], json!("30s,5m,1h"));

        let doc = load("interval:\n  name: step\n  values: [soon]");
        match decode_variable(&doc, "variables[0]", None) {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "variables[0].interval");
                assert!(message.contains("invalid"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_hide_modes() {
        let doc = load("text:\n  name: filter\n  hide: label");
        let value = to_json(decode_variable(&doc, "variables[0]", None).unwrap());
        assert_eq!(value["hide"], json!(1));

        let doc = load("text:\n  name: filter\n  hide: always");
        match decode_variable(&doc, "variables[2]", None) {
            Err(Error::Decode { path, .. }) => assert_eq!(path, "variables[2].text.hide"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_variable_kind() {
        let doc = load("adhoc:\n  name: filters");
        match decode_variable(&doc, "variables[0]", None) {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "variables[0].adhoc");
                assert_eq!(message, "unknown key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
