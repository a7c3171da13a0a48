use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Dashboard auto refresh. Grafana stores either an interval string or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Refresh {
    Flag(bool),
    Interval(String),
}

/// Tooltip and crosshair sharing between the panels of a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphTooltip {
    #[default]
    Default,
    SharedCrosshair,
    SharedTooltip,
}

impl GraphTooltip {
    pub fn as_u8(self) -> u8 {
        match self {
            GraphTooltip::Default => 0,
            GraphTooltip::SharedCrosshair => 1,
            GraphTooltip::SharedTooltip => 2,
        }
    }
}

impl Serialize for GraphTooltip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for GraphTooltip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(GraphTooltip::Default),
            1 => Ok(GraphTooltip::SharedCrosshair),
            2 => Ok(GraphTooltip::SharedTooltip),
            other => Err(serde::de::Error::custom(format!(
                "unknown graphTooltip mode {}",
                other
            ))),
        }
    }
}

/// Reference to a data source, either by name (legacy) or by `{type, uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasourceRef {
    Name(String),
    Ref {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        datasource_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uid: Option<String>,
    },
}

impl DatasourceRef {
    pub fn name(name: impl Into<String>) -> Self {
        DatasourceRef::Name(name.into())
    }

    pub fn uid(datasource_type: impl Into<String>, uid: impl Into<String>) -> Self {
        DatasourceRef::Ref {
            datasource_type: Some(datasource_type.into()),
            uid: Some(uid.into()),
        }
    }

    /// The name or uid identifying the data source.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            DatasourceRef::Name(name) => Some(name),
            DatasourceRef::Ref { uid, .. } => uid.as_deref(),
        }
    }
}

/// Write-only credentials. Values never appear in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecureSettings(BTreeMap<String, String>);

impl SecureSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Debug for SecureSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_refresh_union() {
        assert_eq!(
            serde_json::to_value(Refresh::Interval("30s".into())).unwrap(),
            json!("30s")
        );
        assert_eq!(serde_json::to_value(Refresh::Flag(false)).unwrap(), json!(false));

        let decoded: Refresh = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(decoded, Refresh::Flag(false));
        let decoded: Refresh = serde_json::from_value(json!("1m")).unwrap();
        assert_eq!(decoded, Refresh::Interval("1m".into()));
    }

    #[test]
    fn test_graph_tooltip_is_numeric() {
        assert_eq!(
            serde_json::to_value(GraphTooltip::SharedCrosshair).unwrap(),
            json!(1)
        );
        let decoded: GraphTooltip = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(decoded, GraphTooltip::SharedTooltip);
        assert!(serde_json::from_value::<GraphTooltip>(json!(7)).is_err());
    }

    #[test]
    fn test_datasource_ref_shapes() {
        assert_eq!(
            serde_json::to_value(DatasourceRef::name("prom")).unwrap(),
            json!("prom")
        );
        assert_eq!(
            serde_json::to_value(DatasourceRef::uid("loki", "abc")).unwrap(),
            json!({"type": "loki", "uid": "abc"})
        );
        let decoded: DatasourceRef =
            serde_json::from_value(json!({"type": "prometheus", "uid": "x"})).unwrap();
        assert_eq!(decoded.identifier(), Some("x"));
    }

    #[test]
    fn test_secure_settings_are_redacted() {
        let mut secure = SecureSettings::new();
        secure.insert("apiKey", "hunter2");
        let debug = format!("{:?}", secure);
        assert!(debug.contains("apiKey"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(
            serde_json::to_value(&secure).unwrap(),
            json!({"apiKey": "hunter2"})
        );
    }
}
