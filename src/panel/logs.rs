use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft};
use crate::kernel::Builder;
use crate::model::{LogsOptions, LogsPanel, PanelKind};
use crate::target::{IntoTarget, Loki};
use crate::Result;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// How near-identical log lines are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dedup {
    None,
    Exact,
    Numbers,
    Signature,
}

impl Dedup {
    pub fn as_str(self) -> &'static str {
        match self {
            Dedup::None => "none",
            Dedup::Exact => "exact",
            Dedup::Numbers => "numbers",
            Dedup::Signature => "signature",
        }
    }
}

impl FromStr for Dedup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(Dedup::None),
            "exact" => Ok(Dedup::Exact),
            "numbers" => Ok(Dedup::Numbers),
            "signature" => Ok(Dedup::Signature),
            other => Err(format!("unknown dedup strategy '{}'", other)),
        }
    }
}

/// Log lines returned by Loki queries.
#[derive(Debug)]
pub struct Logs {
    base: PanelBase,
    options: LogsOptions,
}

impl Builder for Logs {}

impl CommonOptions for Logs {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl Logs {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("logs", title),
            options: LogsOptions {
                show_time: false,
                show_labels: false,
                show_common_labels: false,
                wrap_log_message: false,
                prettify_log_message: false,
                enable_log_details: true,
                sort_order: String::new(),
                dedup_strategy: String::new(),
            },
        }
        .span(6.0)
        .order(SortOrder::Descending)
        .dedup(Dedup::None)
    }

    pub fn with_target(mut self, target: Loki) -> Self {
        self.base.push_target(target.into_target());
        self
    }

    pub fn time(mut self) -> Self {
        self.options.show_time = true;
        self
    }

    /// Shows the labels unique to each line.
    pub fn unique_labels(mut self) -> Self {
        self.options.show_labels = true;
        self
    }

    pub fn common_labels(mut self) -> Self {
        self.options.show_common_labels = true;
        self
    }

    pub fn wrap_lines(mut self) -> Self {
        self.options.wrap_log_message = true;
        self
    }

    /// Pretty-prints JSON log lines.
    pub fn prettify_json(mut self) -> Self {
        self.options.prettify_log_message = true;
        self
    }

    pub fn disable_log_details(mut self) -> Self {
        self.options.enable_log_details = false;
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.options.sort_order = order.as_str().to_string();
        self
    }

    pub fn dedup(mut self, dedup: Dedup) -> Self {
        self.options.dedup_strategy = dedup.as_str().to_string();
        self
    }
}

impl IntoPanel for Logs {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Logs(LogsPanel {
            options: self.options,
        }))?;
        Ok(PanelDraft { panel, alert: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let panel = Logs::new("api logs").into_panel().unwrap().panel;
        let value = serde_json::to_value(&panel).unwrap();

        assert_eq!(value["type"], json!("logs"));
        assert_eq!(value["gridPos"]["w"], json!(12));
        assert_eq!(
            value["options"],
            json!({
                "showTime": false,
                "showLabels": false,
                "showCommonLabels": false,
                "wrapLogMessage": false,
                "prettifyLogMessage": false,
                "enableLogDetails": true,
                "sortOrder": "Descending",
                "dedupStrategy": "none"
            })
        );
    }

    #[test]
    fn test_options_and_targets() {
        let panel = Logs::new("api logs")
            .datasource("loki")
            .time()
            .unique_labels()
            .wrap_lines()
            .prettify_json()
            .order(SortOrder::Ascending)
            .dedup(Dedup::Signature)
            .with_target(Loki::new("{app=\"api\"}"))
            .into_panel()
            .unwrap()
            .panel;

        match &panel.kind {
            PanelKind::Logs(logs) => {
                assert!(logs.options.show_time);
                assert!(logs.options.show_labels);
                assert!(!logs.options.show_common_labels);
                assert!(logs.options.wrap_log_message);
                assert!(logs.options.prettify_log_message);
                assert_eq!(logs.options.sort_order, "Ascending");
                assert_eq!(logs.options.dedup_strategy, "signature");
            }
            other => panic!("unexpected kind: {:?}", other),
        }
        assert_eq!(panel.targets[0].ref_id, "A");
        assert_eq!(panel.targets[0].expr.as_deref(), Some("{app=\"api\"}"));
    }
}
