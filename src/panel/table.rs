use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::kernel::Builder;
use crate::model::{ColumnStyle, PanelKind, TableColumn, TablePanel};
use crate::Result;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationType {
    Avg,
    Count,
    Current,
    Min,
    Max,
    Total,
}

impl AggregationType {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationType::Avg => "avg",
            AggregationType::Count => "count",
            AggregationType::Current => "current",
            AggregationType::Min => "min",
            AggregationType::Max => "max",
            AggregationType::Total => "total",
        }
    }
}

impl FromStr for AggregationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "avg" => Ok(AggregationType::Avg),
            "count" => Ok(AggregationType::Count),
            "current" => Ok(AggregationType::Current),
            "min" => Ok(AggregationType::Min),
            "max" => Ok(AggregationType::Max),
            "total" => Ok(AggregationType::Total),
            other => Err(format!("unknown aggregation '{}'", other)),
        }
    }
}

/// A column of a `timeseries_aggregations` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub label: String,
    pub aggregation: AggregationType,
}

impl Aggregation {
    pub fn new(label: impl Into<String>, aggregation: AggregationType) -> Self {
        Self {
            label: label.into(),
            aggregation,
        }
    }
}

/// The legacy table panel.
#[derive(Debug)]
pub struct Table {
    base: PanelBase,
    panel: TablePanel,
}

impl Builder for Table {}

impl CommonOptions for Table {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for Table {}

impl Table {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("table", title),
            panel: TablePanel {
                styles: vec![ColumnStyle {
                    alias: String::new(),
                    pattern: "/.*/".to_string(),
                    style_type: "string".to_string(),
                }],
                transform: "timeseries_to_rows".to_string(),
                columns: Vec::new(),
            },
        }
    }

    /// Hides the columns whose name matches `pattern`.
    pub fn hide_column(mut self, pattern: impl Into<String>) -> Self {
        let style = ColumnStyle {
            alias: String::new(),
            pattern: pattern.into(),
            style_type: "hidden".to_string(),
        };
        self.panel.styles.insert(0, style);
        self
    }

    /// One row per series, one column per aggregation.
    pub fn as_time_series_aggregations(mut self, aggregations: Vec<Aggregation>) -> Self {
        self.panel.transform = "timeseries_aggregations".to_string();
        self.panel.columns = aggregations
            .into_iter()
            .map(|aggregation| TableColumn {
                text: aggregation.label,
                value: aggregation.aggregation.as_str().to_string(),
            })
            .collect();
        self
    }

    pub fn as_time_series_to_columns(mut self) -> Self {
        self.panel.transform = "timeseries_to_columns".to_string();
        self.panel.columns.clear();
        self
    }
}

impl IntoPanel for Table {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Table(self.panel))?;
        Ok(PanelDraft { panel, alert: None })
    }
}
