use super::axis::Axis;
use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft, WithTargets};
use crate::kernel::Builder;
use crate::model::{
    self, HeatmapCards, HeatmapColor, HeatmapPanel, HeatmapTooltip, PanelKind, Toggle,
};
use crate::Result;
use std::str::FromStr;

/// Shape of the data returned by the queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Each series is a pre-computed bucket.
    TimeSeriesBuckets,
    /// Raw series, bucketed by the panel.
    TimeSeries,
}

impl DataFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DataFormat::TimeSeriesBuckets => "tsbuckets",
            DataFormat::TimeSeries => "timeseries",
        }
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "time_series_buckets" | "tsbuckets" => Ok(DataFormat::TimeSeriesBuckets),
            "time_series" | "timeseries" => Ok(DataFormat::TimeSeries),
            other => Err(format!("unknown data format '{}'", other)),
        }
    }
}

#[derive(Debug)]
pub struct Heatmap {
    base: PanelBase,
    panel: HeatmapPanel,
}

impl Builder for Heatmap {}

impl CommonOptions for Heatmap {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl WithTargets for Heatmap {}

impl Heatmap {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("heatmap", title),
            panel: HeatmapPanel {
                data_format: String::new(),
                hide_zero_buckets: true,
                highlight_cards: true,
                reverse_y_buckets: false,
                cards: HeatmapCards::default(),
                color: HeatmapColor {
                    card_color: "#b4ff00".to_string(),
                    color_scale: "sqrt".to_string(),
                    color_scheme: "interpolateSpectral".to_string(),
                    exponent: 0.5,
                    mode: "spectrum".to_string(),
                },
                legend: Toggle { show: true },
                tooltip: HeatmapTooltip {
                    show: true,
                    show_histogram: true,
                },
                tooltip_decimals: None,
                x_axis: Toggle { show: true },
                y_axis: model::Axis::default(),
                y_bucket_bound: "auto".to_string(),
            },
        }
        .span(6.0)
        .data_format(DataFormat::TimeSeriesBuckets)
    }

    pub fn data_format(mut self, format: DataFormat) -> Self {
        self.panel.data_format = format.as_str().to_string();
        self
    }

    pub fn show_zero_buckets(mut self) -> Self {
        self.panel.hide_zero_buckets = false;
        self
    }

    pub fn no_highlight_cards(mut self) -> Self {
        self.panel.highlight_cards = false;
        self
    }

    /// Draws the highest bucket at the bottom.
    pub fn reverse_y_buckets(mut self) -> Self {
        self.panel.reverse_y_buckets = true;
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.panel.legend.show = false;
        self
    }

    pub fn hide_tooltip(mut self) -> Self {
        self.panel.tooltip.show = false;
        self
    }

    pub fn hide_tooltip_histogram(mut self) -> Self {
        self.panel.tooltip.show_histogram = false;
        self
    }

    pub fn tooltip_decimals(mut self, decimals: u32) -> Self {
        self.panel.tooltip_decimals = Some(decimals);
        self
    }

    pub fn hide_x_axis(mut self) -> Self {
        self.panel.x_axis.show = false;
        self
    }

    pub fn y_axis(mut self, axis: Axis) -> Self {
        if let Some(axis) = self.base.take(axis.build()) {
            self.panel.y_axis = axis;
        }
        self
    }
}

impl IntoPanel for Heatmap {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Heatmap(self.panel))?;
        Ok(PanelDraft { panel, alert: None })
    }
}
