//! Panel builders.
//!
//! Every builder embeds a [`PanelBase`] carrying the settings shared by all
//! kinds and exposes them through [`CommonOptions`]. Builders accepting
//! arbitrary queries also implement [`WithTargets`]. A finished builder is
//! handed to a row through [`IntoPanel`].

pub mod axis;
pub mod gauge;
pub mod graph;
pub mod heatmap;
pub mod logs;
pub mod mapping;
pub mod options;
pub mod scheme;
pub mod singlestat;
pub mod stat;
pub mod table;
pub mod text;
pub mod threshold;
pub mod timeseries;

pub use gauge::Gauge;
pub use graph::Graph;
pub use heatmap::Heatmap;
pub use logs::Logs;
pub use singlestat::SingleStat;
pub use stat::Stat;
pub use table::Table;
pub use text::Text;
pub use timeseries::TimeSeries;

use crate::alert::Alert;
use crate::error::ensure_range;
use crate::kernel::ErrorSlot;
use crate::model::{AlertGroup, DatasourceRef, GridPos, Panel, PanelKind, PanelLink, Target};
use crate::target::{assign_refs, IntoTarget};
use crate::{Error, Result};

/// Grid width of a panel without an explicit span.
pub const DEFAULT_WIDTH: u32 = 12;
/// Grid height of a panel without an explicit height, roughly 250px.
pub const DEFAULT_HEIGHT: u32 = 8;

const PIXELS_PER_ROW: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatDirection {
    Horizontal,
    Vertical,
}

impl RepeatDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatDirection::Horizontal => "h",
            RepeatDirection::Vertical => "v",
        }
    }
}

/// Settings shared by every panel kind.
#[derive(Debug)]
pub struct PanelBase {
    kind: &'static str,
    title: String,
    description: Option<String>,
    transparent: bool,
    repeat: Option<String>,
    repeat_direction: Option<RepeatDirection>,
    datasource: Option<String>,
    links: Vec<PanelLink>,
    width: u32,
    height: u32,
    targets: Vec<Target>,
    errors: ErrorSlot,
}

impl PanelBase {
    pub(crate) fn new(kind: &'static str, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            transparent: false,
            repeat: None,
            repeat_direction: None,
            datasource: None,
            links: Vec::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            targets: Vec::new(),
            errors: ErrorSlot::default(),
        }
    }

    /// Name used in error messages, e.g. `graph 'CPU usage'`.
    pub(crate) fn resource(&self) -> String {
        format!("{} '{}'", self.kind, self.title)
    }

    pub(crate) fn record(&mut self, err: Error) {
        self.errors.record(err);
    }

    /// Keeps the value of a fallible step, recording its error otherwise.
    pub(crate) fn take<T>(&mut self, result: Result<T>) -> Option<T> {
        self.errors.take(result)
    }

    pub(crate) fn invalid(&mut self, field: &str, value: impl std::fmt::Display, reason: &str) {
        let err = Error::invalid(self.resource(), field, value, reason);
        self.errors.record(err);
    }

    pub(crate) fn push_target(&mut self, target: Target) {
        self.targets.push(target);
    }

    pub(crate) fn datasource_name(&self) -> Option<&str> {
        self.datasource.as_deref()
    }

    pub(crate) fn set_width(&mut self, span: f32) {
        let resource = self.resource();
        if let Some(span) = self.take(ensure_range(&resource, "span", span, 1.0, 12.0)) {
            self.width = (span * 2.0).round() as u32;
        }
    }

    pub(crate) fn set_height(&mut self, height: &str) {
        match parse_height(height) {
            Some(h) => self.height = h,
            None => self.invalid("height", height, "expected a pixel height such as '400px'"),
        }
    }

    /// Finalizes the panel: surfaces the first recorded error, names the
    /// targets and sizes the grid cell. Positions are computed by the
    /// dashboard layout.
    pub(crate) fn finish(mut self, kind: PanelKind) -> Result<Panel> {
        let resource = self.resource();
        self.errors.into_result()?;
        assign_refs(&resource, &mut self.targets)?;

        let mut panel = Panel::new(self.title, kind);
        panel.description = self.description;
        panel.transparent = self.transparent;
        panel.repeat = self.repeat;
        panel.repeat_direction = self
            .repeat_direction
            .map(|direction| direction.as_str().to_string());
        panel.datasource = self.datasource.map(DatasourceRef::Name);
        panel.links = self.links;
        panel.targets = self.targets;
        panel.grid_pos = GridPos {
            x: 0,
            y: 0,
            w: self.width,
            h: self.height,
        };

        Ok(panel)
    }
}

/// Accepts `"400px"` or `"400"` and converts it to grid rows.
fn parse_height(height: &str) -> Option<u32> {
    let pixels: f32 = height
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse()
        .ok()?;
    if !pixels.is_finite() || pixels <= 0.0 {
        return None;
    }
    Some(((pixels / PIXELS_PER_ROW).round() as u32).max(1))
}

/// Setters shared by every panel kind.
pub trait CommonOptions: Sized {
    fn base_mut(&mut self) -> &mut PanelBase;

    /// Width in twelfths of the dashboard, `1..=12`.
    fn span(mut self, span: f32) -> Self {
        self.base_mut().set_width(span);
        self
    }

    /// Height in pixels, e.g. `"400px"`.
    fn height(mut self, height: impl AsRef<str>) -> Self {
        self.base_mut().set_height(height.as_ref());
        self
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.base_mut().description = Some(description.into());
        self
    }

    fn transparent(mut self) -> Self {
        self.base_mut().transparent = true;
        self
    }

    /// Repeats the panel for every value of the given variable.
    fn repeat(mut self, variable: impl Into<String>) -> Self {
        self.base_mut().repeat = Some(variable.into());
        self
    }

    fn repeat_direction(mut self, direction: RepeatDirection) -> Self {
        self.base_mut().repeat_direction = Some(direction);
        self
    }

    /// Data source name or uid used by the panel's queries.
    fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.base_mut().datasource = Some(datasource.into());
        self
    }

    fn links<I>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = PanelLink>,
    {
        self.base_mut().links = links.into_iter().collect();
        self
    }
}

/// Panels accepting queries of any data source family.
pub trait WithTargets: CommonOptions {
    fn with_target(mut self, target: impl IntoTarget) -> Self {
        self.base_mut().push_target(target.into_target());
        self
    }
}

/// A finished panel, along with the alert attached to it if any.
#[derive(Debug, Clone)]
pub struct PanelDraft {
    pub(crate) panel: Panel,
    pub(crate) alert: Option<AlertGroup>,
}

impl PanelDraft {
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn alert(&self) -> Option<&AlertGroup> {
        self.alert.as_ref()
    }
}

/// Conversion of a panel builder into a panel ready for layout.
pub trait IntoPanel {
    fn into_panel(self) -> Result<PanelDraft>;
}

impl IntoPanel for PanelDraft {
    fn into_panel(self) -> Result<PanelDraft> {
        Ok(self)
    }
}

/// Builds the alert attached to a panel, pointing its queries at the
/// panel's data source.
pub(crate) fn build_alert(alert: Option<Alert>, datasource: Option<&str>) -> Result<Option<AlertGroup>> {
    let Some(alert) = alert else {
        return Ok(None);
    };

    let alert = match datasource {
        Some(uid) => alert.datasource_uid(uid),
        None => alert,
    };
    alert.build().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Prometheus;

    #[test]
    fn test_parse_height() {
        assert_eq!(parse_height("400px"), Some(13));
        assert_eq!(parse_height("250"), Some(8));
        assert_eq!(parse_height(" 90 px"), Some(3));
        assert_eq!(parse_height("tall"), None);
        assert_eq!(parse_height("-30px"), None);
    }

    #[test]
    fn test_span_maps_to_width() {
        let panel = Text::new("notes").span(4.0).into_panel().unwrap().panel;
        assert_eq!(panel.grid_pos.w, 8);

        let panel = Text::new("notes").into_panel().unwrap().panel;
        assert_eq!(panel.grid_pos.w, DEFAULT_WIDTH);
        assert_eq!(panel.grid_pos.h, DEFAULT_HEIGHT);
    }

    #[test]
    fn test_invalid_span() {
        match Text::new("notes").span(13.0).into_panel() {
            Err(Error::InvalidArgument {
                resource, field, ..
            }) => {
                assert_eq!(resource, "text 'notes'");
                assert_eq!(field, "span");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_common_options() {
        let panel = Graph::new("cpu")
            .description("CPU usage")
            .transparent()
            .repeat("host")
            .repeat_direction(RepeatDirection::Horizontal)
            .datasource("prometheus")
            .height("300px")
            .links([PanelLink {
                title: "runbook".to_string(),
                url: "https://runbooks/cpu".to_string(),
                target_blank: true,
            }])
            .with_target(Prometheus::new("up"))
            .into_panel()
            .unwrap()
            .panel;

        assert_eq!(panel.description.as_deref(), Some("CPU usage"));
        assert!(panel.transparent);
        assert_eq!(panel.repeat.as_deref(), Some("host"));
        assert_eq!(panel.repeat_direction.as_deref(), Some("h"));
        assert_eq!(panel.datasource, Some(DatasourceRef::name("prometheus")));
        assert_eq!(panel.grid_pos.h, 10);
        assert_eq!(panel.links.len(), 1);
        assert_eq!(panel.targets[0].ref_id, "A");
    }
}
