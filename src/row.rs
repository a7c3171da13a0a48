//! Rows group panels under a title. An expanded row is followed by its
//! panels in the dashboard list; a collapsed row carries them inside itself.

use crate::kernel::{Builder, ErrorSlot};
use crate::model::{Panel, PanelKind, RowPanel};
use crate::panel::{IntoPanel, PanelDraft};
use crate::Result;

#[derive(Debug)]
pub struct Row {
    title: String,
    show_title: bool,
    collapsed: bool,
    repeat: Option<String>,
    panels: Vec<PanelDraft>,
    errors: ErrorSlot,
}

impl Builder for Row {}

impl Row {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            show_title: true,
            collapsed: false,
            repeat: None,
            panels: Vec::new(),
            errors: ErrorSlot::default(),
        }
    }

    pub fn hide_title(mut self) -> Self {
        self.show_title = false;
        self
    }

    pub fn collapse(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Repeats the row for every value of the given variable.
    pub fn repeat_for(mut self, variable: impl Into<String>) -> Self {
        self.repeat = Some(variable.into());
        self
    }

    pub fn with_panel(mut self, panel: impl IntoPanel) -> Self {
        if let Some(draft) = self.errors.take(panel.into_panel()) {
            self.panels.push(draft);
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn build(self) -> Result<RowDraft> {
        self.errors.into_result()?;

        let mut row = Panel::new(
            self.title,
            PanelKind::Row(RowPanel {
                collapsed: self.collapsed,
                show_title: self.show_title,
                panels: Vec::new(),
            }),
        );
        row.repeat = self.repeat;

        Ok(RowDraft {
            row,
            panels: self.panels,
        })
    }
}

/// A validated row waiting for the dashboard layout.
#[derive(Debug)]
pub(crate) struct RowDraft {
    pub(crate) row: Panel,
    pub(crate) panels: Vec<PanelDraft>,
}

impl RowDraft {
    pub(crate) fn is_collapsed(&self) -> bool {
        matches!(&self.row.kind, PanelKind::Row(row) if row.collapsed)
    }
}
