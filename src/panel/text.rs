use super::{CommonOptions, IntoPanel, PanelBase, PanelDraft};
use crate::kernel::Builder;
use crate::model::{PanelKind, TextOptions, TextPanel};
use crate::Result;

/// Static markdown or HTML content.
#[derive(Debug)]
pub struct Text {
    base: PanelBase,
    options: TextOptions,
}

impl Builder for Text {}

impl CommonOptions for Text {
    fn base_mut(&mut self) -> &mut PanelBase {
        &mut self.base
    }
}

impl Text {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            base: PanelBase::new("text", title),
            options: TextOptions {
                mode: String::new(),
                content: String::new(),
            },
        }
        .markdown("")
    }

    pub fn markdown(mut self, content: impl Into<String>) -> Self {
        self.options.mode = "markdown".to_string();
        self.options.content = content.into();
        self
    }

    pub fn html(mut self, content: impl Into<String>) -> Self {
        self.options.mode = "html".to_string();
        self.options.content = content.into();
        self
    }
}

impl IntoPanel for Text {
    fn into_panel(self) -> Result<PanelDraft> {
        let panel = self.base.finish(PanelKind::Text(TextPanel {
            options: self.options,
        }))?;
        Ok(PanelDraft { panel, alert: None })
    }
}
