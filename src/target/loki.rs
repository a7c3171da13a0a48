use super::IntoTarget;
use crate::kernel::Builder;
use crate::model::Target;

/// A LogQL query.
#[derive(Debug, Clone)]
pub struct Loki {
    target: Target,
}

impl Builder for Loki {}

impl Loki {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            target: Target {
                expr: Some(expr.into()),
                ..Default::default()
            },
        }
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.target.ref_id = ref_id.into();
        self
    }

    pub fn hide(mut self) -> Self {
        self.target.hide = Some(true);
        self
    }

    pub fn legend(mut self, legend: impl Into<String>) -> Self {
        self.target.legend_format = Some(legend.into());
        self
    }
}

impl IntoTarget for Loki {
    fn into_target(self) -> Target {
        self.target
    }
}
