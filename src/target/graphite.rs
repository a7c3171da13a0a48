use super::IntoTarget;
use crate::kernel::Builder;
use crate::model::Target;

#[derive(Debug, Clone)]
pub struct Graphite {
    target: Target,
}

impl Builder for Graphite {}

impl Graphite {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            target: Target {
                target: Some(query.into()),
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
}

impl IntoTarget for Graphite {
    fn into_target(self) -> Target {
        self.target
    }
}
