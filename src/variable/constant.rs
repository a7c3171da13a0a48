use super::{set_default, set_values, IntoVariable, VariableOptions};
use crate::kernel::Builder;
use crate::model::TemplateVar;
use crate::Result;

#[derive(Debug)]
pub struct Constant {
    var: TemplateVar,
}

impl Builder for Constant {}

impl VariableOptions for Constant {
    fn var_mut(&mut self) -> &mut TemplateVar {
        &mut self.var
    }
}

impl Constant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            var: TemplateVar::new(name, "constant"),
        }
    }

    pub fn values<I, T, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: Into<String>,
    {
        set_values(&mut self.var, values);
        self
    }

    pub fn default(mut self, value: impl AsRef<str>) -> Self {
        set_default(&mut self.var, value.as_ref());
        self
    }
}

impl IntoVariable for Constant {
    fn into_variable(self) -> Result<TemplateVar> {
        Ok(self.var)
    }
}
