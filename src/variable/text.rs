use super::{IntoVariable, VariableOptions};
use crate::kernel::Builder;
use crate::model::{Current, TemplateVar};
use crate::Result;

/// Free-form input.
#[derive(Debug)]
pub struct TextBox {
    var: TemplateVar,
}

impl Builder for TextBox {}

impl VariableOptions for TextBox {
    fn var_mut(&mut self) -> &mut TemplateVar {
        &mut self.var
    }
}

impl TextBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            var: TemplateVar::new(name, "textbox"),
        }
    }

    pub fn default(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.var.current = Some(Current::new(value.as_str(), value.as_str()));
        self.var.query = value;
        self
    }
}

impl IntoVariable for TextBox {
    fn into_variable(self) -> Result<TemplateVar> {
        Ok(self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_box() {
        let var = TextBox::new("filter")
            .default("status=500")
            .hide_label()
            .into_variable()
            .unwrap();

        assert_eq!(var.var_type, "textbox");
        assert_eq!(var.query, "status=500");
        assert_eq!(var.hide, 1);
        assert_eq!(var.current, Some(Current::new("status=500", "status=500")));
    }
}
