use super::{default_all, include_all, set_default, set_values, IntoVariable, VariableOptions};
use crate::kernel::Builder;
use crate::model::TemplateVar;
use crate::Result;

/// A fixed list of values the user picks from.
#[derive(Debug)]
pub struct Custom {
    var: TemplateVar,
}

impl Builder for Custom {}

impl VariableOptions for Custom {
    fn var_mut(&mut self) -> &mut TemplateVar {
        &mut self.var
    }
}

impl Custom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            var: TemplateVar::new(name, "custom"),
        }
    }

    /// `(text, value)` pairs, kept in order.
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

    pub fn multi(mut self) -> Self {
        self.var.multi = true;
        self
    }

    pub fn include_all(mut self) -> Self {
        include_all(&mut self.var);
        self
    }

    pub fn default_all(mut self) -> Self {
        default_all(&mut self.var);
        self
    }

    pub fn all_value(mut self, value: impl Into<String>) -> Self {
        self.var.all_value = Some(value.into());
        self
    }
}

impl IntoVariable for Custom {
    fn into_variable(self) -> Result<TemplateVar> {
        Ok(self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Current, VarOption};
    use serde_json::json;

    #[test]
    fn test_values_and_default() {
        let var = Custom::new("percentile")
            .values([("50th", "50"), ("90th", "90"), ("99th", "99")])
            .default("90")
            .into_variable()
            .unwrap();

        assert_eq!(var.var_type, "custom");
        assert_eq!(var.query, "50,90,99");
        assert_eq!(var.options[2], VarOption::new("99th", "99"));
        assert_eq!(var.current, Some(Current::new("90th", "90")));
    }

    #[test]
    fn test_include_all() {
        let var = Custom::new("env")
            .values([("prod", "prod")])
            .multi()
            .include_all()
            .hide()
            .into_variable()
            .unwrap();
        let value = serde_json::to_value(&var).unwrap();

        assert_eq!(value["hide"], json!(2));
        assert_eq!(value["multi"], json!(true));
        assert_eq!(value["includeAll"], json!(true));
        assert_eq!(value["options"][1]["value"], json!("$__all"));
    }
}
