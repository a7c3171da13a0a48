//! Template variables, referenced from queries as `$name`.

mod constant;
mod custom;
mod datasource;
mod interval;
mod query;
mod text;

pub use constant::Constant;
pub use custom::Custom;
pub use datasource::Datasource;
pub use interval::Interval;
pub use query::{Query, Refresh, SortOrder};
pub use text::TextBox;

use crate::model::{Current, TemplateVar, VarOption};
use crate::Result;

/// Value Grafana substitutes when "All" is selected.
pub const ALL_VALUE: &str = "$__all";

/// Conversion of a variable builder into a `templating.list` entry.
pub trait IntoVariable {
    fn into_variable(self) -> Result<TemplateVar>;
}

impl IntoVariable for TemplateVar {
    fn into_variable(self) -> Result<TemplateVar> {
        Ok(self)
    }
}

/// Setters shared by every variable kind.
pub trait VariableOptions: Sized {
    fn var_mut(&mut self) -> &mut TemplateVar;

    fn label(mut self, label: impl Into<String>) -> Self {
        self.var_mut().label = Some(label.into());
        self
    }

    /// Shows the variable without its label.
    fn hide_label(mut self) -> Self {
        self.var_mut().hide = 1;
        self
    }

    fn hide(mut self) -> Self {
        self.var_mut().hide = 2;
        self
    }
}

fn include_all(var: &mut TemplateVar) {
    var.include_all = true;
    if !var.options.iter().any(|option| option.value == ALL_VALUE) {
        var.options.push(VarOption::new("All", ALL_VALUE));
    }
}

fn default_all(var: &mut TemplateVar) {
    var.current = Some(Current::new("All", ALL_VALUE));
}

/// Options from `(text, value)` pairs, in the given order. The query lists
/// the values.
fn set_values<I, T, V>(var: &mut TemplateVar, values: I)
where
    I: IntoIterator<Item = (T, V)>,
    T: Into<String>,
    V: Into<String>,
{
    var.options = values
        .into_iter()
        .map(|(text, value)| VarOption::new(text, value))
        .collect();
    var.query = var
        .options
        .iter()
        .map(|option| option.value.as_str())
        .collect::<Vec<_>>()
        .join(",");
}

/// Selects `value`, displayed with the text of the matching option if any.
fn set_default(var: &mut TemplateVar, value: &str) {
    let text = var
        .options
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.text.clone())
        .unwrap_or_else(|| value.to_string());
    var.current = Some(Current::new(text, value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_all_is_idempotent() {
        let mut var = TemplateVar::new("host", "query");
        include_all(&mut var);
        include_all(&mut var);
        assert!(var.include_all);
        assert_eq!(var.options, vec![VarOption::new("All", ALL_VALUE)]);
    }

    #[test]
    fn test_default_uses_option_text() {
        let mut var = TemplateVar::new("env", "custom");
        set_values(&mut var, [("Production", "prod"), ("Staging", "staging")]);
        assert_eq!(var.query, "prod,staging");

        set_default(&mut var, "prod");
        assert_eq!(var.current, Some(Current::new("Production", "prod")));

        set_default(&mut var, "dev");
        assert_eq!(var.current, Some(Current::new("dev", "dev")));
    }
}
