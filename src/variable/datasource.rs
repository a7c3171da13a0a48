use super::{include_all, IntoVariable, VariableOptions};
use crate::kernel::Builder;
use crate::model::TemplateVar;
use crate::Result;

/// Lets the user pick a data source of a given type.
#[derive(Debug)]
pub struct Datasource {
    var: TemplateVar,
}

impl Builder for Datasource {}

impl VariableOptions for Datasource {
    fn var_mut(&mut self) -> &mut TemplateVar {
        &mut self.var
    }
}

impl Datasource {
    pub fn new(name: impl Into<String>) -> Self {
        let mut var = TemplateVar::new(name, "datasource");
        var.refresh = Some(1);
        Self { var }
    }

    /// Plugin id of the data sources listed, e.g. `prometheus`.
    pub fn datasource_type(mut self, plugin: impl Into<String>) -> Self {
        self.var.query = plugin.into();
        self
    }

    /// Only lists data sources whose name matches.
    pub fn regex(mut self, regex: impl Into<String>) -> Self {
        self.var.regex = Some(regex.into());
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
}

impl IntoVariable for Datasource {
    fn into_variable(self) -> Result<TemplateVar> {
        Ok(self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datasource_variable() {
        let var = Datasource::new("source")
            .datasource_type("prometheus")
            .regex("/^prod-/")
            .multi()
            .include_all()
            .into_variable()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&var).unwrap(),
            json!({
                "name": "source",
                "type": "datasource",
                "label": "source",
                "hide": 0,
                "query": "prometheus",
                "refresh": 1,
                "regex": "/^prod-/",
                "multi": true,
                "includeAll": true,
                "options": [{"text": "All", "value": "$__all", "selected": false}]
            })
        );
    }
}
