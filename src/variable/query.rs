use super::{default_all, include_all, set_default, IntoVariable, VariableOptions};
use crate::kernel::Builder;
use crate::model::{DatasourceRef, TemplateVar};
use crate::Result;
use std::str::FromStr;

/// Order of the values returned by the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    None,
    AlphabeticalAsc,
    AlphabeticalDesc,
    NumericalAsc,
    NumericalDesc,
    AlphabeticalNoCaseAsc,
    AlphabeticalNoCaseDesc,
}

impl SortOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            SortOrder::None => 0,
            SortOrder::AlphabeticalAsc => 1,
            SortOrder::AlphabeticalDesc => 2,
            SortOrder::NumericalAsc => 3,
            SortOrder::NumericalDesc => 4,
            SortOrder::AlphabeticalNoCaseAsc => 5,
            SortOrder::AlphabeticalNoCaseDesc => 6,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(SortOrder::None),
            "alphabetical_asc" => Ok(SortOrder::AlphabeticalAsc),
            "alphabetical_desc" => Ok(SortOrder::AlphabeticalDesc),
            "numerical_asc" => Ok(SortOrder::NumericalAsc),
            "numerical_desc" => Ok(SortOrder::NumericalDesc),
            "alphabetical_case_insensitive_asc" => Ok(SortOrder::AlphabeticalNoCaseAsc),
            "alphabetical_case_insensitive_desc" => Ok(SortOrder::AlphabeticalNoCaseDesc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// When the values are fetched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Never,
    DashboardLoad,
    TimeChange,
}

impl Refresh {
    pub fn as_u8(self) -> u8 {
        match self {
            Refresh::Never => 0,
            Refresh::DashboardLoad => 1,
            Refresh::TimeChange => 2,
        }
    }
}

impl FromStr for Refresh {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "never" => Ok(Refresh::Never),
            "dashboard_load" => Ok(Refresh::DashboardLoad),
            "time_change" => Ok(Refresh::TimeChange),
            other => Err(format!("unknown refresh mode '{}'", other)),
        }
    }
}

/// Values fetched from a data source.
#[derive(Debug)]
pub struct Query {
    var: TemplateVar,
}

impl Builder for Query {}

impl VariableOptions for Query {
    fn var_mut(&mut self) -> &mut TemplateVar {
        &mut self.var
    }
}

impl Query {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            var: TemplateVar::new(name, "query"),
        }
        .refresh(Refresh::DashboardLoad)
    }

    pub fn name(&self) -> &str {
        &self.var.name
    }

    pub fn has_datasource(&self) -> bool {
        self.var.datasource.is_some()
    }

    pub fn datasource(mut self, datasource: impl Into<String>) -> Self {
        self.var.datasource = Some(DatasourceRef::name(datasource));
        self
    }

    /// Query sent to the data source, e.g. `label_values(up, job)`.
    pub fn request(mut self, request: impl Into<String>) -> Self {
        self.var.query = request.into();
        self
    }

    /// Keeps or extracts part of every returned value.
    pub fn regex(mut self, regex: impl Into<String>) -> Self {
        self.var.regex = Some(regex.into());
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.var.sort = Some(order.as_u8());
        self
    }

    pub fn refresh(mut self, refresh: Refresh) -> Self {
        self.var.refresh = Some(refresh.as_u8());
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

    /// Value substituted for "All" instead of every value.
    pub fn all_value(mut self, value: impl Into<String>) -> Self {
        self.var.all_value = Some(value.into());
        self
    }

    pub fn default(mut self, value: impl AsRef<str>) -> Self {
        set_default(&mut self.var, value.as_ref());
        self
    }
}

impl IntoVariable for Query {
    fn into_variable(self) -> Result<TemplateVar> {
        Ok(self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let var = Query::new("job").into_variable().unwrap();
        let value = serde_json::to_value(&var).unwrap();
        assert_eq!(value["type"], json!("query"));
        assert_eq!(value["refresh"], json!(1));
        assert_eq!(value["label"], json!("job"));
    }

    #[test]
    fn test_options() {
        let var = Query::new("job")
            .datasource("prometheus")
            .request("label_values(up, job)")
            .regex("/^api-.*/")
            .sort(SortOrder::NumericalDesc)
            .refresh(Refresh::TimeChange)
            .label("Job")
            .hide_label()
            .multi()
            .include_all()
            .default_all()
            .all_value(".*")
            .into_variable()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&var).unwrap(),
            json!({
                "name": "job",
                "type": "query",
                "label": "Job",
                "hide": 1,
                "query": "label_values(up, job)",
                "datasource": "prometheus",
                "refresh": 2,
                "regex": "/^api-.*/",
                "sort": 4,
                "multi": true,
                "includeAll": true,
                "allValue": ".*",
                "options": [{"text": "All", "value": "$__all", "selected": false}],
                "current": {"text": "All", "value": "$__all"}
            })
        );
    }

    #[test]
    fn test_enums_from_str() {
        assert_eq!("time_change".parse::<Refresh>(), Ok(Refresh::TimeChange));
        assert_eq!(
            "alphabetical_case_insensitive_desc".parse::<SortOrder>(),
            Ok(SortOrder::AlphabeticalNoCaseDesc)
        );
        assert!("sometimes".parse::<Refresh>().is_err());
    }
}
