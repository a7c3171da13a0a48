use crate::kernel::Builder;
use crate::model::Link;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkIcon {
    #[default]
    External,
    Dashboard,
    Question,
    Info,
    Bolt,
    Doc,
    Cloud,
}

impl LinkIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkIcon::External => "external",
            LinkIcon::Dashboard => "dashboard",
            LinkIcon::Question => "question",
            LinkIcon::Info => "info",
            LinkIcon::Bolt => "bolt",
            LinkIcon::Doc => "doc",
            LinkIcon::Cloud => "cloud",
        }
    }
}

impl FromStr for LinkIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "external" => Ok(LinkIcon::External),
            "dashboard" => Ok(LinkIcon::Dashboard),
            "question" => Ok(LinkIcon::Question),
            "info" => Ok(LinkIcon::Info),
            "bolt" => Ok(LinkIcon::Bolt),
            "doc" => Ok(LinkIcon::Doc),
            "cloud" => Ok(LinkIcon::Cloud),
            other => Err(format!("unknown link icon '{}'", other)),
        }
    }
}

/// Link to an arbitrary URL, shown at the top of the dashboard.
#[derive(Debug, Clone)]
pub struct ExternalLink {
    link: Link,
}

impl Builder for ExternalLink {}

impl ExternalLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            link: Link {
                title: title.into(),
                link_type: "link".to_string(),
                tooltip: None,
                url: Some(url.into()),
                icon: None,
                as_dropdown: false,
                include_vars: false,
                keep_time: false,
                target_blank: false,
                tags: Vec::new(),
            },
        }
        .icon(LinkIcon::External)
    }

    /// Shown as a tooltip.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.link.tooltip = Some(description.into());
        self
    }

    pub fn icon(mut self, icon: LinkIcon) -> Self {
        self.link.icon = Some(icon.as_str().to_string());
        self
    }

    pub fn include_time_range(mut self) -> Self {
        self.link.keep_time = true;
        self
    }

    pub fn include_variable_values(mut self) -> Self {
        self.link.include_vars = true;
        self
    }

    pub fn open_in_new_tab(mut self) -> Self {
        self.link.target_blank = true;
        self
    }

    pub(crate) fn into_model(self) -> Link {
        self.link
    }
}

/// Links to every dashboard carrying the given tags.
#[derive(Debug, Clone)]
pub struct DashboardLink {
    link: Link,
}

impl Builder for DashboardLink {}

impl DashboardLink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            link: Link {
                title: title.into(),
                link_type: "dashboards".to_string(),
                tooltip: None,
                url: None,
                icon: None,
                as_dropdown: false,
                include_vars: false,
                keep_time: false,
                target_blank: false,
                tags: Vec::new(),
            },
        }
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Groups the matching dashboards in a dropdown.
    pub fn as_dropdown(mut self) -> Self {
        self.link.as_dropdown = true;
        self
    }

    pub fn include_time_range(mut self) -> Self {
        self.link.keep_time = true;
        self
    }

    pub fn include_variable_values(mut self) -> Self {
        self.link.include_vars = true;
        self
    }

    pub fn open_in_new_tab(mut self) -> Self {
        self.link.target_blank = true;
        self
    }

    pub(crate) fn into_model(self) -> Link {
        self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_external_link() {
        let link = ExternalLink::new("Runbook", "https://runbooks.example.com")
            .description("how to fix things")
            .include_time_range()
            .open_in_new_tab()
            .into_model();

        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({
                "title": "Runbook",
                "type": "link",
                "tooltip": "how to fix things",
                "url": "https://runbooks.example.com",
                "icon": "external",
                "asDropdown": false,
                "includeVars": false,
                "keepTime": true,
                "targetBlank": true,
                "tags": []
            })
        );
    }

    #[test]
    fn test_dashboard_link() {
        let link = DashboardLink::new("Related")
            .tags(["api", "prod"])
            .as_dropdown()
            .include_variable_values()
            .into_model();

        assert_eq!(link.link_type, "dashboards");
        assert_eq!(link.tags, vec!["api", "prod"]);
        assert!(link.as_dropdown);
        assert!(link.include_vars);
        assert!(link.url.is_none());
    }

    #[test]
    fn test_icon_from_str() {
        assert_eq!("bolt".parse::<LinkIcon>(), Ok(LinkIcon::Bolt));
        assert!("rocket".parse::<LinkIcon>().is_err());
    }
}
