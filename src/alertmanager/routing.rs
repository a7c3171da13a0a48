use crate::kernel::Builder;
use crate::model::{ObjectMatcher, RoutingPolicy};
use std::str::FromStr;

/// Comparison between an alert label and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Eq,
    Neq,
    Matches,
    NotMatches,
}

impl Matcher {
    pub fn as_str(self) -> &'static str {
        match self {
            Matcher::Eq => "=",
            Matcher::Neq => "!=",
            Matcher::Matches => "=~",
            Matcher::NotMatches => "!~",
        }
    }
}

impl FromStr for Matcher {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Matcher::Eq),
            "neq" => Ok(Matcher::Neq),
            "matches" => Ok(Matcher::Matches),
            "not_matches" => Ok(Matcher::NotMatches),
            other => Err(format!("unknown label matcher '{}'", other)),
        }
    }
}

/// Sends the alerts whose labels satisfy every matcher to a contact point.
#[derive(Debug, Clone)]
pub struct Policy {
    policy: RoutingPolicy,
}

impl Builder for Policy {}

impl Policy {
    pub fn new(contact_point: impl Into<String>) -> Self {
        Self {
            policy: RoutingPolicy {
                receiver: contact_point.into(),
                ..Default::default()
            },
        }
    }

    pub fn matching(
        mut self,
        label: impl Into<String>,
        matcher: Matcher,
        value: impl Into<String>,
    ) -> Self {
        self.policy.object_matchers.push(ObjectMatcher(
            label.into(),
            matcher.as_str().to_string(),
            value.into(),
        ));
        self
    }

    pub fn tag_eq(self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.matching(label, Matcher::Eq, value)
    }

    pub fn tag_neq(self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.matching(label, Matcher::Neq, value)
    }

    pub fn tag_matches(self, label: impl Into<String>, regex: impl Into<String>) -> Self {
        self.matching(label, Matcher::Matches, regex)
    }

    pub fn tag_not_matches(self, label: impl Into<String>, regex: impl Into<String>) -> Self {
        self.matching(label, Matcher::NotMatches, regex)
    }

    pub(crate) fn into_model(self) -> RoutingPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matchers() {
        let policy = Policy::new("team-a")
            .tag_eq("team", "a")
            .tag_neq("env", "dev")
            .tag_matches("service", "api-.*")
            .tag_not_matches("severity", "info|debug")
            .into_model();

        let operators: Vec<&str> = policy
            .object_matchers
            .iter()
            .map(|m| m.1.as_str())
            .collect();
        assert_eq!(operators, vec!["=", "!=", "=~", "!~"]);
        assert_eq!(policy.receiver, "team-a");
    }

    #[test]
    fn test_matcher_from_str() {
        assert_eq!("not_matches".parse::<Matcher>(), Ok(Matcher::NotMatches));
        assert!("like".parse::<Matcher>().is_err());
    }
}
