use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // now, now-6h, now/d, now-7d/d, now+1h-30m
    static ref RELATIVE_TIME: Regex =
        Regex::new(r"^now(?:[+-][0-9]+[smhdwMy])*(?:/[smhdwMy])?$").expect("valid regex");
    static ref UID: Regex = Regex::new(r"^[A-Za-z0-9_-]{8,40}$").expect("valid regex");
}

/// Accepts Grafana relative times and RFC 3339 timestamps.
pub(crate) fn validate_time(resource: &str, field: &str, value: &str) -> Result<()> {
    if RELATIVE_TIME.is_match(value) || chrono::DateTime::parse_from_rfc3339(value).is_ok() {
        return Ok(());
    }
    Err(Error::invalid(
        resource,
        field,
        value,
        "expected a relative time such as 'now-6h' or an RFC 3339 timestamp",
    ))
}

pub(crate) fn validate_uid(resource: &str, uid: &str) -> Result<()> {
    if UID.is_match(uid) {
        return Ok(());
    }
    Err(Error::invalid(
        resource,
        "uid",
        uid,
        "must be 8 to 40 characters among letters, digits, '-' and '_'",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_times() {
        for value in ["now", "now-6h", "now/d", "now-7d/d", "now-1M", "now+1h-30m"] {
            assert!(validate_time("d", "from", value).is_ok(), "{}", value);
        }
        for value in ["", "yesterday", "now-", "now-6", "now-6x", "6h"] {
            assert!(validate_time("d", "from", value).is_err(), "{}", value);
        }
    }

    #[test]
    fn test_absolute_times() {
        assert!(validate_time("d", "to", "2024-03-01T12:00:00Z").is_ok());
        assert!(validate_time("d", "to", "2024-03-01T12:00:00+02:00").is_ok());
        assert!(validate_time("d", "to", "2024-03-01").is_err());
    }

    #[test]
    fn test_uid() {
        assert!(validate_uid("d", "abcd-1234").is_ok());
        assert!(validate_uid("d", "short").is_err());
        assert!(validate_uid("d", &"x".repeat(41)).is_err());
        assert!(validate_uid("d", "has spaces!").is_err());
    }
}
