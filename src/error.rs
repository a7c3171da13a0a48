use std::fmt::Display;

/// Errors raised while building, validating or decoding Grafana resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A setter received a value outside of its allowed set.
    #[error("{resource}: invalid {field} '{value}': {reason}")]
    InvalidArgument {
        resource: String,
        field: String,
        value: String,
        reason: String,
    },

    /// A YAML or JSON document is structurally or semantically invalid.
    #[error("{path}: {message}")]
    Decode { path: String, message: String },

    /// The YAML scanner rejected the document before any decoding happened.
    #[error("yaml syntax error at line {line}, column {col}: {message}")]
    Yaml {
        line: usize,
        col: usize,
        message: String,
    },

    /// A reference between two parts of a resource does not resolve.
    #[error("{resource}: unresolved reference '{reference}': {reason}")]
    Referential {
        resource: String,
        reference: String,
        reason: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn invalid(
        resource: impl Into<String>,
        field: impl Into<String>,
        value: impl Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidArgument {
            resource: resource.into(),
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn referential(
        resource: impl Into<String>,
        reference: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Referential {
            resource: resource.into(),
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

/// Checks that `value` lies in `min..=max`.
pub(crate) fn ensure_range<T>(resource: &str, field: &str, value: T, min: T, max: T) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(Error::invalid(
            resource,
            field,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = Error::invalid("graph 'cpu'", "span", 13, "must be between 1 and 12");
        assert_eq!(
            err.to_string(),
            "graph 'cpu': invalid span '13': must be between 1 and 12"
        );
    }

    #[test]
    fn test_ensure_range() {
        assert_eq!(ensure_range("p", "fill", 3, 0, 10).unwrap(), 3);
        assert!(ensure_range("p", "fill", 11, 0, 10).is_err());
        assert!(ensure_range("p", "span", 0.5_f32, 1.0, 12.0).is_err());
    }

    #[test]
    fn test_referential_message() {
        let err = Error::referential("alert 'high cpu'", "B", "condition not found in data");
        assert!(err.to_string().contains("unresolved reference 'B'"));
    }
}
