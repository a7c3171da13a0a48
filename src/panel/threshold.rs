use crate::model::{ThresholdMode, ThresholdStep, Thresholds};
use crate::{Error, Result};

/// Color of the base step when the caller does not provide one.
pub const DEFAULT_BASE_COLOR: &str = "green";

/// Orders `steps` into Grafana thresholds.
///
/// A leading step without value is the base step. Without one, a base step
/// using [`DEFAULT_BASE_COLOR`] is prepended. Every other step needs a value
/// and values must be strictly ascending.
pub(crate) fn thresholds(
    resource: &str,
    mode: ThresholdMode,
    steps: Vec<ThresholdStep>,
) -> Result<Thresholds> {
    let mut steps = steps.into_iter().peekable();

    let base = match steps.peek() {
        Some(step) if step.value.is_none() => steps.next(),
        _ => None,
    }
    .unwrap_or_else(|| ThresholdStep::base(DEFAULT_BASE_COLOR));

    let mut ordered = vec![base];
    let mut previous: Option<f64> = None;
    for step in steps {
        let Some(value) = step.value else {
            return Err(Error::invalid(
                resource,
                "thresholds",
                &step.color,
                "only the first step may omit its value",
            ));
        };
        if previous.is_some_and(|p| value <= p) {
            return Err(Error::invalid(
                resource,
                "thresholds",
                value,
                "step values must be strictly ascending",
            ));
        }
        previous = Some(value);
        ordered.push(step);
    }

    Ok(Thresholds {
        mode,
        steps: ordered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_base_step() {
        let thresholds = thresholds(
            "gauge 'g'",
            ThresholdMode::Absolute,
            vec![
                ThresholdStep::base("green"),
                ThresholdStep::at("orange", 80.0),
                ThresholdStep::at("red", 90.0),
            ],
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&thresholds).unwrap(),
            json!({
                "mode": "absolute",
                "steps": [
                    {"color": "green", "value": null},
                    {"color": "orange", "value": 80.0},
                    {"color": "red", "value": 90.0}
                ]
            })
        );
    }

    #[test]
    fn test_base_step_is_prepended() {
        let thresholds = thresholds(
            "stat 's'",
            ThresholdMode::Percentage,
            vec![ThresholdStep::at("red", 50.0)],
        )
        .unwrap();

        assert_eq!(thresholds.steps[0], ThresholdStep::base(DEFAULT_BASE_COLOR));
        assert_eq!(thresholds.steps[1], ThresholdStep::at("red", 50.0));
        assert_eq!(thresholds.mode, ThresholdMode::Percentage);
    }

    #[test]
    fn test_unordered_steps() {
        let result = thresholds(
            "stat 's'",
            ThresholdMode::Absolute,
            vec![ThresholdStep::at("red", 90.0), ThresholdStep::at("orange", 80.0)],
        );
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_second_base_step() {
        let result = thresholds(
            "stat 's'",
            ThresholdMode::Absolute,
            vec![ThresholdStep::base("green"), ThresholdStep::base("red")],
        );
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }
}
