use crate::model::{AlertCondition, AlertEvaluator, AlertReducer, ParamsOnly, TypeOnly};
use std::str::FromStr;

/// Reduction of a query result to the single value fed to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Avg,
    Sum,
    Min,
    Max,
    Count,
    Last,
    Median,
    Diff,
    PercentDiff,
}

impl Reducer {
    pub fn as_str(self) -> &'static str {
        match self {
            Reducer::Avg => "avg",
            Reducer::Sum => "sum",
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::Count => "count",
            Reducer::Last => "last",
            Reducer::Median => "median",
            Reducer::Diff => "diff",
            Reducer::PercentDiff => "percent_diff",
        }
    }
}

impl FromStr for Reducer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(Reducer::Avg),
            "sum" => Ok(Reducer::Sum),
            "min" => Ok(Reducer::Min),
            "max" => Ok(Reducer::Max),
            "count" => Ok(Reducer::Count),
            "last" => Ok(Reducer::Last),
            "median" => Ok(Reducer::Median),
            "diff" => Ok(Reducer::Diff),
            "percent_diff" => Ok(Reducer::PercentDiff),
            other => Err(format!("unknown reducer '{}'", other)),
        }
    }
}

/// Test applied to the reduced value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluator {
    IsAbove(f64),
    IsBelow(f64),
    IsOutsideRange(f64, f64),
    IsWithinRange(f64, f64),
    HasNoValue,
}

impl Evaluator {
    fn to_model(self) -> AlertEvaluator {
        let (evaluator_type, params) = match self {
            Evaluator::IsAbove(v) => ("gt", vec![v]),
            Evaluator::IsBelow(v) => ("lt", vec![v]),
            Evaluator::IsOutsideRange(lo, hi) => ("outside_range", vec![lo, hi]),
            Evaluator::IsWithinRange(lo, hi) => ("within_range", vec![lo, hi]),
            Evaluator::HasNoValue => ("no_value", Vec::new()),
        };

        AlertEvaluator {
            evaluator_type: evaluator_type.to_string(),
            params,
        }
    }
}

/// How a condition combines with the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

pub(crate) fn condition(
    operator: Operator,
    reducer: Reducer,
    query_ref: &str,
    evaluator: Evaluator,
) -> AlertCondition {
    AlertCondition {
        condition_type: "query".to_string(),
        evaluator: evaluator.to_model(),
        operator: TypeOnly {
            kind: operator.as_str().to_string(),
        },
        query: ParamsOnly {
            params: vec![query_ref.to_string()],
        },
        reducer: AlertReducer {
            reducer_type: reducer.as_str().to_string(),
            params: Vec::new(),
        },
    }
}
