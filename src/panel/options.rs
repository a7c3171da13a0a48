// Enumerations shared by the field based panels (stat, gauge).

use std::str::FromStr;

/// Reduction applied to a series before displaying a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    First,
    FirstNonNull,
    Last,
    LastNonNull,
    Min,
    Max,
    Avg,
    Count,
    Total,
    Range,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::First => "first",
            ValueType::FirstNonNull => "firstNotNull",
            ValueType::Last => "last",
            ValueType::LastNonNull => "lastNotNull",
            ValueType::Min => "min",
            ValueType::Max => "max",
            ValueType::Avg => "mean",
            ValueType::Count => "count",
            ValueType::Total => "sum",
            ValueType::Range => "range",
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(ValueType::First),
            "first_non_null" | "firstNotNull" => Ok(ValueType::FirstNonNull),
            "last" => Ok(ValueType::Last),
            "last_non_null" | "lastNotNull" => Ok(ValueType::LastNonNull),
            "min" => Ok(ValueType::Min),
            "max" => Ok(ValueType::Max),
            "avg" | "mean" => Ok(ValueType::Avg),
            "count" => Ok(ValueType::Count),
            "total" | "sum" => Ok(ValueType::Total),
            "range" => Ok(ValueType::Range),
            other => Err(format!("unknown value type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Auto,
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Auto => "auto",
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Orientation::Auto),
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            other => Err(format!("unknown orientation '{}'", other)),
        }
    }
}
