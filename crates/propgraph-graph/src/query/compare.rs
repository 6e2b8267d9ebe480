//! Comparison operators for property predicates.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use propgraph_core::{CoreError, Value};

/// A comparison between a stored property value and an expected value.
///
/// `Equal` and `NotEqual` apply to every kind and use structural equality,
/// so values of different kinds are never equal. The ordering operators
/// only hold between two values of the same ordered kind (int, float,
/// string); anything else evaluates to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compare {
    /// `actual == expected`
    #[default]
    Equal,
    /// `actual != expected`
    NotEqual,
    /// `actual > expected`
    GreaterThan,
    /// `actual >= expected`
    GreaterThanEqual,
    /// `actual < expected`
    LessThan,
    /// `actual <= expected`
    LessThanEqual,
}

impl Compare {
    /// Evaluate this comparison against a possibly absent property value.
    ///
    /// An absent property is not equal to anything: `Equal` is false and
    /// `NotEqual` is true. Ordering operators require a present value.
    #[must_use]
    pub fn evaluate(self, actual: Option<&Value>, expected: &Value) -> bool {
        match self {
            Self::Equal => actual == Some(expected),
            Self::NotEqual => actual != Some(expected),
            Self::GreaterThan => Self::ordering(actual, expected).is_some_and(Ordering::is_gt),
            Self::GreaterThanEqual => Self::ordering(actual, expected).is_some_and(Ordering::is_ge),
            Self::LessThan => Self::ordering(actual, expected).is_some_and(Ordering::is_lt),
            Self::LessThanEqual => Self::ordering(actual, expected).is_some_and(Ordering::is_le),
        }
    }

    /// Returns the operator that holds exactly when this one does not,
    /// for comparable operands.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::Equal => Self::NotEqual,
            Self::NotEqual => Self::Equal,
            Self::GreaterThan => Self::LessThanEqual,
            Self::GreaterThanEqual => Self::LessThan,
            Self::LessThan => Self::GreaterThanEqual,
            Self::LessThanEqual => Self::GreaterThan,
        }
    }

    /// Returns `true` for the operators that need ordered operands.
    #[inline]
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        !matches!(self, Self::Equal | Self::NotEqual)
    }

    /// The operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
        }
    }

    fn ordering(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
        actual?.compare(expected)
    }
}

impl fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Compare {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" | "EQUAL" => Ok(Self::Equal),
            "<>" | "!=" | "NOT_EQUAL" => Ok(Self::NotEqual),
            ">" | "GREATER_THAN" => Ok(Self::GreaterThan),
            ">=" | "GREATER_THAN_EQUAL" => Ok(Self::GreaterThanEqual),
            "<" | "LESS_THAN" => Ok(Self::LessThan),
            "<=" | "LESS_THAN_EQUAL" => Ok(Self::LessThanEqual),
            other => Err(CoreError::Validation(format!("unknown comparison operator: {other}"))),
        }
    }
}
