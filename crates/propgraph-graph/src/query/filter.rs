//! Property filters: single-value predicates and half-open intervals.

use std::cmp::Ordering;
use std::fmt;

use propgraph_core::{Properties, Value};

use super::Compare;

/// A `(key, operator, value)` test against a property bag.
///
/// # Example
///
/// ```
/// use propgraph_core::Properties;
/// use propgraph_graph::query::{Compare, Predicate};
///
/// let props = Properties::new().with("amount", 1.0);
///
/// assert!(Predicate::new("amount", Compare::GreaterThanEqual, 1.0).evaluate(&props));
/// assert!(!Predicate::new("amount", Compare::GreaterThan, 1.0).evaluate(&props));
/// assert!(!Predicate::eq("missing", 1.0).evaluate(&props));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// The property key to read.
    pub key: String,
    /// The comparison to apply.
    pub compare: Compare,
    /// The value to compare against.
    pub value: Value,
}

impl Predicate {
    /// Create a new predicate.
    #[must_use]
    pub fn new(key: impl Into<String>, compare: Compare, value: impl Into<Value>) -> Self {
        Self { key: key.into(), compare, value: value.into() }
    }

    /// Create an equality predicate.
    #[must_use]
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Compare::Equal, value)
    }

    /// Evaluate the predicate against a property bag.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, properties: &Properties) -> bool {
        self.compare.evaluate(properties.get(&self.key), &self.value)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.compare, self.value)
    }
}

/// A half-open numeric range test: `lower <= value < upper`.
///
/// The property must be present and of the same numeric kind (int or
/// float) as both bounds. An interval whose lower bound is not below its
/// upper bound is empty and never matches.
///
/// # Example
///
/// ```
/// use propgraph_core::Properties;
/// use propgraph_graph::query::Interval;
///
/// let props = Properties::new().with("date", 10i64);
///
/// assert!(!Interval::new("date", 5i64, 10i64).evaluate(&props));
/// assert!(Interval::new("date", 5i64, 11i64).evaluate(&props));
/// assert!(Interval::new("date", 10i64, 11i64).evaluate(&props));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// The property key to read.
    pub key: String,
    /// Inclusive lower bound.
    pub lower: Value,
    /// Exclusive upper bound.
    pub upper: Value,
}

impl Interval {
    /// Create a new interval filter.
    #[must_use]
    pub fn new(key: impl Into<String>, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Self { key: key.into(), lower: lower.into(), upper: upper.into() }
    }

    /// Returns `true` if no value can fall inside this interval.
    ///
    /// This covers `lower >= upper` as well as bounds that are not numeric
    /// or not of the same kind.
    #[must_use]
    pub fn is_empty_range(&self) -> bool {
        !self.lower.is_numeric() || self.lower.compare(&self.upper) != Some(Ordering::Less)
    }

    /// Evaluate the interval against a property bag.
    #[must_use]
    pub fn evaluate(&self, properties: &Properties) -> bool {
        if self.is_empty_range() {
            return false;
        }
        let Some(value) = properties.get(&self.key) else {
            return false;
        };
        if !value.is_numeric() {
            return false;
        }
        let above_lower = self.lower.compare(value).is_some_and(Ordering::is_le);
        above_lower && value.compare(&self.upper) == Some(Ordering::Less)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in [{}, {})", self.key, self.lower, self.upper)
    }
}

/// One filter of a query, kept in the order it was added.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A property predicate.
    Has(Predicate),
    /// A half-open interval.
    Interval(Interval),
}

impl Filter {
    /// Evaluate the filter against a property bag.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, properties: &Properties) -> bool {
        match self {
            Self::Has(predicate) => predicate.evaluate(properties),
            Self::Interval(interval) => interval.evaluate(properties),
        }
    }
}

impl From<Predicate> for Filter {
    fn from(predicate: Predicate) -> Self {
        Self::Has(predicate)
    }
}

impl From<Interval> for Filter {
    fn from(interval: Interval) -> Self {
        Self::Interval(interval)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Has(predicate) => predicate.fmt(f),
            Self::Interval(interval) => interval.fmt(f),
        }
    }
}
