//! # Statistics Engine
//!
//! Aggregate figures over the marks of the current record set.
//!
//! The engine only sees marks, never names or identifiers, and is a pure
//! function of them: input order does not matter and nothing is stored.
//!
//! ## Empty sets
//!
//! With no records there is no highest or lowest mark. Those fields hold
//! [`Extremum::NotApplicable`], which serializes as the string `"N/A"` so it
//! can never be mistaken for a real mark (every real mark serializes as a
//! JSON integer).

use crate::config::ServiceConfig;
use crate::primitives::{DEFAULT_PASSING_THRESHOLD, NOT_APPLICABLE};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// EXTREMUM
// =============================================================================

/// Highest or lowest mark of a record set, if the set is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremum {
    /// The extreme mark.
    Value(i64),
    /// The record set was empty.
    NotApplicable,
}

impl Extremum {
    /// The mark, if there is one.
    #[must_use]
    pub fn value(self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }
}

impl From<Option<i64>> for Extremum {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::NotApplicable, Self::Value)
    }
}

impl std::fmt::Display for Extremum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Extremum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_i64(*v),
            Self::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

struct ExtremumVisitor;

impl Visitor<'_> for ExtremumVisitor {
    type Value = Extremum;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "an integer mark or the string \"{}\"", NOT_APPLICABLE)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Extremum, E> {
        Ok(Extremum::Value(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Extremum, E> {
        i64::try_from(v)
            .map(Extremum::Value)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Extremum, E> {
        if v == NOT_APPLICABLE {
            Ok(Extremum::NotApplicable)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for Extremum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExtremumVisitor)
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Aggregates over one record set.
///
/// `pass + fail == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub highest: Extremum,
    pub lowest: Extremum,
}

impl Statistics {
    /// Statistics of an empty record set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total: 0,
            pass: 0,
            fail: 0,
            highest: Extremum::NotApplicable,
            lowest: Extremum::NotApplicable,
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Computes [`Statistics`] against a fixed passing threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsEngine {
    passing_threshold: i64,
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PASSING_THRESHOLD)
    }
}

impl StatsEngine {
    /// Create an engine with the given passing threshold.
    #[must_use]
    pub const fn new(passing_threshold: i64) -> Self {
        Self { passing_threshold }
    }

    /// Create an engine from the service configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.passing_threshold)
    }

    /// The threshold this engine applies.
    #[must_use]
    pub const fn passing_threshold(&self) -> i64 {
        self.passing_threshold
    }

    /// Whether a mark counts as a pass.
    #[must_use]
    pub const fn passes(&self, marks: i64) -> bool {
        marks >= self.passing_threshold
    }

    /// Compute statistics over a sequence of marks.
    #[must_use]
    pub fn compute(&self, marks: &[i64]) -> Statistics {
        if marks.is_empty() {
            return Statistics::empty();
        }

        let total = marks.len();
        let pass = marks.iter().filter(|&&m| self.passes(m)).count();

        Statistics {
            total,
            pass,
            fail: total - pass,
            highest: marks.iter().copied().max().into(),
            lowest: marks.iter().copied().min().into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
