//! Validated scalar types shared across the SCLC advisor crates.
//!
//! Each type guarantees its range at construction time, so downstream code can compare
//! against clinical thresholds without re-checking bounds.

use std::str::FromStr;

/// Highest score the G8 questionnaire can produce.
pub const G8_MAX_POINTS: f64 = 17.0;

/// Highest grade on the ECOG/WHO performance status scale.
pub const PERFORMANCE_STATUS_MAX: u8 = 4;

/// Errors that can occur when creating validated scalar types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("value cannot be empty")]
    Empty,

    /// The input text could not be parsed as a number
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// The value falls outside the permitted range
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// A G8 geriatric screening score.
///
/// The score is the sum of eight questionnaire items and lies in `0..=17`. Fractional values are
/// permitted because the health-comparison item has a half-point answer.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct G8Score(f64);

impl G8Score {
    /// Creates a new `G8Score`, rejecting NaN and values outside `0..=17`.
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if value.is_nan() || !(0.0..=G8_MAX_POINTS).contains(&value) {
            return Err(TypeError::OutOfRange {
                field: "G8 score",
                min: 0.0,
                max: G8_MAX_POINTS,
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the score as a plain number.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for G8Score {
    type Err = TypeError;

    /// Parses a score from form text. A decimal comma is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        let value: f64 = trimmed
            .replace(',', ".")
            .parse()
            .map_err(|_| TypeError::NotANumber(trimmed.to_owned()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for G8Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_points(self.0))
    }
}

impl serde::Serialize for G8Score {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for G8Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        G8Score::new(value).map_err(serde::de::Error::custom)
    }
}

/// ECOG/WHO performance status, `0` (fully active) to `4` (completely disabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PerformanceStatus(u8);

impl PerformanceStatus {
    /// Creates a new `PerformanceStatus`, rejecting grades above 4.
    pub fn new(grade: u8) -> Result<Self, TypeError> {
        if grade > PERFORMANCE_STATUS_MAX {
            return Err(TypeError::OutOfRange {
                field: "performance status",
                min: 0.0,
                max: f64::from(PERFORMANCE_STATUS_MAX),
                value: f64::from(grade),
            });
        }
        Ok(Self(grade))
    }

    /// Returns the grade.
    pub fn grade(self) -> u8 {
        self.0
    }
}

impl FromStr for PerformanceStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        let grade: u8 = trimmed
            .parse()
            .map_err(|_| TypeError::NotANumber(trimmed.to_owned()))?;
        Self::new(grade)
    }
}

impl std::fmt::Display for PerformanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for PerformanceStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PerformanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let grade = u8::deserialize(deserializer)?;
        PerformanceStatus::new(grade).map_err(serde::de::Error::custom)
    }
}

/// Formats a point total with at most one decimal place, dropping a trailing `.0`.
///
/// `12.0` renders as `12`, `14.5` as `14.5`.
pub fn format_points(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
