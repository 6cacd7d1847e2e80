//! Claims: a named measurement, a comparator and a threshold.

use std::fmt;

use serde::{Deserialize, Serialize};

use resonance_core::Numeric;

/// How a measurement is compared against a claim's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Comparator {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equals,
    /// `|measured − target| ≤ tolerance · |target|`
    WithinRelative { target: f64, tolerance: f64 },
    /// `low ≤ measured ≤ high`
    InRange { low: f64, high: f64 },
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::GreaterThan => write!(f, ">"),
            Comparator::GreaterOrEqual => write!(f, ">="),
            Comparator::LessThan => write!(f, "<"),
            Comparator::LessOrEqual => write!(f, "<="),
            Comparator::Equals => write!(f, "=="),
            Comparator::WithinRelative { tolerance, .. } => {
                write!(f, "within {:.0}% of", tolerance * 100.0)
            }
            Comparator::InRange { .. } => write!(f, "in"),
        }
    }
}

/// A claim a step makes about one of its measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Measurement key the step reports.
    pub name: String,
    pub comparator: Comparator,
    pub threshold: Numeric,
}

impl Claim {
    pub fn new(name: impl Into<String>, comparator: Comparator, threshold: impl Into<Numeric>) -> Self {
        Self {
            name: name.into(),
            comparator,
            threshold: threshold.into(),
        }
    }

    pub fn greater_than(name: impl Into<String>, threshold: impl Into<Numeric>) -> Self {
        Self::new(name, Comparator::GreaterThan, threshold)
    }

    pub fn at_least(name: impl Into<String>, threshold: impl Into<Numeric>) -> Self {
        Self::new(name, Comparator::GreaterOrEqual, threshold)
    }

    pub fn less_than(name: impl Into<String>, threshold: impl Into<Numeric>) -> Self {
        Self::new(name, Comparator::LessThan, threshold)
    }

    pub fn equals(name: impl Into<String>, expected: impl Into<Numeric>) -> Self {
        Self::new(name, Comparator::Equals, expected)
    }

    pub fn within_relative(name: impl Into<String>, target: f64, tolerance: f64) -> Self {
        Self::new(name, Comparator::WithinRelative { target, tolerance }, target)
    }

    pub fn in_range(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self::new(name, Comparator::InRange { low, high }, vec![low, high])
    }

    /// `centre ± half_width`.
    pub fn within_absolute(name: impl Into<String>, centre: f64, half_width: f64) -> Self {
        Self::in_range(name, centre - half_width, centre + half_width)
    }

    /// Whether `measured` satisfies the claim. Non-finite or mistyped
    /// measurements never do.
    pub fn evaluate(&self, measured: &Numeric) -> bool {
        if let Comparator::Equals = self.comparator {
            return match (measured, &self.threshold) {
                (Numeric::Bool(a), Numeric::Bool(b)) => a == b,
                (Numeric::Int(a), Numeric::Int(b)) => a == b,
                _ => match (measured.as_f64(), self.threshold.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                },
            };
        }
        let Some(value) = measured.as_f64().filter(|v| v.is_finite()) else {
            return false;
        };
        match self.comparator {
            Comparator::WithinRelative { target, tolerance } => {
                (value - target).abs() <= tolerance * target.abs()
            }
            Comparator::InRange { low, high } => low <= value && value <= high,
            _ => {
                let Some(threshold) = self.threshold.as_f64() else {
                    return false;
                };
                match self.comparator {
                    Comparator::GreaterThan => value > threshold,
                    Comparator::GreaterOrEqual => value >= threshold,
                    Comparator::LessThan => value < threshold,
                    Comparator::LessOrEqual => value <= threshold,
                    _ => false,
                }
            }
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.comparator, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_comparators() {
        assert!(Claim::greater_than("x", 1.0).evaluate(&Numeric::Float(1.5)));
        assert!(!Claim::greater_than("x", 1.0).evaluate(&Numeric::Float(1.0)));
        assert!(Claim::at_least("x", 6).evaluate(&Numeric::Int(6)));
        assert!(Claim::less_than("x", 0.01).evaluate(&Numeric::Float(0.0)));
        assert!(Claim::new("x", Comparator::LessOrEqual, 2).evaluate(&Numeric::Int(2)));
    }

    #[test]
    fn test_equals_by_type() {
        assert!(Claim::equals("labels_unique", true).evaluate(&Numeric::Bool(true)));
        assert!(!Claim::equals("labels_unique", true).evaluate(&Numeric::Bool(false)));
        assert!(Claim::equals("channels", 59_049u64).evaluate(&Numeric::Int(59_049)));
        assert!(Claim::equals("rate", 1.0).evaluate(&Numeric::Float(1.0)));
    }

    #[test]
    fn test_relative_and_range() {
        let claim = Claim::within_relative("nodes", 1950.0, 0.2);
        assert!(claim.evaluate(&Numeric::Int(1950)));
        assert!(claim.evaluate(&Numeric::Int(1600)));
        assert!(!claim.evaluate(&Numeric::Int(1500)));

        let claim = Claim::within_absolute("accuracy", 0.884, 0.15);
        assert!(claim.evaluate(&Numeric::Float(0.8)));
        assert!(!claim.evaluate(&Numeric::Float(0.7)));
        assert_eq!(claim.threshold, Numeric::from(vec![0.884 - 0.15, 0.884 + 0.15]));
    }

    #[test]
    fn test_non_finite_never_passes() {
        assert!(!Claim::greater_than("sigma", 1.0).evaluate(&Numeric::Float(f64::NAN)));
        assert!(!Claim::less_than("err", 1.0).evaluate(&Numeric::Float(f64::NAN)));
        assert!(!Claim::greater_than("x", 1.0).evaluate(&Numeric::from(vec![2.0])));
    }

    #[test]
    fn test_display() {
        let claim = Claim::greater_than("small_world_sigma", 1.0);
        assert_eq!(claim.to_string(), format!("small_world_sigma > {}", Numeric::Float(1.0)));
    }
}
