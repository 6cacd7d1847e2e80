//! Categorical coordinates.

use serde::{Deserialize, Serialize};

/// A point (knowledge, time, entropy) in categorical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoricalCoordinate {
    pub knowledge: f64,
    pub time: f64,
    pub entropy: f64,
}

impl CategoricalCoordinate {
    pub const fn new(knowledge: f64, time: f64, entropy: f64) -> Self {
        Self {
            knowledge,
            time,
            entropy,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.knowledge, self.time, self.entropy]
    }

    /// Euclidean distance over the triple.
    pub fn distance(&self, other: &Self) -> f64 {
        let dk = self.knowledge - other.knowledge;
        let dt = self.time - other.time;
        let de = self.entropy - other.entropy;
        (dk * dk + dt * dt + de * de).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.knowledge.is_finite() && self.time.is_finite() && self.entropy.is_finite()
    }
}

impl From<[f64; 3]> for CategoricalCoordinate {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_345() {
        let a = CategoricalCoordinate::new(0.0, 0.0, 0.0);
        let b = CategoricalCoordinate::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_array_round_trip() {
        let c = CategoricalCoordinate::from([1.0, -2.0, 0.5]);
        assert_eq!(c.as_array(), [1.0, -2.0, 0.5]);
        assert!(c.is_finite());
        assert!(!CategoricalCoordinate::new(f64::NAN, 0.0, 0.0).is_finite());
    }
}
