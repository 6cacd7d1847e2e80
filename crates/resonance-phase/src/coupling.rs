//! Coupling matrices.

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

/// Dense N×N coupling matrix K, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingMatrix {
    size: usize,
    values: Vec<f64>,
}

impl CouplingMatrix {
    /// All-to-all coupling with `K_ij = strength`.
    pub fn uniform(size: usize, strength: f64) -> ResonanceResult<Self> {
        if !strength.is_finite() {
            return Err(ResonanceError::invalid(
                "coupling",
                format!("strength must be finite, got {strength}"),
            ));
        }
        Ok(Self {
            size,
            values: vec![strength; size * size],
        })
    }

    /// Build from explicit rows. Every row must have one entry per row.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ResonanceResult<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ResonanceError::invalid(
                    "coupling",
                    format!("row {i} has {} entries, expected {size}", row.len()),
                ));
            }
            if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
                return Err(ResonanceError::invalid(
                    "coupling",
                    format!("row {i} contains non-finite entry {bad}"),
                ));
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

/// `K_base · (1 + modulation)`.
pub fn modulated_strength(base: f64, modulation: f64) -> f64 {
    base * (1.0 + modulation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let k = CouplingMatrix::uniform(3, 0.5).unwrap();
        assert_eq!(k.size(), 3);
        assert_eq!(k.get(2, 1), 0.5);
        assert_eq!(k.row(1), &[0.5, 0.5, 0.5]);
        assert!(CouplingMatrix::uniform(3, f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = CouplingMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
        let k = CouplingMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        assert_eq!(k.get(1, 0), 2.0);
    }

    #[test]
    fn test_modulated_strength() {
        assert!((modulated_strength(0.5, 1e-3 * 5e3) - 3.0).abs() < 1e-12);
        assert_eq!(modulated_strength(0.5, 0.0), 0.5);
    }
}
