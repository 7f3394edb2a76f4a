use crate::domain::errors::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Per-column standardisation (zero mean, unit variance).
///
/// Fit on the training partition only and stored next to the model so
/// prediction applies exactly the same transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fits column means and population standard deviations.
    /// Constant columns get a std of 1 so they scale to 0 instead of NaN.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| ForecastError::invalid("cannot fit a scaler on zero rows"))?;
        let dims = first.len();
        if rows.iter().any(|r| r.len() != dims) {
            return Err(ForecastError::invalid("ragged feature rows"));
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; dims];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut stds = vec![0.0; dims];
        for row in rows {
            for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                *s += (v - m).powi(2);
            }
        }
        for s in stds.iter_mut() {
            let std = (*s / n).sqrt();
            *s = if std > 1e-12 && std.is_finite() { std } else { 1.0 };
        }

        Ok(Self { means, stds })
    }

    pub fn dims(&self) -> usize {
        self.means.len()
    }

    /// True when means and stds agree in length and hold usable numbers.
    pub fn is_consistent(&self) -> bool {
        self.means.len() == self.stds.len()
            && self.means.iter().all(|m| m.is_finite())
            && self.stds.iter().all(|s| s.is_finite() && *s > 0.0)
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.dims() {
            return Err(ForecastError::invalid(format!(
                "scaler expects {} features, got {}",
                self.dims(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}
