/// Hold-out error metrics of one fitted candidate.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegressionMetrics {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
}

impl RegressionMetrics {
    /// Computes R², RMSE and MAE. R² is 0 when the actuals have no variance.
    pub fn evaluate(predicted: &[f64], actual: &[f64]) -> Option<Self> {
        let n = predicted.len().min(actual.len());
        if n == 0 {
            return None;
        }
        let (predicted, actual) = (&predicted[..n], &actual[..n]);

        let sq_err: f64 = predicted
            .iter()
            .zip(actual)
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let mse = sq_err / n as f64;
        let mae = predicted
            .iter()
            .zip(actual)
            .map(|(p, t)| (p - t).abs())
            .sum::<f64>()
            / n as f64;

        let mean_y = actual.iter().sum::<f64>() / n as f64;
        let var_y = actual.iter().map(|t| (t - mean_y).powi(2)).sum::<f64>() / n as f64;
        let r2 = if var_y > 0.0 { 1.0 - mse / var_y } else { 0.0 };

        Some(Self {
            r2,
            rmse: mse.sqrt(),
            mae,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_fit() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let m = RegressionMetrics::evaluate(&y, &y).unwrap();
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mae, 0.0);
    }

    #[test]
    fn test_mean_predictor_scores_zero() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let mean = [2.5; 4];
        let m = RegressionMetrics::evaluate(&mean, &y).unwrap();
        assert!(m.r2.abs() < 1e-12);
        assert!((m.mae - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_worse_than_mean_is_negative() {
        let y = [1.0, 2.0, 3.0];
        let bad = [3.0, 2.0, 1.0];
        assert!(RegressionMetrics::evaluate(&bad, &y).unwrap().r2 < 0.0);
        assert!(RegressionMetrics::evaluate(&[], &[]).is_none());
    }
}
