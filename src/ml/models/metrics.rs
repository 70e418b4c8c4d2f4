use crate::error::{PredictorError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hold-out error metrics for a regression model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn calculate(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(PredictorError::Validation(format!(
                "{} actual values but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }
        if actual.is_empty() {
            return Err(PredictorError::Validation(
                "Cannot score an empty evaluation set".to_string(),
            ));
        }

        let n = actual.len() as f64;
        let mean = actual.sum() / n;

        let ss_res: f64 = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| (p - a).powi(2))
            .sum();
        let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
        let abs_err: f64 = actual
            .iter()
            .zip(predicted.iter())
            .map(|(a, p)| (p - a).abs())
            .sum();

        // Constant targets: perfect when every prediction matches, else no skill
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else if ss_res == 0.0 {
            1.0
        } else {
            0.0
        };

        let mse = ss_res / n;
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: abs_err / n,
            r2,
        })
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("mse".to_string(), self.mse),
            ("rmse".to_string(), self.rmse),
            ("mae".to_string(), self.mae),
            ("r2".to_string(), self.r2),
        ])
    }
}

/// Linear influence of one feature: `importance = |coefficient|`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub coefficient: f64,
    pub importance: f64,
}

/// Importances ordered from largest to smallest
pub fn ranked(importances: &[FeatureImportance]) -> Vec<FeatureImportance> {
    let mut sorted = importances.to_vec();
    sorted.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    sorted
}
