//! Ordinary least squares linear regression.
//!
//! Columns are centered and scaled to unit norm before solving the normal
//! equations with a pivoted Cholesky factorization, which keeps the Gram
//! matrix well scaled and exposes exactly collinear columns.

use super::metrics::{FeatureImportance, RegressionMetrics};
use crate::error::{PredictorError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Remaining squared norm (relative to 1) below which a standardized column
/// is treated as a linear combination of the columns already selected
const RANK_TOLERANCE: f64 = 1e-10;

/// Relative spread below which a column counts as constant
const CONSTANT_TOLERANCE: f64 = 1e-12;

/// Coefficients and intercept of a fitted linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Number of columns that received a non-zero weight
    pub rank: usize,
    pub n_train: usize,
}

impl FittedModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(PredictorError::Validation(format!(
                "Dimension mismatch: model has {} features, input has {}",
                self.coefficients.len(),
                x.ncols()
            )));
        }

        let coefficients = ArrayView1::from(&self.coefficients[..]);
        Ok(x.dot(&coefficients) + self.intercept)
    }

    /// Mean squared error, RMSE, MAE and R² against `y`
    pub fn evaluate(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<RegressionMetrics> {
        if x.nrows() != y.len() {
            return Err(PredictorError::Validation(format!(
                "Dimension mismatch: {} rows, {} targets",
                x.nrows(),
                y.len()
            )));
        }
        let predictions = self.predict(x)?;
        RegressionMetrics::calculate(y, predictions.view())
    }

    /// Absolute coefficient per feature, in feature order.
    ///
    /// Magnitudes depend on each feature's units: an unscaled volume column
    /// gets a tiny weight however much it matters.
    pub fn feature_importance(&self, feature_names: &[String]) -> Result<Vec<FeatureImportance>> {
        if feature_names.len() != self.coefficients.len() {
            return Err(PredictorError::Validation(format!(
                "{} feature names for {} coefficients",
                feature_names.len(),
                self.coefficients.len()
            )));
        }

        Ok(feature_names
            .iter()
            .zip(&self.coefficients)
            .map(|(name, &coefficient)| FeatureImportance {
                feature: name.clone(),
                coefficient,
                importance: coefficient.abs(),
            })
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinearRegressor;

impl LinearRegressor {
    pub fn new() -> Self {
        Self
    }

    /// Fit `y ≈ x·β + b` by least squares.
    ///
    /// Fails with `DegenerateInput` for mismatched shapes, fewer rows than
    /// parameters, or a constant column. Exactly collinear columns get a
    /// zero weight.
    pub fn fit(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<FittedModel> {
        let (n_rows, n_features) = x.dim();

        if n_rows != y.len() {
            return Err(PredictorError::DegenerateInput(format!(
                "{} rows but {} targets",
                n_rows,
                y.len()
            )));
        }
        if n_features == 0 {
            return Err(PredictorError::DegenerateInput("no feature columns".to_string()));
        }
        if n_rows < n_features + 1 {
            return Err(PredictorError::DegenerateInput(format!(
                "{} rows cannot determine {} coefficients and an intercept",
                n_rows, n_features
            )));
        }

        let means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PredictorError::DegenerateInput("empty feature matrix".to_string()))?;
        let y_mean = y.sum() / n_rows as f64;

        let centered = &x - &means;
        let norms: Vec<f64> = centered
            .axis_iter(Axis(1))
            .map(|column| column.dot(&column).sqrt())
            .collect();

        for (j, &norm) in norms.iter().enumerate() {
            let magnitude = x.column(j).iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
            if norm <= CONSTANT_TOLERANCE * magnitude.max(1.0) * (n_rows as f64).sqrt() {
                return Err(PredictorError::DegenerateInput(format!(
                    "feature column {} is constant",
                    j
                )));
            }
        }

        let norms = Array1::from(norms);
        let standardized = &centered / &norms;
        let y_centered = &y - y_mean;

        let gram = standardized.t().dot(&standardized);
        let rhs = standardized.t().dot(&y_centered);

        let (beta_std, rank) = solve_pivoted_cholesky(&gram, &rhs)?;
        if rank < n_features {
            log::warn!(
                "Feature matrix has rank {} of {}; collinear columns get zero weight",
                rank,
                n_features
            );
        }

        let coefficients: Vec<f64> = beta_std
            .iter()
            .zip(norms.iter())
            .map(|(b, norm)| b / norm)
            .collect();
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(means.iter())
                .map(|(c, m)| c * m)
                .sum::<f64>();

        log::debug!(
            "Fitted OLS on {} rows x {} features, intercept {:.4}",
            n_rows,
            n_features,
            intercept
        );

        Ok(FittedModel {
            coefficients,
            intercept,
            rank,
            n_train: n_rows,
        })
    }
}

/// Solve `gram · β = rhs` for a symmetric positive semi-definite `gram`.
///
/// Columns are taken greedily by largest remaining diagonal; once that falls
/// under `RANK_TOLERANCE` the rest are left at zero. Returns β and the rank.
fn solve_pivoted_cholesky(gram: &Array2<f64>, rhs: &Array1<f64>) -> Result<(Array1<f64>, usize)> {
    let p = gram.nrows();
    let mut perm: Vec<usize> = (0..p).collect();
    let mut lower = Array2::<f64>::zeros((p, p));
    let mut remaining: Vec<f64> = (0..p).map(|j| gram[[j, j]]).collect();
    let mut rank = 0;

    for k in 0..p {
        let (best, best_value) = (k..p)
            .map(|i| (i, remaining[perm[i]]))
            .fold((k, f64::NEG_INFINITY), |acc, cur| if cur.1 > acc.1 { cur } else { acc });

        if best_value <= RANK_TOLERANCE {
            break;
        }

        perm.swap(k, best);
        for m in 0..k {
            lower.swap([k, m], [best, m]);
        }

        let pivot = best_value.sqrt();
        lower[[k, k]] = pivot;
        let pk = perm[k];

        for i in (k + 1)..p {
            let pi = perm[i];
            let mut s = gram[[pi, pk]];
            for m in 0..k {
                s -= lower[[i, m]] * lower[[k, m]];
            }
            lower[[i, k]] = s / pivot;
            remaining[pi] -= lower[[i, k]] * lower[[i, k]];
        }

        rank += 1;
    }

    if rank == 0 {
        return Err(PredictorError::DegenerateInput(
            "feature matrix has rank 0".to_string(),
        ));
    }

    // Forward substitution on the leading rank x rank block
    let mut z = vec![0.0; rank];
    for k in 0..rank {
        let mut s = rhs[perm[k]];
        for m in 0..k {
            s -= lower[[k, m]] * z[m];
        }
        z[k] = s / lower[[k, k]];
    }

    // Backward substitution
    let mut solved = vec![0.0; rank];
    for k in (0..rank).rev() {
        let mut s = z[k];
        for m in (k + 1)..rank {
            s -= lower[[m, k]] * solved[m];
        }
        solved[k] = s / lower[[k, k]];
    }

    let mut beta = Array1::<f64>::zeros(p);
    for k in 0..rank {
        beta[perm[k]] = solved[k];
    }

    Ok((beta, rank))
}
