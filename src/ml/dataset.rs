use crate::error::{PredictorError, Result};
use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Feature values derived for one timestamp. Optional features are `Some`
/// exactly when they are enabled in the builder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: NaiveDate,
    pub prev_close: f64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub daily_return: f64,
    pub volatility: Option<f64>,
    pub volume: Option<f64>,
}

impl FeatureRow {
    /// Values in feature-name order
    pub fn values(&self) -> Vec<f64> {
        let mut values = vec![self.prev_close, self.ma_short, self.ma_long, self.daily_return];
        values.extend(self.volatility);
        values.extend(self.volume);
        values
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub features: FeatureRow,
    pub target: f64,
}

impl LabeledRow {
    pub fn timestamp(&self) -> NaiveDate {
        self.features.timestamp
    }
}

/// Feature rows paired with their targets, ascending by timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    feature_names: Vec<String>,
    rows: Vec<LabeledRow>,
}

impl LabeledDataset {
    pub fn new(feature_names: Vec<String>, rows: Vec<LabeledRow>) -> Self {
        Self { feature_names, rows }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[LabeledRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(LabeledRow::timestamp).collect()
    }

    /// Rows at the given positions, in the order given
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
        }
    }

    pub fn feature_matrix(&self) -> Result<Array2<f64>> {
        let features: Vec<&FeatureRow> = self.rows.iter().map(|r| &r.features).collect();
        to_matrix(&features, self.feature_names.len())
    }

    pub fn targets(&self) -> Array1<f64> {
        self.rows.iter().map(|r| r.target).collect()
    }
}

/// Stack feature rows into an `n x n_features` design matrix
pub fn to_matrix(rows: &[&FeatureRow], n_features: usize) -> Result<Array2<f64>> {
    let mut flat = Vec::with_capacity(rows.len() * n_features);
    for row in rows {
        let values = row.values();
        if values.len() != n_features {
            return Err(PredictorError::Validation(format!(
                "Feature row for {} has {} values, expected {}",
                row.timestamp,
                values.len(),
                n_features
            )));
        }
        flat.extend(values);
    }

    Array2::from_shape_vec((rows.len(), n_features), flat)
        .map_err(|e| PredictorError::Validation(e.to_string()))
}
