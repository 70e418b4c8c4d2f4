use crate::config::SplitConfig;
use crate::error::{PredictorError, Result};
use crate::ml::dataset::LabeledDataset;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Train and test subsets of one labeled dataset. Both keep ascending
/// timestamp order.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: LabeledDataset,
    pub test: LabeledDataset,
}

impl TrainTestSplit {
    pub fn train_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_range(&self.train)
    }

    pub fn test_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_range(&self.test)
    }
}

fn date_range(dataset: &LabeledDataset) -> Option<(NaiveDate, NaiveDate)> {
    let timestamps = dataset.timestamps();
    let min = timestamps.iter().min()?;
    let max = timestamps.iter().max()?;
    Some((*min, *max))
}

pub struct DatasetSplitter {
    config: SplitConfig,
}

impl DatasetSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn split(&self, dataset: &LabeledDataset) -> Result<TrainTestSplit> {
        let fraction = self.config.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(PredictorError::InvalidSplit(format!(
                "test fraction {} must be strictly between 0 and 1",
                fraction
            )));
        }

        let total_rows = dataset.len();
        let test_rows = test_size(total_rows, fraction);

        if test_rows == 0 || test_rows >= total_rows {
            return Err(PredictorError::InvalidSplit(format!(
                "{} rows with test fraction {} leaves {} train and {} test rows",
                total_rows,
                fraction,
                total_rows.saturating_sub(test_rows),
                test_rows
            )));
        }

        let (mut train_idx, mut test_idx): (Vec<usize>, Vec<usize>) = if self.config.chronological {
            let cut = total_rows - test_rows;
            ((0..cut).collect(), (cut..total_rows).collect())
        } else {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut indices: Vec<usize> = (0..total_rows).collect();
            indices.shuffle(&mut rng);
            let train = indices.split_off(test_rows);
            (train, indices)
        };

        train_idx.sort_unstable();
        test_idx.sort_unstable();

        log::debug!(
            "Split {} rows into {} train / {} test (chronological: {})",
            total_rows,
            train_idx.len(),
            test_idx.len(),
            self.config.chronological
        );

        Ok(TrainTestSplit {
            train: dataset.subset(&train_idx),
            test: dataset.subset(&test_idx),
        })
    }
}

/// `ceil(n * fraction)`, tolerant of binary rounding just above an integer
pub fn test_size(total_rows: usize, fraction: f64) -> usize {
    ((total_rows as f64 * fraction) - 1e-9).ceil().max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rounds_up() {
        assert_eq!(test_size(39, 0.2), 8);
        assert_eq!(test_size(10, 0.3), 3);
        assert_eq!(test_size(10, 0.2), 2);
        assert_eq!(test_size(2, 0.99), 2);
        assert_eq!(test_size(5, 0.01), 1);
    }
}
