pub mod builder;

pub use builder::{FeatureBuilder, MIN_LABELED_ROWS};
