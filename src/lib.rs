//! Min-max normalized ridge regression with k-fold cross-validation.
//!
//! ```rust
//! use ridgecv::{CrossValidator, PipelineOptions, RegressionPipeline, Table};
//!
//! let rows: Vec<[f64; 3]> = (0..20)
//!     .map(|i| {
//!         let (a, b) = (i as f64, ((i * 3) % 7) as f64);
//!         [a, b, a + b]
//!     })
//!     .collect();
//! let table = Table::new(&rows).unwrap();
//!
//! let mut pipeline = RegressionPipeline::new(PipelineOptions::new().ridge(1e-8));
//! pipeline.fit(&table).unwrap();
//! let prediction = pipeline.predict(&[4.0, 2.0]).unwrap();
//! assert!((prediction - 6.0).abs() < 1e-4);
//!
//! let result = pipeline.cross_validate(&CrossValidator::new(5).seed(1)).unwrap();
//! assert!(result.root_mean_squared_error() < 1e-3);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod preprocessing;

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

pub use dataset::Table;
pub use error::{Error, Result};
pub use linear_model::{DEFAULT_RIDGE, Model, RidgeRegressionSolver};
pub use model_selection::{
    CrossValidator, DEFAULT_FOLDS, DEFAULT_SEED, EvaluationResult, FoldAssignment, FoldScore,
};
pub use pipeline::{PipelineOptions, RegressionPipeline};
pub use preprocessing::{NormalizationBounds, Normalizer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RegressionPipeline>();
        assert_send_sync::<EvaluationResult>();
        assert_send_sync::<CrossValidator>();
    }
}
