use crate::dataset::Table;
use crate::error::{Error, Result};
use crate::linear_model::{DEFAULT_RIDGE, Model, RidgeRegressionSolver};
use crate::model_selection::{CrossValidator, EvaluationResult};
use crate::preprocessing::{NormalizationBounds, Normalizer};
use crate::{Matrix, Vector};
use log::debug;
use ndarray::ArrayView1;

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOptions {
    pub ridge: f64,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ridge(mut self, ridge: f64) -> Self {
        self.ridge = ridge;
        self
    }

    fn solver(&self) -> RidgeRegressionSolver {
        RidgeRegressionSolver::new().ridge(self.ridge)
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
        }
    }
}

#[derive(Clone, Debug)]
struct Fitted {
    bounds: NormalizationBounds,
    model: Model,
    table: Table,
}

/// Min-max normalization followed by ridge regression.
///
/// The target column is never rescaled, so predictions are in target units.
#[derive(Clone, Debug)]
pub struct RegressionPipeline {
    options: PipelineOptions,
    fitted: Option<Fitted>,
}

impl RegressionPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            fitted: None,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn bounds(&self) -> Option<&NormalizationBounds> {
        self.fitted.as_ref().map(|f| &f.bounds)
    }

    pub fn model(&self) -> Option<&Model> {
        self.fitted.as_ref().map(|f| &f.model)
    }

    /// Refits from scratch. On error the previous fit, if any, is kept.
    pub fn fit(&mut self, table: &Table) -> Result<()> {
        let (bounds, features) = Normalizer::new().fit_transform(table.features())?;
        let model = self.options.solver().fit(&table.with_features(features))?;
        debug!(
            "pipeline fitted on {} rows: intercept={}, coefficients={}",
            table.n_rows(),
            model.intercept(),
            model.coefficients()
        );

        self.fitted = Some(Fitted {
            bounds,
            model,
            table: table.clone(),
        });
        Ok(())
    }

    /// Predicts one row of raw feature values. A trailing target value, if
    /// present, is ignored.
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;

        let n_features = fitted.bounds.n_columns();
        let features = if row.len() == n_features || row.len() == n_features + 1 {
            &row[..n_features]
        } else {
            return Err(Error::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        };

        let normalized = Normalizer::new().transform(&fitted.bounds, ArrayView1::from(features))?;
        fitted.model.apply(normalized.view())
    }

    pub fn predict_batch(&self, features: &Matrix) -> Result<Vector> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        let normalized = Normalizer::new().transform_matrix(&fitted.bounds, features)?;
        fitted.model.apply_batch(&normalized)
    }

    /// R² of the predictions on `table`.
    pub fn score(&self, table: &Table) -> Result<f64> {
        let predictions = self.predict_batch(table.features())?;
        crate::metrics::r2_score(table.target(), &predictions)
    }

    /// Cross-validates on the table passed to the last `fit`, with this
    /// pipeline's options.
    pub fn cross_validate(&self, validator: &CrossValidator) -> Result<EvaluationResult> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        validator.evaluate(&fitted.table, &self.options)
    }
}

impl Default for RegressionPipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
