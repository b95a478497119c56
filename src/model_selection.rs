//! K-fold cross-validation.
//!
//! Rows are shuffled with a seeded generator and dealt round-robin into
//! folds, so a given `(seed, n_rows, n_folds)` always yields the same split.
//! Every fold is scored by a pipeline fitted on the remaining rows only;
//! normalization bounds never see the held-out rows.

use crate::dataset::Table;
use crate::error::{Error, Result};
use crate::pipeline::{PipelineOptions, RegressionPipeline};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

pub const DEFAULT_FOLDS: usize = 10;
pub const DEFAULT_SEED: u64 = 1;

/// Fold id of every row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldAssignment {
    folds: Vec<usize>,
    n_folds: usize,
}

impl FoldAssignment {
    pub fn new(n_rows: usize, n_folds: usize, seed: u64) -> Result<Self> {
        if n_folds < 2 || n_folds > n_rows {
            return Err(Error::InvalidFoldCount {
                folds: n_folds,
                rows: n_rows,
            });
        }

        let mut order: Vec<usize> = (0..n_rows).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let mut folds = vec![0; n_rows];
        for (position, &row) in order.iter().enumerate() {
            folds[row] = position % n_folds;
        }

        Ok(Self { folds, n_folds })
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    pub fn n_rows(&self) -> usize {
        self.folds.len()
    }

    /// Fold of `row`, or `None` past the last row.
    pub fn fold_of(&self, row: usize) -> Option<usize> {
        self.folds.get(row).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.folds
    }

    /// Rows in `fold`, ascending.
    pub fn held_out(&self, fold: usize) -> Vec<usize> {
        self.rows_where(|f| f == fold)
    }

    /// Rows outside `fold`, ascending.
    pub fn training(&self, fold: usize) -> Vec<usize> {
        self.rows_where(|f| f != fold)
    }

    fn rows_where<F: Fn(usize) -> bool>(&self, predicate: F) -> Vec<usize> {
        self.folds
            .iter()
            .enumerate()
            .filter(|&(_, &f)| predicate(f))
            .map(|(i, _)| i)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FoldScore {
    pub fold: usize,
    pub held_out: usize,
    pub sum_squared_error: f64,
    pub sum_absolute_error: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationResult {
    folds: Vec<FoldScore>,
    n_predictions: usize,
    sum_squared_error: f64,
    sum_absolute_error: f64,
}

impl EvaluationResult {
    fn from_folds(folds: Vec<FoldScore>) -> Self {
        let mut n_predictions = 0;
        let mut sum_squared_error = 0.0;
        let mut sum_absolute_error = 0.0;
        for score in &folds {
            n_predictions += score.held_out;
            sum_squared_error += score.sum_squared_error;
            sum_absolute_error += score.sum_absolute_error;
        }

        Self {
            folds,
            n_predictions,
            sum_squared_error,
            sum_absolute_error,
        }
    }

    pub fn root_mean_squared_error(&self) -> f64 {
        if self.n_predictions == 0 {
            return 0.0;
        }
        (self.sum_squared_error / self.n_predictions as f64).sqrt()
    }

    pub fn mean_absolute_error(&self) -> f64 {
        if self.n_predictions == 0 {
            return 0.0;
        }
        self.sum_absolute_error / self.n_predictions as f64
    }

    pub fn n_predictions(&self) -> usize {
        self.n_predictions
    }

    /// Per-fold scores, ordered by fold id.
    pub fn folds(&self) -> &[FoldScore] {
        &self.folds
    }
}

#[derive(Clone, Debug)]
pub struct CrossValidator {
    n_folds: usize,
    seed: u64,
    parallel: bool,
}

impl CrossValidator {
    pub fn new(n_folds: usize) -> Self {
        Self {
            n_folds,
            seed: DEFAULT_SEED,
            parallel: false,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    pub fn fold_assignment(&self, n_rows: usize) -> Result<FoldAssignment> {
        FoldAssignment::new(n_rows, self.n_folds, self.seed)
    }

    pub fn evaluate(&self, table: &Table, options: &PipelineOptions) -> Result<EvaluationResult> {
        let assignment = self.fold_assignment(table.n_rows())?;
        debug!(
            "cross-validating: rows={}, folds={}, seed={}, parallel={}",
            table.n_rows(),
            self.n_folds,
            self.seed,
            self.parallel
        );

        let scores = if self.parallel {
            (0..assignment.n_folds())
                .into_par_iter()
                .map(|fold| evaluate_fold(table, &assignment, fold, options))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..assignment.n_folds())
                .map(|fold| evaluate_fold(table, &assignment, fold, options))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(EvaluationResult::from_folds(scores))
    }
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::new(DEFAULT_FOLDS)
    }
}

fn evaluate_fold(
    table: &Table,
    assignment: &FoldAssignment,
    fold: usize,
    options: &PipelineOptions,
) -> Result<FoldScore> {
    let held_out = assignment.held_out(fold);
    if held_out.is_empty() {
        return Ok(FoldScore {
            fold,
            held_out: 0,
            sum_squared_error: 0.0,
            sum_absolute_error: 0.0,
        });
    }

    let mut pipeline = RegressionPipeline::new(options.clone());
    pipeline.fit(&table.select(&assignment.training(fold)))?;

    let test = table.select(&held_out);
    let predictions = pipeline.predict_batch(test.features())?;
    let residuals = test.target() - &predictions;

    let score = FoldScore {
        fold,
        held_out: held_out.len(),
        sum_squared_error: residuals.mapv(|r| r * r).sum(),
        sum_absolute_error: residuals.mapv(f64::abs).sum(),
    };
    debug!(
        "fold {}: held_out={}, sse={:e}",
        fold, score.held_out, score.sum_squared_error
    );
    Ok(score)
}
