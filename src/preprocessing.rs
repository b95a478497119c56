use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use ndarray::{ArrayView1, Axis};

/// Per-column `(min, max)` learned from one table.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizationBounds {
    min: Vector,
    max: Vector,
}

impl NormalizationBounds {
    pub fn n_columns(&self) -> usize {
        self.min.len()
    }

    pub fn min(&self) -> &Vector {
        &self.min
    }

    pub fn max(&self) -> &Vector {
        &self.max
    }

    fn rescale(&self, column: usize, value: f64) -> f64 {
        let span = self.max[column] - self.min[column];
        if span > 0.0 {
            (value - self.min[column]) / span
        } else {
            // constant column
            0.0
        }
    }
}

/// Min-max scaler into `[0, 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn fit(&self, data: &Matrix) -> Result<NormalizationBounds> {
        if data.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }

        let min = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v));
        let max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v));
        Ok(NormalizationBounds { min, max })
    }

    pub fn transform(&self, bounds: &NormalizationBounds, row: ArrayView1<f64>) -> Result<Vector> {
        if row.len() != bounds.n_columns() {
            return Err(Error::DimensionMismatch {
                expected: bounds.n_columns(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .enumerate()
            .map(|(c, &v)| bounds.rescale(c, v))
            .collect())
    }

    pub fn transform_matrix(&self, bounds: &NormalizationBounds, data: &Matrix) -> Result<Matrix> {
        if data.ncols() != bounds.n_columns() {
            return Err(Error::DimensionMismatch {
                expected: bounds.n_columns(),
                actual: data.ncols(),
            });
        }

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            for (c, v) in row.iter_mut().enumerate() {
                *v = bounds.rescale(c, *v);
            }
        }
        Ok(result)
    }

    pub fn fit_transform(&self, data: &Matrix) -> Result<(NormalizationBounds, Matrix)> {
        let bounds = self.fit(data)?;
        let transformed = self.transform_matrix(&bounds, data)?;
        Ok((bounds, transformed))
    }
}
