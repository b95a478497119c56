use crate::dataset::Table;
use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use log::{debug, trace};
use ndarray::{ArrayView1, Axis, s};

pub const DEFAULT_RIDGE: f64 = 1e-8;

const SINGULAR_PIVOT: f64 = 1e-12;
const MIN_SCALE: f64 = 1e-10;

/// Fitted linear model: one weight per feature plus an intercept.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    coefficients: Vector,
    intercept: f64,
    ridge: f64,
}

impl Model {
    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ridge(&self) -> f64 {
        self.ridge
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn apply(&self, row: ArrayView1<f64>) -> Result<f64> {
        if row.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                actual: row.len(),
            });
        }
        Ok(self.intercept + row.dot(&self.coefficients))
    }

    pub fn apply_batch(&self, x: &Matrix) -> Result<Vector> {
        if x.ncols() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

/// Closed-form ridge regression.
///
/// Features are centered and divided by their standard deviation, the target
/// is centered, and `w = (ZᵀZ + λI)⁻¹ Zᵀ(y - ȳ)` is solved on that scale. The
/// weights are mapped back to feature units and the intercept is
/// `ȳ - β·x̄`, so the intercept is never penalized.
#[derive(Clone, Debug)]
pub struct RidgeRegressionSolver {
    ridge: f64,
}

impl RidgeRegressionSolver {
    pub fn new() -> Self {
        Self {
            ridge: DEFAULT_RIDGE,
        }
    }

    pub fn ridge(mut self, ridge: f64) -> Self {
        self.ridge = ridge;
        self
    }

    pub fn fit(&self, table: &Table) -> Result<Model> {
        if !self.ridge.is_finite() || self.ridge < 0.0 {
            return Err(Error::InvalidRidge(self.ridge));
        }

        let x = table.features();
        let y = table.target();
        let x_means = x.mean_axis(Axis(0)).ok_or(Error::EmptyDataset)?;
        let y_mean = y.mean().ok_or(Error::EmptyDataset)?;
        debug!(
            "fitting ridge regression: rows={}, features={}, ridge={:e}",
            table.n_rows(),
            table.n_features(),
            self.ridge
        );

        // constant columns keep scale 1 and stay all-zero after centering
        let x_scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > MIN_SCALE { s } else { 1.0 });
        let mut z = x - &x_means;
        z /= &x_scales;
        let y_centered = y - y_mean;

        let zt = z.t();
        let mut ztz = zt.dot(&z);
        for i in 0..ztz.nrows() {
            ztz[(i, i)] += self.ridge;
        }
        let zty = zt.dot(&y_centered);

        let scaled = solve_linear_system(&ztz, &zty)?;
        let coefficients = &scaled / &x_scales;
        let intercept = y_mean - coefficients.dot(&x_means);

        Ok(Model {
            coefficients,
            intercept,
            ridge: self.ridge,
        })
    }
}

impl Default for RidgeRegressionSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Gaussian elimination with partial pivoting.
fn solve_linear_system(a: &Matrix, b: &Vector) -> Result<Vector> {
    let n = a.nrows();
    let mut aug = Matrix::zeros((n, n + 1));
    aug.slice_mut(s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if aug[(k, i)].abs() > aug[(max_row, i)].abs() {
                max_row = k;
            }
        }

        let pivot = aug[(max_row, i)];
        trace!("pivot {}: {:e}", i, pivot);
        if !pivot.is_finite() || pivot.abs() < SINGULAR_PIVOT {
            return Err(Error::SingularMatrix { pivot });
        }

        if max_row != i {
            for j in 0..=n {
                aug.swap((i, j), (max_row, j));
            }
        }

        for k in (i + 1)..n {
            let factor = aug[(k, i)] / aug[(i, i)];
            for j in i..=n {
                aug[(k, j)] -= factor * aug[(i, j)];
            }
        }
    }

    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        x[i] = aug[(i, n)];
        for j in (i + 1)..n {
            x[i] -= aug[(i, j)] * x[j];
        }
        x[i] /= aug[(i, i)];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn table(rows: &[[f64; 3]]) -> Table {
        Table::new(rows).unwrap()
    }

    #[test]
    fn test_ridge_exact_fit() {
        // y = 2*x1 - x2 + 3
        let data = table(&[
            [0.0, 0.0, 3.0],
            [1.0, 0.0, 5.0],
            [0.0, 1.0, 2.0],
            [1.0, 1.0, 4.0],
            [0.5, 0.25, 3.75],
        ]);

        let model = RidgeRegressionSolver::new().ridge(0.0).fit(&data).unwrap();
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-10);
        assert!((model.coefficients()[1] + 1.0).abs() < 1e-10);
        assert!((model.intercept() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_ridge_default_is_near_exact() {
        let data = table(&[
            [0.0, 0.0, 3.0],
            [1.0, 0.0, 5.0],
            [0.0, 1.0, 2.0],
            [1.0, 1.0, 4.0],
        ]);

        let model = RidgeRegressionSolver::new().fit(&data).unwrap();
        assert_eq!(model.ridge(), DEFAULT_RIDGE);
        let predictions = model.apply_batch(data.features()).unwrap();
        for (pred, actual) in predictions.iter().zip(data.target().iter()) {
            assert!((pred - actual).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ridge_shrinks_coefficients() {
        let data = table(&[
            [0.0, 0.0, 3.0],
            [1.0, 0.0, 5.0],
            [0.0, 1.0, 2.0],
            [1.0, 1.0, 4.0],
        ]);

        let loose = RidgeRegressionSolver::new().ridge(0.0).fit(&data).unwrap();
        let tight = RidgeRegressionSolver::new().ridge(10.0).fit(&data).unwrap();
        assert!(tight.coefficients()[0].abs() < loose.coefficients()[0].abs());
    }

    #[test]
    fn test_intercept_is_not_penalized() {
        let data = table(&[
            [0.0, 1.0, 5.0],
            [1.0, 0.0, 5.0],
            [0.5, 0.5, 5.0],
            [1.0, 1.0, 5.0],
        ]);

        let model = RidgeRegressionSolver::new().ridge(10.0).fit(&data).unwrap();
        assert!((model.intercept() - 5.0).abs() < 1e-10);
        assert!(model.coefficients().iter().all(|c| c.abs() < 1e-10));
    }

    #[test]
    fn test_large_coefficients_stay_accurate() {
        // total = non-urgent + urgent, both in the hundreds
        let rows: Vec<[f64; 4]> = (0..60)
            .map(|i| {
                let a = 40.0 + ((i * 37) % 60) as f64 * 6.7;
                let b = 70.0 + ((i * 11) % 17) as f64 * 9.4;
                let c = ((i * 13) % 7) as f64;
                [a, b, c, a + b]
            })
            .collect();
        let data = Table::new(&rows).unwrap();

        let model = RidgeRegressionSolver::new().fit(&data).unwrap();
        let prediction = model.apply(array![316.307, 223.270, 3.0].view()).unwrap();
        assert!((prediction - 539.577).abs() <= 1e-7);
    }

    #[test]
    fn test_singular_without_ridge() {
        let data = table(&[[0.0, 1.0, 1.0], [0.0, 2.0, 2.0], [0.0, 3.0, 3.0]]);
        let result = RidgeRegressionSolver::new().ridge(0.0).fit(&data);
        assert!(matches!(result, Err(Error::SingularMatrix { .. })));

        let model = RidgeRegressionSolver::new().fit(&data).unwrap();
        assert_eq!(model.coefficients()[0], 0.0);
    }

    #[test]
    fn test_refit_is_identical() {
        let data = table(&[
            [0.1, 0.7, 1.3],
            [0.9, 0.2, 2.1],
            [0.4, 0.4, 1.7],
            [0.6, 1.0, 3.3],
        ]);
        let solver = RidgeRegressionSolver::new().ridge(0.01);
        assert_eq!(solver.fit(&data).unwrap(), solver.fit(&data).unwrap());
    }

    #[test]
    fn test_invalid_ridge() {
        let data = table(&[[0.0, 1.0, 1.0], [1.0, 2.0, 2.0]]);
        assert!(matches!(
            RidgeRegressionSolver::new().ridge(-1.0).fit(&data),
            Err(Error::InvalidRidge(_))
        ));
        assert!(matches!(
            RidgeRegressionSolver::new().ridge(f64::NAN).fit(&data),
            Err(Error::InvalidRidge(_))
        ));
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let data = table(&[[0.0, 1.0, 1.0], [1.0, 2.0, 2.0], [2.0, 0.0, 4.0]]);
        let model = RidgeRegressionSolver::new().fit(&data).unwrap();
        assert!(matches!(
            model.apply(array![1.0].view()),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(model.apply(array![1.0, 1.0].view()).is_ok());
    }
}
