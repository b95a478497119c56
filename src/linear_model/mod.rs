//! Linear models for regression.
//!
//! This module provides:
//! - `RidgeRegressionSolver`: closed-form ridge regression producing a `Model`
//! - `Model`: feature weights plus intercept, applied to already-normalized rows
//!
//! # Examples
//!
//! ```rust
//! use ridgecv::{RidgeRegressionSolver, Table};
//! use ndarray::array;
//!
//! let table = Table::new(&[[0.0, 1.0], [0.5, 2.0], [1.0, 3.0]]).unwrap();
//! let model = RidgeRegressionSolver::new().ridge(0.0).fit(&table).unwrap();
//! let prediction = model.apply(array![0.25].view()).unwrap();
//! assert!((prediction - 1.5).abs() < 1e-10);
//! ```

mod ridge;

pub use ridge::{DEFAULT_RIDGE, Model, RidgeRegressionSolver};
