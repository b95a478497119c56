use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use log::{debug, warn};
use ndarray::Axis;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A rectangular numeric table whose last column is the regression target.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    features: Matrix,
    target: Vector,
}

impl Table {
    /// Builds a table from rows of `A` values each, the last one being the target.
    pub fn new<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyDataset)?;
        let n_attributes = first.as_ref().len();
        if n_attributes < 2 {
            return Err(Error::DimensionMismatch {
                expected: 2,
                actual: n_attributes,
            });
        }

        for row in rows {
            let row = row.as_ref();
            if row.len() != n_attributes {
                return Err(Error::DimensionMismatch {
                    expected: n_attributes,
                    actual: row.len(),
                });
            }
        }

        let n_features = n_attributes - 1;
        let features = Matrix::from_shape_fn((rows.len(), n_features), |(i, j)| rows[i].as_ref()[j]);
        let target = rows.iter().map(|row| row.as_ref()[n_features]).collect::<Vector>();

        Self::from_parts(features, target)
    }

    pub fn from_parts(features: Matrix, target: Vector) -> Result<Self> {
        if features.nrows() != target.len() {
            return Err(Error::DimensionMismatch {
                expected: features.nrows(),
                actual: target.len(),
            });
        }
        if features.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }

        let n_features = features.ncols();
        for (i, row) in features.axis_iter(Axis(0)).enumerate() {
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteValue { row: i, column: j });
            }
            if !target[i].is_finite() {
                return Err(Error::NonFiniteValue {
                    row: i,
                    column: n_features,
                });
            }
        }

        Ok(Self { features, target })
    }

    /// Reads a headered delimited text source. The first line is skipped as a header;
    /// lines that fail to parse, or whose width differs from the first data line, are
    /// skipped with a warning.
    pub fn from_reader<B: BufRead>(reader: B, delimiter: char) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if i == 0 || line.trim().is_empty() {
                continue;
            }

            let values: std::result::Result<Vec<f64>, _> = line
                .split(delimiter)
                .map(|s| s.trim().parse::<f64>())
                .collect();

            match values {
                Ok(values) => {
                    if let Some(width) = rows.first().map(Vec::len) {
                        if values.len() != width {
                            warn!(
                                "skipping line {}: expected {} fields, found {}",
                                i + 1,
                                width,
                                values.len()
                            );
                            continue;
                        }
                    }
                    rows.push(values);
                }
                Err(e) => warn!("skipping line {}: {}", i + 1, e),
            }
        }

        debug!("loaded {} rows", rows.len());
        Self::new(&rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of columns including the target.
    pub fn n_attributes(&self) -> usize {
        self.features.ncols() + 1
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn target(&self) -> &Vector {
        &self.target
    }

    /// Full row `i`, target last.
    pub fn row(&self, i: usize) -> Vec<f64> {
        let mut row = self.features.row(i).to_vec();
        row.push(self.target[i]);
        row
    }

    /// Sub-table made of the given rows, in the given order. May be empty.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            target: self.target.select(Axis(0), indices),
        }
    }

    /// Same target, different feature matrix of the same row count.
    pub(crate) fn with_features(&self, features: Matrix) -> Self {
        debug_assert_eq!(features.nrows(), self.n_rows());
        Self {
            features,
            target: self.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_table_creation() {
        let table = Table::new(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_attributes(), 3);
        assert_eq!(table.n_features(), 2);
        assert_eq!(table.features(), &array![[1.0, 2.0], [4.0, 5.0]]);
        assert_eq!(table.target(), &array![3.0, 6.0]);
        assert_eq!(table.row(1), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_ragged_rows() {
        let result = Table::new(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0]]);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_empty_table() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(Table::new(&rows), Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_non_finite_value() {
        let result = Table::new(&[[1.0, 2.0], [f64::NAN, 3.0]]);
        assert!(matches!(
            result,
            Err(Error::NonFiniteValue { row: 1, column: 0 })
        ));
    }

    #[test]
    fn test_select() {
        let table = Table::new(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]).unwrap();
        let sub = table.select(&[2, 0]);
        assert_eq!(sub.features(), &array![[3.0], [1.0]]);
        assert_eq!(sub.target(), &array![30.0, 10.0]);
        assert_eq!(table.select(&[]).n_rows(), 0);
    }

    #[test]
    fn test_from_reader_skips_bad_lines() {
        let text = "a;b;target\n1.0;2.0;3.0\n\nx;2.0;3.0\n4.0;5.0\n7.0;8.0;15.0\n";
        let table = Table::from_reader(text.as_bytes(), ';').unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.target(), &array![3.0, 15.0]);
    }

    #[test]
    fn test_from_reader_header_only() {
        let text = "a,b,target\n";
        assert!(matches!(
            Table::from_reader(text.as_bytes(), ','),
            Err(Error::EmptyDataset)
        ));
    }
}
