use std::collections::HashSet;
use std::io::Read;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{SelectError, SplitSettings};

/// A named numeric column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Table of equally long, uniquely named `f64` columns.
///
/// # Example
/// ```
/// use l1_select::{Column, Frame};
/// let frame = Frame::new(vec![
///     Column::new("sqft_living", vec![1180.0, 2570.0]),
///     Column::new("price", vec![221_900.0, 538_000.0]),
/// ])
/// .unwrap();
/// assert_eq!(frame.n_rows(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Build a frame, rejecting ragged or duplicated columns.
    pub fn new(columns: Vec<Column>) -> Result<Self, SelectError> {
        let mut frame = Self::default();
        for column in columns {
            frame.add_column(column)?;
        }
        Ok(frame)
    }

    /// Read the requested columns from a headed CSV stream.
    ///
    /// Other columns (ids, dates, zip codes) are ignored. Every requested cell
    /// must parse as `f64`.
    pub fn read_csv<R: Read>(reader: R, columns: &[&str]) -> Result<Self, SelectError> {
        if columns.is_empty() {
            return Err(SelectError::EmptyInput);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut positions = Vec::with_capacity(columns.len());
        for &name in columns {
            let idx = headers
                .iter()
                .position(|h| h.trim_matches('"') == name)
                .ok_or_else(|| SelectError::UnknownColumn(name.to_string()))?;
            positions.push(idx);
        }

        let mut values: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for (slot, &idx) in positions.iter().enumerate() {
                let raw = record.get(idx).unwrap_or("");
                let parsed = raw.trim_matches('"').parse::<f64>().map_err(|_| {
                    SelectError::Parse {
                        column: columns[slot].to_string(),
                        row,
                        value: raw.to_string(),
                    }
                })?;
                values[slot].push(parsed);
            }
        }

        Self::new(
            columns
                .iter()
                .zip(values)
                .map(|(&name, vals)| Column::new(name, vals))
                .collect(),
        )
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&[f64], SelectError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| SelectError::UnknownColumn(name.to_string()))
    }

    /// Append a column; its length must match the frame's row count.
    pub fn add_column(&mut self, column: Column) -> Result<(), SelectError> {
        if self.has_column(&column.name) {
            return Err(SelectError::DuplicateColumn(column.name));
        }
        if !self.columns.is_empty() && column.values.len() != self.n_rows() {
            return Err(SelectError::LengthMismatch);
        }
        self.columns.push(column);
        Ok(())
    }

    /// Derive a new column by mapping an existing one elementwise.
    pub fn derive_column<F>(&mut self, source: &str, name: &str, f: F) -> Result<(), SelectError>
    where
        F: Fn(f64) -> f64,
    {
        let values = self.column(source)?.iter().map(|&v| f(v)).collect();
        self.add_column(Column::new(name, values))
    }

    /// Design matrix with one column per feature, in the given order.
    pub fn design(&self, features: &[String]) -> Result<Array2<f64>, SelectError> {
        let n = self.n_rows();
        let mut x = Array2::<f64>::zeros((n, features.len()));
        for (j, name) in features.iter().enumerate() {
            let col = self.column(name)?;
            for (i, &v) in col.iter().enumerate() {
                x[[i, j]] = v;
            }
        }
        Ok(x)
    }

    pub fn target(&self, name: &str) -> Result<Array1<f64>, SelectError> {
        Ok(Array1::from(self.column(name)?.to_vec()))
    }

    /// New frame holding only `rows`, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self, SelectError> {
        let n = self.n_rows();
        if let Some(&bad) = rows.iter().find(|&&r| r >= n) {
            return Err(SelectError::InvalidConfig(format!(
                "row index {} out of range for {} rows",
                bad, n
            )));
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), rows.iter().map(|&r| c.values[r]).collect()))
            .collect();
        Ok(Self { columns })
    }

    /// Partition rows in two: each row lands in the first part when a seeded
    /// uniform draw falls below `fraction`.
    pub fn random_split(&self, fraction: f64, seed: u64) -> Result<(Self, Self), SelectError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SelectError::InvalidConfig(format!(
                "split fraction {} must lie in [0, 1]",
                fraction
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut first = Vec::new();
        let mut second = Vec::new();
        for row in 0..self.n_rows() {
            if rng.gen::<f64>() < fraction {
                first.push(row);
            } else {
                second.push(row);
            }
        }
        Ok((self.select_rows(&first)?, self.select_rows(&second)?))
    }
}

/// Disjoint training / validation / testing partitions of one dataset.
#[derive(Clone, Debug)]
pub struct DatasetSplit {
    pub training: Frame,
    pub validation: Frame,
    pub testing: Frame,
}

/// Two-stage seeded split: hold out the test rows, then halve the remainder.
pub fn split_three_way(frame: &Frame, settings: &SplitSettings) -> Result<DatasetSplit, SelectError> {
    if frame.is_empty() {
        return Err(SelectError::EmptyInput);
    }
    let (kept, testing) = frame.random_split(settings.holdout_fraction, settings.seed)?;
    let (training, validation) = kept.random_split(settings.train_fraction, settings.seed)?;
    log::debug!(
        "split {} rows into {} training / {} validation / {} testing",
        frame.n_rows(),
        training.n_rows(),
        validation.n_rows(),
        testing.n_rows()
    );
    Ok(DatasetSplit {
        training,
        validation,
        testing,
    })
}

/// Check a feature list against a frame before any fitting happens.
///
/// # Errors
/// Returns `SelectError::EmptyInput` for an empty list, `DuplicateFeature` for
/// repeated names and `UnknownColumn` for names missing from `frame`.
pub fn validate_features(frame: &Frame, features: &[String]) -> Result<(), SelectError> {
    if features.is_empty() {
        return Err(SelectError::EmptyInput);
    }
    let mut seen = HashSet::with_capacity(features.len());
    for name in features {
        if !seen.insert(name.as_str()) {
            return Err(SelectError::DuplicateFeature(name.clone()));
        }
        if !frame.has_column(name) {
            return Err(SelectError::UnknownColumn(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_frame() -> Frame {
        Frame::new(vec![
            Column::new("a", vec![1.0, 2.0, 3.0, 4.0]),
            Column::new("b", vec![10.0, 20.0, 30.0, 40.0]),
            Column::new("y", vec![0.5, 1.5, 2.5, 3.5]),
        ])
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = Frame::new(vec![
            Column::new("a", vec![1.0, 2.0]),
            Column::new("b", vec![1.0]),
        ]);
        assert!(matches!(result, Err(SelectError::LengthMismatch)));
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        let result = Frame::new(vec![
            Column::new("a", vec![1.0]),
            Column::new("a", vec![2.0]),
        ]);
        assert!(matches!(result, Err(SelectError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn test_design_follows_feature_order() {
        let frame = small_frame();
        let x = frame.design(&names(&["b", "a"])).unwrap();
        assert_eq!(x.shape(), &[4, 2]);
        assert_eq!(x[[0, 0]], 10.0);
        assert_eq!(x[[0, 1]], 1.0);
        assert_eq!(x[[3, 0]], 40.0);
    }

    #[test]
    fn test_design_unknown_column() {
        let frame = small_frame();
        let result = frame.design(&names(&["a", "missing"]));
        assert!(matches!(result, Err(SelectError::UnknownColumn(name)) if name == "missing"));
    }

    #[test]
    fn test_derive_column() {
        let mut frame = small_frame();
        frame.derive_column("a", "a_square", |v| v * v).unwrap();
        assert_eq!(frame.column("a_square").unwrap(), &[1.0, 4.0, 9.0, 16.0]);
    }

    #[test]
    fn test_select_rows_out_of_range() {
        let frame = small_frame();
        assert!(matches!(
            frame.select_rows(&[0, 9]),
            Err(SelectError::InvalidConfig(_))
        ));
        let picked = frame.select_rows(&[3, 1]).unwrap();
        assert_eq!(picked.column("a").unwrap(), &[4.0, 2.0]);
    }

    #[test]
    fn test_random_split_is_disjoint_and_seeded() {
        let values: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let frame = Frame::new(vec![Column::new("id", values)]).unwrap();

        let (a1, b1) = frame.random_split(0.7, 1).unwrap();
        let (a2, b2) = frame.random_split(0.7, 1).unwrap();
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert_eq!(a1.n_rows() + b1.n_rows(), 200);

        let left: HashSet<u64> = a1.column("id").unwrap().iter().map(|v| *v as u64).collect();
        assert!(b1
            .column("id")
            .unwrap()
            .iter()
            .all(|v| !left.contains(&(*v as u64))));
        // 0.7 of 200 rows, loosely
        assert!(a1.n_rows() > 100 && a1.n_rows() < 180);
    }

    #[test]
    fn test_random_split_rejects_bad_fraction() {
        let frame = small_frame();
        assert!(matches!(
            frame.random_split(1.5, 1),
            Err(SelectError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_split_three_way_covers_all_rows() {
        let values: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let frame = Frame::new(vec![Column::new("id", values)]).unwrap();
        let split = split_three_way(&frame, &SplitSettings::default()).unwrap();
        let total = split.training.n_rows() + split.validation.n_rows() + split.testing.n_rows();
        assert_eq!(total, 500);
        assert!(split.testing.n_rows() < split.training.n_rows());
    }

    #[test]
    fn test_validate_features() {
        let frame = small_frame();
        assert!(validate_features(&frame, &names(&["a", "b"])).is_ok());
        assert!(matches!(
            validate_features(&frame, &[]),
            Err(SelectError::EmptyInput)
        ));
        assert!(matches!(
            validate_features(&frame, &names(&["a", "a"])),
            Err(SelectError::DuplicateFeature(_))
        ));
        assert!(matches!(
            validate_features(&frame, &names(&["a", "z"])),
            Err(SelectError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_read_csv_selects_columns() {
        let csv = "id,date,price,bedrooms\n\
                   7129300520,20141013T000000,221900,3\n\
                   6414100192,20141209T000000,538000,3\n";
        let frame = Frame::read_csv(csv.as_bytes(), &["bedrooms", "price"]).unwrap();
        assert_eq!(frame.column_names(), vec!["bedrooms", "price"]);
        assert_eq!(frame.column("price").unwrap(), &[221_900.0, 538_000.0]);
    }

    #[test]
    fn test_read_csv_reports_bad_cell() {
        let csv = "price,floors\n221900,1\n538000,two\n";
        let err = Frame::read_csv(csv.as_bytes(), &["price", "floors"]).unwrap_err();
        match err {
            SelectError::Parse { column, row, value } => {
                assert_eq!(column, "floors");
                assert_eq!(row, 1);
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_csv_missing_column() {
        let csv = "price\n1\n";
        let result = Frame::read_csv(csv.as_bytes(), &["price", "view"]);
        assert!(matches!(result, Err(SelectError::UnknownColumn(name)) if name == "view"));
    }
}
