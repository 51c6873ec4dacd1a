//! King County house-sales schema and feature engineering.

use std::io::Read;

use crate::data::{split_three_way, DatasetSplit, Frame};
use crate::types::{SelectError, SplitSettings};

pub const HOUSING_TARGET: &str = "price";

/// Raw columns read from the sales CSV.
pub const HOUSING_COLUMNS: [&str; 14] = [
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "waterfront",
    "view",
    "condition",
    "grade",
    "sqft_above",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "price",
];

/// Regression inputs, derived columns placed next to their source.
pub const HOUSING_FEATURES: [&str; 17] = [
    "bedrooms",
    "bedrooms_square",
    "bathrooms",
    "sqft_living",
    "sqft_living_sqrt",
    "sqft_lot",
    "sqft_lot_sqrt",
    "floors",
    "floors_square",
    "waterfront",
    "view",
    "condition",
    "grade",
    "sqft_above",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
];

pub fn housing_features() -> Vec<String> {
    HOUSING_FEATURES.iter().map(|s| s.to_string()).collect()
}

/// Append `sqft_living_sqrt`, `sqft_lot_sqrt`, `bedrooms_square` and
/// `floors_square`.
pub fn add_housing_features(frame: &mut Frame) -> Result<(), SelectError> {
    frame.derive_column("sqft_living", "sqft_living_sqrt", f64::sqrt)?;
    frame.derive_column("sqft_lot", "sqft_lot_sqrt", f64::sqrt)?;
    frame.derive_column("bedrooms", "bedrooms_square", |v| v * v)?;
    frame.derive_column("floors", "floors_square", |v| v * v)?;
    Ok(())
}

/// Read the sales CSV and add the derived columns.
pub fn load_housing<R: Read>(reader: R) -> Result<Frame, SelectError> {
    let mut frame = Frame::read_csv(reader, &HOUSING_COLUMNS)?;
    add_housing_features(&mut frame)?;
    log::info!(
        "loaded {} housing rows with {} columns",
        frame.n_rows(),
        frame.n_columns()
    );
    Ok(frame)
}

/// Load and partition with the reference 90/10 then 50/50 split, seed 1.
pub fn load_housing_split<R: Read>(reader: R) -> Result<DatasetSplit, SelectError> {
    let frame = load_housing(reader)?;
    split_three_way(&frame, &SplitSettings::default())
}
