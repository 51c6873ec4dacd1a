//! # l1_select
//!
//! Cardinality-constrained selection of an L1 (LASSO) penalty.
//!
//! Given a fitting oracle, a training/validation split and a target number of
//! nonzero weights `k`, the crate finds the penalty whose model keeps exactly
//! `k` features and has the lowest validation RSS among the sampled penalties:
//!
//! * **Bracket**: sweep a coarse, increasing penalty range and locate where the
//!   nonzero count crosses `k`
//! * **Refine**: sample the bracket evenly, keep exact-`k` models, pick the
//!   lowest validation RSS (ties go to the smaller penalty)
//!
//! Fitting is delegated to a [`FittingOracle`]; [`ElasticNetOracle`] wraps
//! `linfa-elasticnet`.
//!
//! ## Example
//!
//! ```no_run
//! use l1_select::{
//!     housing_features, load_housing_split, select_l1_penalty, ElasticNetOracle,
//!     SparsitySearch, HOUSING_TARGET,
//! };
//!
//! let file = std::fs::File::open("kc_house_data.csv").unwrap();
//! let split = load_housing_split(file).unwrap();
//! let result = select_l1_penalty(
//!     &ElasticNetOracle::default(),
//!     &split.training,
//!     &split.validation,
//!     &housing_features(),
//!     HOUSING_TARGET,
//!     &SparsitySearch::default(),
//! )
//! .unwrap();
//!
//! println!("l1 penalty {:e}: {}", result.penalty, result.coefficients.to_formula(true));
//! ```

// Module declarations
pub mod data;
mod defaults;
mod format;
mod grid;
pub mod housing;
pub mod ols;
pub mod oracle;
mod select;
pub mod synthetic;
mod types;

// Re-export public types
pub use data::{Column, DatasetSplit, Frame};
pub use oracle::{ElasticNetOracle, FittingOracle};
pub use synthetic::SyntheticSettings;
pub use types::{
    Bracket, CoefficientVector, FeatureWeight, OlsFit, OlsOptions, PenaltyEvaluation,
    SearchResult, SelectError, SparsitySearch, SplitSettings,
};

// Re-export main public functions
pub use data::{split_three_way, validate_features};
pub use format::format_linear_model;
pub use grid::{lin_space, log_space};
pub use housing::{housing_features, load_housing, load_housing_split, HOUSING_TARGET};
pub use ols::fit_ols;
pub use oracle::{count_nonzero, predict, rss};
pub use select::{
    bracket_penalties, refine_penalties, select_l1_penalty, sweep_validation_rss, Candidate,
};
pub use synthetic::correlated_frame;
