use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_COARSE_LOG_END, DEFAULT_COARSE_LOG_START, DEFAULT_COARSE_POINTS,
    DEFAULT_FINE_SAMPLES, DEFAULT_HOLDOUT_FRACTION, DEFAULT_SPLIT_SEED, DEFAULT_TARGET_NONZERO,
    DEFAULT_TRAIN_FRACTION,
};
use crate::grid::log_space;

/// One named regression weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub name: String,
    pub weight: f64,
}

impl FeatureWeight {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Fitted linear model: ordered (feature, weight) pairs plus an intercept.
///
/// `nonzero_count` ignores the intercept; see [`CoefficientVector::sparsity`].
///
/// # Example
/// ```
/// use l1_select::{CoefficientVector, FeatureWeight};
/// let model = CoefficientVector {
///     weights: vec![FeatureWeight::new("sqft_living", 250.0), FeatureWeight::new("view", 0.0)],
///     intercept: 12_000.0,
/// };
/// assert_eq!(model.nonzero_count(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoefficientVector {
    pub weights: Vec<FeatureWeight>,
    pub intercept: f64,
}

impl CoefficientVector {
    /// Pair `values` with `names` in order.
    pub fn from_parts(names: &[String], values: &[f64], intercept: f64) -> Result<Self, SelectError> {
        if names.len() != values.len() {
            return Err(SelectError::LengthMismatch);
        }
        let weights = names
            .iter()
            .zip(values.iter())
            .map(|(name, &weight)| FeatureWeight::new(name.clone(), weight))
            .collect();
        Ok(Self { weights, intercept })
    }

    /// Number of weights that are exactly nonzero.
    pub fn nonzero_count(&self) -> usize {
        crate::oracle::count_nonzero(&self.weights)
    }

    /// Names of the features with a nonzero weight, in model order.
    pub fn nonzero_features(&self) -> Vec<&str> {
        self.weights
            .iter()
            .filter(|w| w.weight != 0.0)
            .map(|w| w.name.as_str())
            .collect()
    }

    /// Sparsity as the search sees it: [`nonzero_count`](Self::nonzero_count),
    /// plus one for a nonzero intercept when `count_intercept` is set.
    pub fn sparsity(&self, count_intercept: bool) -> usize {
        self.nonzero_count() + usize::from(count_intercept && self.intercept != 0.0)
    }

    pub fn names(&self) -> Vec<String> {
        self.weights.iter().map(|w| w.name.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.weights.iter().map(|w| w.weight).collect()
    }
}

/// Penalty interval that straddles the target sparsity.
///
/// `penalty_min` is still too dense, `penalty_max` already too sparse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub penalty_min: f64,
    pub penalty_max: f64,
}

/// Outcome of fitting one penalty and scoring it on the validation rows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PenaltyEvaluation {
    pub penalty: f64,
    pub nonzero_count: usize,
    pub validation_rss: f64,
}

/// Chosen penalty with its model and score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub penalty: f64,
    pub coefficients: CoefficientVector,
    pub validation_rss: f64,
    /// Present when the result came from the bracket-and-refine search.
    pub bracket: Option<Bracket>,
    /// Every evaluated candidate, in increasing penalty order.
    pub evaluations: Vec<PenaltyEvaluation>,
}

/// Settings for the cardinality-constrained penalty search.
///
/// # Example
/// ```
/// use l1_select::{log_space, SparsitySearch};
/// let search = SparsitySearch {
///     target_nonzero: 7,
///     coarse_range: log_space(8.0, 10.0, 20),
///     fine_samples: 20,
///     count_intercept: false,
/// };
/// assert_eq!(search.coarse_range.len(), 20);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SparsitySearch {
    /// Desired number of nonzero weights.
    pub target_nonzero: usize,
    /// Strictly increasing candidate penalties for the bracketing pass.
    pub coarse_range: Vec<f64>,
    /// Evenly spaced samples taken inside the bracket (endpoints included).
    pub fine_samples: usize,
    /// Count a nonzero intercept towards `target_nonzero`. Default: false.
    #[serde(default)]
    pub count_intercept: bool,
}

impl Default for SparsitySearch {
    fn default() -> Self {
        Self {
            target_nonzero: DEFAULT_TARGET_NONZERO,
            coarse_range: log_space(
                DEFAULT_COARSE_LOG_START,
                DEFAULT_COARSE_LOG_END,
                DEFAULT_COARSE_POINTS,
            ),
            fine_samples: DEFAULT_FINE_SAMPLES,
            count_intercept: false,
        }
    }
}

/// Fractions and seed for the train / validation / test partition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitSettings {
    /// Share of rows kept out of the test set.
    pub holdout_fraction: f64,
    /// Share of the kept rows that become training rows; the rest validate.
    pub train_fraction: f64,
    pub seed: u64,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            holdout_fraction: DEFAULT_HOLDOUT_FRACTION,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

/// Options for plain OLS fits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OlsOptions {
    /// Fit an intercept term. Default: true.
    pub intercept: bool,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self { intercept: true }
    }
}

/// OLS fit with in-sample quality metrics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OlsFit {
    pub coefficients: CoefficientVector,
    /// Root mean squared error on the fitted rows
    pub rmse: f64,
    /// R² on the fitted rows
    pub r2: f64,
    pub n_rows: usize,
}

/// Library error type.
#[derive(thiserror::Error, Debug)]
pub enum SelectError {
    #[error("input lengths mismatch")]
    LengthMismatch,
    #[error("empty input")]
    EmptyInput,
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("column `{0}` appears more than once")]
    DuplicateColumn(String),
    #[error("feature `{0}` listed more than once")]
    DuplicateFeature(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot parse `{value}` in column `{column}` at row {row}")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("linear algebra failure: {0}")]
    Linalg(String),
    #[error(
        "coarse range never crosses {target_nonzero} nonzeros (observed {sparsest}..={densest}); widen the range"
    )]
    BracketNotFound {
        target_nonzero: usize,
        densest: usize,
        sparsest: usize,
    },
    #[error(
        "sparsity is not monotone in the penalty: too-dense {penalty_min:e} is not below too-sparse {penalty_max:e}"
    )]
    NonMonotoneSparsity { penalty_min: f64, penalty_max: f64 },
    /// No refined sample had exactly the target sparsity.
    #[error(
        "no sampled penalty in [{:e}, {:e}] gives exactly {target_nonzero} nonzeros",
        .bracket.penalty_min,
        .bracket.penalty_max
    )]
    NoExactSparsityMatch {
        target_nonzero: usize,
        bracket: Bracket,
    },
    /// Candidates qualified but none scored a finite validation RSS.
    #[error("all {candidates} eligible candidates scored a non-finite validation RSS")]
    NonFiniteValidationRss { candidates: usize },
    #[error("fitting oracle failed: {0}")]
    Oracle(#[source] Box<dyn std::error::Error + Send + Sync>),
}
