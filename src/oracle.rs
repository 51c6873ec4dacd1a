use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_elasticnet::ElasticNet;
use serde::{Deserialize, Serialize};

use crate::data::{validate_features, Frame};
use crate::defaults::{DEFAULT_SOLVER_MAX_ITER, DEFAULT_SOLVER_TOL};
use crate::ols::least_squares;
use crate::types::{CoefficientVector, FeatureWeight, SelectError};

/// Anything that can fit a penalized linear model on a frame.
///
/// The penalties are on the raw objective
/// `RSS + l1_penalty * ||w||_1 + l2_penalty * ||w||_2^2`, intercept unpenalized.
/// The returned weights must follow `features` order.
///
/// Implementations report their own failures through
/// [`SelectError::Oracle`]; callers propagate them untouched.
pub trait FittingOracle {
    fn fit(
        &self,
        rows: &Frame,
        target: &str,
        features: &[String],
        l1_penalty: f64,
        l2_penalty: f64,
    ) -> Result<CoefficientVector, SelectError>;
}

impl<T: FittingOracle + ?Sized> FittingOracle for &T {
    fn fit(
        &self,
        rows: &Frame,
        target: &str,
        features: &[String],
        l1_penalty: f64,
        l2_penalty: f64,
    ) -> Result<CoefficientVector, SelectError> {
        (**self).fit(rows, target, features, l1_penalty, l2_penalty)
    }
}

/// Oracle backed by `linfa-elasticnet`, with `linfa-linear` for unpenalized fits.
///
/// linfa minimises `1/(2n) RSS + a (r ||w||_1 + (1 - r)/2 ||w||_2^2)`, so the
/// raw penalties are rescaled with `a = l1/(2n) + l2/n` and `r = l1/(2n) / a`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElasticNetOracle {
    pub intercept: bool,
    /// Duality-gap tolerance handed to the solver.
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for ElasticNetOracle {
    fn default() -> Self {
        Self {
            intercept: true,
            tolerance: DEFAULT_SOLVER_TOL,
            max_iterations: DEFAULT_SOLVER_MAX_ITER,
        }
    }
}

impl ElasticNetOracle {
    fn solver_penalties(l1_penalty: f64, l2_penalty: f64, n: usize) -> (f64, f64) {
        let n_f = n as f64;
        let l1_part = l1_penalty / (2.0 * n_f);
        let l2_part = l2_penalty / n_f;
        let strength = l1_part + l2_part;
        if strength <= 0.0 {
            return (0.0, 1.0);
        }
        (strength, l1_part / strength)
    }
}

impl FittingOracle for ElasticNetOracle {
    fn fit(
        &self,
        rows: &Frame,
        target: &str,
        features: &[String],
        l1_penalty: f64,
        l2_penalty: f64,
    ) -> Result<CoefficientVector, SelectError> {
        for (label, value) in [("l1", l1_penalty), ("l2", l2_penalty)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SelectError::InvalidConfig(format!(
                    "{} penalty must be finite and non-negative, got {}",
                    label, value
                )));
            }
        }
        validate_features(rows, features)?;
        if rows.is_empty() {
            return Err(SelectError::EmptyInput);
        }

        let x = rows.design(features)?;
        let y = rows.target(target)?;
        let (strength, l1_ratio) = Self::solver_penalties(l1_penalty, l2_penalty, x.nrows());

        if strength == 0.0 {
            let (beta, intercept) = least_squares(x, y, self.intercept)?;
            return CoefficientVector::from_parts(features, &beta, intercept);
        }

        let dataset = Dataset::new(x, y);
        let fitted = ElasticNet::<f64>::params()
            .penalty(strength)
            .l1_ratio(l1_ratio)
            .with_intercept(self.intercept)
            .tolerance(self.tolerance)
            .max_iterations(self.max_iterations)
            .fit(&dataset)
            .map_err(|e| SelectError::Linalg(format!("{:?}", e)))?;

        let beta = fitted.hyperplane().to_vec();
        let intercept = if self.intercept {
            fitted.intercept()
        } else {
            0.0
        };
        CoefficientVector::from_parts(features, &beta, intercept)
    }
}

/// Number of weights that are exactly nonzero.
///
/// No tolerance is applied: a solver that leaves `1e-300` behind has kept the
/// feature.
pub fn count_nonzero(weights: &[FeatureWeight]) -> usize {
    weights.iter().filter(|w| w.weight != 0.0).count()
}

/// Predictions `intercept + sum(weight * x)` for every row, in row order.
pub fn predict(model: &CoefficientVector, rows: &Frame) -> Result<Vec<f64>, SelectError> {
    let mut predictions = vec![model.intercept; rows.n_rows()];
    for w in model.weights.iter() {
        let col = rows.column(&w.name)?;
        if w.weight == 0.0 {
            continue;
        }
        for (p, &x) in predictions.iter_mut().zip(col.iter()) {
            *p += w.weight * x;
        }
    }
    Ok(predictions)
}

/// Residual sum of squares of `model` against the `target` column.
pub fn rss(model: &CoefficientVector, rows: &Frame, target: &str) -> Result<f64, SelectError> {
    let actual = rows.column(target)?;
    let predicted = predict(model, rows)?;
    Ok(predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| {
            let diff = p - a;
            diff * diff
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// y = 5 + 3*a - 2*b, c is pure noise.
    fn sparse_signal() -> Frame {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 120;
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        let mut c = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        for _ in 0..n {
            let va: f64 = rng.gen_range(-1.0..1.0);
            let vb: f64 = rng.gen_range(-1.0..1.0);
            let vc: f64 = rng.gen_range(-1.0..1.0);
            a.push(va);
            b.push(vb);
            c.push(vc);
            y.push(5.0 + 3.0 * va - 2.0 * vb + 0.01 * rng.gen_range(-1.0..1.0));
        }
        Frame::new(vec![
            Column::new("a", a),
            Column::new("b", b),
            Column::new("c", c),
            Column::new("y", y),
        ])
        .unwrap()
    }

    #[test]
    fn test_count_nonzero_exact_zero_only() {
        let weights = vec![
            FeatureWeight::new("a", 0.0),
            FeatureWeight::new("b", -0.0),
            FeatureWeight::new("c", 1e-300),
            FeatureWeight::new("d", -4.0),
        ];
        assert_eq!(count_nonzero(&weights), 2);
    }

    #[test]
    fn test_predict_and_rss() {
        let frame = Frame::new(vec![
            Column::new("x", vec![1.0, 2.0, 3.0]),
            Column::new("z", vec![9.0, 9.0, 9.0]),
            Column::new("y", vec![3.0, 5.0, 8.0]),
        ])
        .unwrap();
        let model = CoefficientVector {
            weights: vec![FeatureWeight::new("x", 2.0), FeatureWeight::new("z", 0.0)],
            intercept: 1.0,
        };
        assert_eq!(predict(&model, &frame).unwrap(), vec![3.0, 5.0, 7.0]);
        assert!((rss(&model, &frame, "y").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_predict_unknown_feature() {
        let frame = Frame::new(vec![Column::new("x", vec![1.0])]).unwrap();
        let model = CoefficientVector {
            weights: vec![FeatureWeight::new("w", 1.0)],
            intercept: 0.0,
        };
        assert!(matches!(
            predict(&model, &frame),
            Err(SelectError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_solver_penalty_mapping() {
        let (strength, ratio) = ElasticNetOracle::solver_penalties(200.0, 0.0, 100);
        assert!((strength - 1.0).abs() < 1e-12);
        assert!((ratio - 1.0).abs() < 1e-12);

        let (strength, ratio) = ElasticNetOracle::solver_penalties(200.0, 100.0, 100);
        assert!((strength - 2.0).abs() < 1e-12);
        assert!((ratio - 0.5).abs() < 1e-12);

        assert_eq!(ElasticNetOracle::solver_penalties(0.0, 0.0, 10).0, 0.0);
    }

    #[test]
    fn test_unpenalized_fit_matches_ols() {
        let frame = sparse_signal();
        let model = ElasticNetOracle::default()
            .fit(&frame, "y", &names(&["a", "b", "c"]), 0.0, 0.0)
            .unwrap();
        assert_eq!(model.weights.len(), 3);
        assert!((model.weights[0].weight - 3.0).abs() < 0.05);
        assert!((model.weights[1].weight + 2.0).abs() < 0.05);
        assert!((model.intercept - 5.0).abs() < 0.05);
    }

    #[test]
    fn test_lasso_drops_noise_feature() {
        let frame = sparse_signal();
        let features = names(&["a", "b", "c"]);
        // l1 / (2n) = 0.1 on the solver scale
        let model = ElasticNetOracle::default()
            .fit(&frame, "y", &features, 24.0, 0.0)
            .unwrap();
        assert_eq!(model.weights[2].weight, 0.0);
        assert_eq!(model.nonzero_count(), 2);
    }

    #[test]
    fn test_huge_penalty_zeroes_everything() {
        let frame = sparse_signal();
        let model = ElasticNetOracle::default()
            .fit(&frame, "y", &names(&["a", "b", "c"]), 1e9, 0.0)
            .unwrap();
        assert_eq!(model.nonzero_count(), 0);
    }

    #[test]
    fn test_rejects_negative_penalty() {
        let frame = sparse_signal();
        let result = ElasticNetOracle::default().fit(&frame, "y", &names(&["a"]), -1.0, 0.0);
        assert!(matches!(result, Err(SelectError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_duplicate_features() {
        let frame = sparse_signal();
        let result = ElasticNetOracle::default().fit(&frame, "y", &names(&["a", "a"]), 1.0, 0.0);
        assert!(matches!(result, Err(SelectError::DuplicateFeature(_))));
    }
}
