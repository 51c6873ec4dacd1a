//! Seeded generator for regression data with correlated features.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::data::{Column, Frame};
use crate::types::SelectError;

/// Shape of a synthetic dataset.
///
/// Features are `sqrt(rho) * z + sqrt(1 - rho) * e_j` for a shared latent `z`
/// and independent `e_j`, so any two features have correlation `rho`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyntheticSettings {
    pub n_rows: usize,
    /// True weights; one feature per entry.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Pairwise feature correlation, in [0, 1).
    pub correlation: f64,
    pub noise_sd: f64,
    pub seed: u64,
}

impl Default for SyntheticSettings {
    fn default() -> Self {
        Self {
            n_rows: 750,
            coefficients: vec![1.0, 2.0, 3.0],
            intercept: 0.0,
            correlation: 0.9,
            noise_sd: 1.0,
            seed: 0,
        }
    }
}

/// Build a frame with columns `x0..x{p-1}` and target `y`.
pub fn correlated_frame(settings: &SyntheticSettings) -> Result<Frame, SelectError> {
    let p = settings.coefficients.len();
    if p == 0 || settings.n_rows == 0 {
        return Err(SelectError::EmptyInput);
    }
    if !(0.0..1.0).contains(&settings.correlation) {
        return Err(SelectError::InvalidConfig(format!(
            "correlation {} must lie in [0, 1)",
            settings.correlation
        )));
    }
    if settings.noise_sd < 0.0 {
        return Err(SelectError::InvalidConfig(
            "noise_sd must be non-negative".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let shared = settings.correlation.sqrt();
    let own = (1.0 - settings.correlation).sqrt();

    let mut features = vec![Vec::with_capacity(settings.n_rows); p];
    let mut y = Vec::with_capacity(settings.n_rows);
    for _ in 0..settings.n_rows {
        let z: f64 = StandardNormal.sample(&mut rng);
        let mut response = settings.intercept;
        for (j, column) in features.iter_mut().enumerate() {
            let e: f64 = StandardNormal.sample(&mut rng);
            let x = shared * z + own * e;
            response += settings.coefficients[j] * x;
            column.push(x);
        }
        let noise: f64 = StandardNormal.sample(&mut rng);
        y.push(response + settings.noise_sd * noise);
    }

    let mut columns: Vec<Column> = features
        .into_iter()
        .enumerate()
        .map(|(j, values)| Column::new(format!("x{}", j), values))
        .collect();
    columns.push(Column::new("y", y));
    Frame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correlation(a: &[f64], b: &[f64]) -> f64 {
        let n = a.len() as f64;
        let ma = a.iter().sum::<f64>() / n;
        let mb = b.iter().sum::<f64>() / n;
        let mut cov = 0.0;
        let mut va = 0.0;
        let mut vb = 0.0;
        for (x, y) in a.iter().zip(b.iter()) {
            cov += (x - ma) * (y - mb);
            va += (x - ma) * (x - ma);
            vb += (y - mb) * (y - mb);
        }
        cov / (va.sqrt() * vb.sqrt())
    }

    #[test]
    fn test_shape_and_names() {
        let frame = correlated_frame(&SyntheticSettings::default()).unwrap();
        assert_eq!(frame.n_rows(), 750);
        assert_eq!(frame.column_names(), vec!["x0", "x1", "x2", "y"]);
    }

    #[test]
    fn test_seeded_output_repeats() {
        let settings = SyntheticSettings {
            n_rows: 50,
            ..Default::default()
        };
        assert_eq!(
            correlated_frame(&settings).unwrap(),
            correlated_frame(&settings).unwrap()
        );
    }

    #[test]
    fn test_features_are_correlated() {
        let settings = SyntheticSettings {
            n_rows: 4000,
            correlation: 0.8,
            ..Default::default()
        };
        let frame = correlated_frame(&settings).unwrap();
        let r = correlation(frame.column("x0").unwrap(), frame.column("x2").unwrap());
        assert!((r - 0.8).abs() < 0.05, "sample correlation {r}");
    }

    #[test]
    fn test_rejects_bad_correlation() {
        let settings = SyntheticSettings {
            correlation: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            correlated_frame(&settings),
            Err(SelectError::InvalidConfig(_))
        ));
    }
}
