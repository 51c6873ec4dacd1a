//! Human-readable rendering of fitted linear models.

use std::cmp::Ordering;

use crate::defaults::DEFAULT_FORMAT_DECIMALS;
use crate::types::{CoefficientVector, SelectError};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // keep "-0" out of the output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Render `"<intercept> + <coef> * <name> + ..."` with values rounded to three
/// decimals.
///
/// `names` defaults to `X0, X1, ...`. With `sort_by_magnitude` the terms are
/// ordered by descending absolute coefficient, ties keeping input order.
///
/// # Example
/// ```
/// use l1_select::format_linear_model;
/// let text = format_linear_model(&[0.5, -2.0], 1.25, None, true).unwrap();
/// assert_eq!(text, "1.25 + -2 * X1 + 0.5 * X0");
/// ```
pub fn format_linear_model(
    coefficients: &[f64],
    intercept: f64,
    names: Option<&[String]>,
    sort_by_magnitude: bool,
) -> Result<String, SelectError> {
    let labels: Vec<String> = match names {
        Some(names) if names.len() != coefficients.len() => {
            return Err(SelectError::LengthMismatch)
        }
        Some(names) => names.to_vec(),
        None => (0..coefficients.len()).map(|i| format!("X{}", i)).collect(),
    };

    let terms = coefficients
        .iter()
        .copied()
        .zip(labels.iter().map(String::as_str))
        .collect();
    Ok(render_terms(terms, intercept, sort_by_magnitude))
}

fn render_terms(mut terms: Vec<(f64, &str)>, intercept: f64, sort_by_magnitude: bool) -> String {
    if sort_by_magnitude {
        terms.sort_by(|a, b| b.0.abs().partial_cmp(&a.0.abs()).unwrap_or(Ordering::Equal));
    }

    let mut parts = Vec::with_capacity(terms.len() + 1);
    parts.push(format!("{}", round_to(intercept, DEFAULT_FORMAT_DECIMALS)));
    for (coef, name) in terms {
        parts.push(format!(
            "{} * {}",
            round_to(coef, DEFAULT_FORMAT_DECIMALS),
            name
        ));
    }
    parts.join(" + ")
}

impl CoefficientVector {
    /// Formula string for this model; see [`format_linear_model`].
    pub fn to_formula(&self, sort_by_magnitude: bool) -> String {
        let terms = self
            .weights
            .iter()
            .map(|w| (w.weight, w.name.as_str()))
            .collect();
        render_terms(terms, self.intercept, sort_by_magnitude)
    }
}
