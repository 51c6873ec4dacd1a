use linfa::dataset::Dataset;
use linfa::traits::Fit;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};

use crate::data::{validate_features, Frame};
use crate::oracle::rss;
use crate::types::{CoefficientVector, OlsFit, OlsOptions, SelectError};

/// Solve plain least squares with Linfa.
///
/// Returns the weights in column order and the intercept (0.0 when
/// `intercept` is off).
pub(crate) fn least_squares(
    x: Array2<f64>,
    y: Array1<f64>,
    intercept: bool,
) -> Result<(Vec<f64>, f64), SelectError> {
    if x.nrows() != y.len() {
        return Err(SelectError::LengthMismatch);
    }
    if x.nrows() == 0 {
        return Err(SelectError::EmptyInput);
    }
    let dataset = Dataset::new(x, y);
    let fitted = LinearRegression::new()
        .with_intercept(intercept)
        .fit(&dataset)
        .map_err(|e| SelectError::Linalg(format!("{:?}", e)))?;
    let beta = fitted.params().to_vec();
    let b0 = if intercept { fitted.intercept() } else { 0.0 };
    Ok((beta, b0))
}

/// Fit `target` on `features` by ordinary least squares.
///
/// # Arguments
/// * `frame` - Rows to fit on
/// * `target` - Name of the response column
/// * `features` - Regressor columns, in the order the weights are reported
/// * `opts` - OLS fitting options
///
/// # Returns
/// `OlsFit` with the named coefficients and in-sample RMSE / R²
///
/// # Errors
/// Returns errors if the feature list is invalid or linear algebra fails
pub fn fit_ols(
    frame: &Frame,
    target: &str,
    features: &[String],
    opts: &OlsOptions,
) -> Result<OlsFit, SelectError> {
    validate_features(frame, features)?;
    let x = frame.design(features)?;
    let y = frame.target(target)?;
    let rows = x.nrows();

    let (beta, intercept) = least_squares(x, y.clone(), opts.intercept)?;
    let coefficients = CoefficientVector::from_parts(features, &beta, intercept)?;

    let ss_res = rss(&coefficients, frame, target)?;
    let (rmse, r2) = compute_metrics(&y, ss_res);

    Ok(OlsFit {
        coefficients,
        rmse,
        r2,
        n_rows: rows,
    })
}

/// RMSE and R² from the residual sum of squares `ss_res` of a fit to
/// `y_actual`.
pub(crate) fn compute_metrics(y_actual: &Array1<f64>, ss_res: f64) -> (f64, f64) {
    let n = y_actual.len() as f64;
    let y_mean = y_actual.mean().unwrap_or(0.0);
    let ss_tot = y_actual.mapv(|v| (v - y_mean) * (v - y_mean)).sum();
    ((ss_res / n).sqrt(), 1.0 - ss_res / ss_tot.max(1e-12))
}
