use l1_select::{correlated_frame, fit_ols, OlsOptions, SyntheticSettings};

fn main() {
    env_logger::init();

    let features: Vec<String> = vec!["x0".into(), "x1".into(), "x2".into()];
    for correlation in [0.0, 0.5, 0.9, 0.99] {
        let settings = SyntheticSettings {
            correlation,
            ..Default::default()
        };
        let frame = correlated_frame(&settings).unwrap();
        let fit = fit_ols(&frame, "y", &features, &OlsOptions::default()).unwrap();

        println!("rho={correlation:.2}: {}", fit.coefficients.to_formula(false));
        println!("          RMSE={:.4}  R2={:.4}", fit.rmse, fit.r2);
    }
}
