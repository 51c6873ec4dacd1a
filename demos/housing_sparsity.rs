use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use l1_select::{
    housing_features, load_housing, log_space, rss, select_l1_penalty, split_three_way,
    sweep_validation_rss, ElasticNetOracle, SparsitySearch, SplitSettings, HOUSING_TARGET,
};

#[derive(Parser)]
#[command(about = "Pick a LASSO penalty for the King County house-sales data")]
struct Args {
    /// Sales CSV with a header row
    csv: PathBuf,
    /// Number of nonzero weights to keep
    #[arg(long, default_value = "7")]
    nonzero: usize,
    /// Count the intercept towards --nonzero
    #[arg(long)]
    count_intercept: bool,
    /// Log10 bounds of the coarse penalty range
    #[arg(long, default_value = "8")]
    log_start: f64,
    #[arg(long, default_value = "10")]
    log_end: f64,
    #[arg(long, default_value = "20")]
    coarse_points: usize,
    #[arg(long, default_value = "20")]
    fine_samples: usize,
    /// Write the search result as JSON here
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let frame = load_housing(File::open(&args.csv)?)?;
    let split = split_three_way(&frame, &SplitSettings::default())?;
    let features = housing_features();
    let oracle = ElasticNetOracle::default();

    println!("Validation sweep over 1e1..1e7:");
    let sweep = sweep_validation_rss(
        &oracle,
        &split.training,
        &split.validation,
        &features,
        HOUSING_TARGET,
        &log_space(1.0, 7.0, 13),
    )?;
    for eval in &sweep.evaluations {
        println!(
            "  l1={:>12.4e}  nnz={:>2}  RSS={:.4e}",
            eval.penalty, eval.nonzero_count, eval.validation_rss
        );
    }
    println!(
        "Best l1={:e}, test RSS={:.4e}",
        sweep.penalty,
        rss(&sweep.coefficients, &split.testing, HOUSING_TARGET)?
    );

    let search = SparsitySearch {
        target_nonzero: args.nonzero,
        coarse_range: log_space(args.log_start, args.log_end, args.coarse_points),
        fine_samples: args.fine_samples,
        count_intercept: args.count_intercept,
    };
    let result = select_l1_penalty(
        &oracle,
        &split.training,
        &split.validation,
        &features,
        HOUSING_TARGET,
        &search,
    )?;

    if let Some(bracket) = result.bracket {
        println!(
            "Bracket: [{:e}, {:e}]",
            bracket.penalty_min, bracket.penalty_max
        );
    }
    println!(
        "Selected l1={:e} with {} nonzeros, validation RSS={:.4e}",
        result.penalty,
        result.coefficients.sparsity(search.count_intercept),
        result.validation_rss
    );
    println!("Features: {:?}", result.coefficients.nonzero_features());
    println!("Model: {}", result.coefficients.to_formula(true));

    if let Some(path) = args.json {
        serde_json::to_writer_pretty(File::create(path)?, &result)?;
    }
    Ok(())
}
