//! Default constants for penalty search, dataset splitting and solver limits.

pub const DEFAULT_TARGET_NONZERO: usize = 7;
pub const DEFAULT_COARSE_LOG_START: f64 = 8.0;
pub const DEFAULT_COARSE_LOG_END: f64 = 10.0;
pub const DEFAULT_COARSE_POINTS: usize = 20;
pub const DEFAULT_FINE_SAMPLES: usize = 20;
pub const DEFAULT_SPLIT_SEED: u64 = 1;
pub const DEFAULT_HOLDOUT_FRACTION: f64 = 0.9;
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.5;
pub const DEFAULT_SOLVER_TOL: f64 = 1e-4;
pub const DEFAULT_SOLVER_MAX_ITER: u32 = 1_000;
pub const DEFAULT_FORMAT_DECIMALS: i32 = 3;
