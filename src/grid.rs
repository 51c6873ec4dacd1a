//! Penalty grid builders.

/// `num` points spaced evenly on a log10 scale from `10^start` to `10^end`.
///
/// Endpoints are exact powers of ten when `start`/`end` are integers.
pub fn log_space(start: f64, end: f64, num: usize) -> Vec<f64> {
    lin_space(start, end, num)
        .into_iter()
        .map(|exp| 10f64.powf(exp))
        .collect()
}

/// `num` evenly spaced points over the closed interval `[start, end]`.
///
/// The last point is `end` exactly, so a bracket endpoint is never lost to
/// rounding.
pub fn lin_space(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num as f64 - 1.0);
            let mut grid: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            grid[num - 1] = end;
            grid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lin_space_endpoints_and_step() {
        let grid = lin_space(2.0, 4.0, 5);
        assert_eq!(grid, vec![2.0, 2.5, 3.0, 3.5, 4.0]);
    }

    #[test]
    fn test_lin_space_degenerate_counts() {
        assert!(lin_space(1.0, 2.0, 0).is_empty());
        assert_eq!(lin_space(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn test_lin_space_keeps_awkward_end_exact() {
        let start = 2.976_351_441_631_313e9;
        let end = 3.792_690_190_732_254e9;
        let grid = lin_space(start, end, 20);
        assert_eq!(grid[0], start);
        assert_eq!(grid[19], end);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_log_space_reference_grid() {
        let grid = log_space(8.0, 10.0, 20);
        assert_eq!(grid.len(), 20);
        assert!((grid[0] - 1e8).abs() < 1e-3);
        assert!((grid[19] - 1e10).abs() < 1e-1);
        // bracket edges of the reference housing run
        assert!((grid[15] / 3.792_690_190_732_254e9 - 1.0).abs() < 1e-12);
        assert!((grid[14] / 2.976_351_441_631_313e9 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_space_notebook_sweep() {
        let grid = log_space(1.0, 7.0, 13);
        assert_eq!(grid.len(), 13);
        assert!((grid[2] - 100.0).abs() < 1e-9);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
    }
}
