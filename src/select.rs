use crate::data::{validate_features, Frame};
use crate::grid::lin_space;
use crate::oracle::{rss, FittingOracle};
use crate::types::{
    Bracket, CoefficientVector, PenaltyEvaluation, SearchResult, SelectError, SparsitySearch,
};

/// One refined or swept penalty with the model fitted at it.
pub type Candidate = (PenaltyEvaluation, CoefficientVector);

/// Pick the L1 penalty whose model keeps exactly `search.target_nonzero`
/// weights and scores the lowest validation RSS among the sampled penalties.
///
/// Runs [`bracket_penalties`] over `search.coarse_range`, then
/// [`refine_penalties`] over `search.fine_samples` evenly spaced points inside
/// the bracket. Ties on RSS go to the smaller penalty. With
/// `search.count_intercept` a nonzero intercept counts as one more weight.
///
/// # Errors
/// * `BracketNotFound` when the coarse range never crosses the target count
/// * `NonMonotoneSparsity` when the crossing points are out of order
/// * `NoExactSparsityMatch` when no refined sample hits the count exactly
/// * `NonFiniteValidationRss` when every exact match scores NaN or infinity
/// * oracle failures, unchanged
pub fn select_l1_penalty<O: FittingOracle>(
    oracle: &O,
    training: &Frame,
    validation: &Frame,
    features: &[String],
    target: &str,
    search: &SparsitySearch,
) -> Result<SearchResult, SelectError> {
    check_inputs(training, validation, features, target)?;
    if search.fine_samples < 2 {
        return Err(SelectError::InvalidConfig(format!(
            "fine_samples must be at least 2, got {}",
            search.fine_samples
        )));
    }

    let bracket = bracket_penalties(oracle, training, features, target, search)?;
    let candidates = refine_penalties(
        oracle,
        training,
        validation,
        features,
        target,
        bracket,
        search,
    )?;

    let k = search.target_nonzero;
    let exact = candidates
        .iter()
        .filter(|(eval, _)| eval.nonzero_count == k)
        .count();
    if exact == 0 {
        return Err(SelectError::NoExactSparsityMatch {
            target_nonzero: k,
            bracket,
        });
    }
    let mut result = pick_lowest_rss(candidates, Some(k), exact)?;
    result.bracket = Some(bracket);
    log::info!(
        "selected l1 penalty {:e} with {} nonzeros, validation RSS {:e}",
        result.penalty,
        k,
        result.validation_rss
    );
    Ok(result)
}

/// Coarse pass: fit every penalty in `search.coarse_range` and find where the
/// nonzero count crosses `search.target_nonzero`.
///
/// `penalty_min` is the largest penalty still above the target,
/// `penalty_max` the smallest one already below it.
pub fn bracket_penalties<O: FittingOracle>(
    oracle: &O,
    training: &Frame,
    features: &[String],
    target: &str,
    search: &SparsitySearch,
) -> Result<Bracket, SelectError> {
    let target_nonzero = search.target_nonzero;
    if target_nonzero == 0 {
        return Err(SelectError::InvalidConfig(
            "target_nonzero must be positive".to_string(),
        ));
    }
    check_penalty_grid(&search.coarse_range, "coarse_range")?;

    let mut penalty_min = None;
    let mut penalty_max = None;
    let mut densest = 0;
    let mut sparsest = usize::MAX;

    for &penalty in &search.coarse_range {
        let model = oracle.fit(training, target, features, penalty, 0.0)?;
        let nnz = model.sparsity(search.count_intercept);
        log::debug!("coarse l1 penalty {:e}: {} nonzeros", penalty, nnz);
        densest = densest.max(nnz);
        sparsest = sparsest.min(nnz);

        if nnz > target_nonzero {
            penalty_min = Some(penalty);
        }
        if nnz < target_nonzero && penalty_max.is_none() {
            penalty_max = Some(penalty);
        }
    }

    match (penalty_min, penalty_max) {
        (Some(penalty_min), Some(penalty_max)) if penalty_min < penalty_max => {
            log::info!(
                "bracketed {} nonzeros between l1 penalties {:e} and {:e}",
                target_nonzero,
                penalty_min,
                penalty_max
            );
            Ok(Bracket {
                penalty_min,
                penalty_max,
            })
        }
        (Some(penalty_min), Some(penalty_max)) => Err(SelectError::NonMonotoneSparsity {
            penalty_min,
            penalty_max,
        }),
        _ => Err(SelectError::BracketNotFound {
            target_nonzero,
            densest,
            sparsest,
        }),
    }
}

/// Fine pass: evaluate `search.fine_samples` evenly spaced penalties over the
/// closed bracket, in increasing order.
///
/// Each candidate pairs the evaluation with the model fitted at that penalty.
pub fn refine_penalties<O: FittingOracle>(
    oracle: &O,
    training: &Frame,
    validation: &Frame,
    features: &[String],
    target: &str,
    bracket: Bracket,
    search: &SparsitySearch,
) -> Result<Vec<Candidate>, SelectError> {
    if !(bracket.penalty_min < bracket.penalty_max) {
        return Err(SelectError::NonMonotoneSparsity {
            penalty_min: bracket.penalty_min,
            penalty_max: bracket.penalty_max,
        });
    }
    let grid = lin_space(bracket.penalty_min, bracket.penalty_max, search.fine_samples);
    evaluate_grid(
        oracle,
        training,
        validation,
        features,
        target,
        &grid,
        search.count_intercept,
    )
}

/// Fit every penalty in `penalties` and keep the lowest validation RSS,
/// with no constraint on sparsity.
pub fn sweep_validation_rss<O: FittingOracle>(
    oracle: &O,
    training: &Frame,
    validation: &Frame,
    features: &[String],
    target: &str,
    penalties: &[f64],
) -> Result<SearchResult, SelectError> {
    check_inputs(training, validation, features, target)?;
    check_penalty_grid(penalties, "penalties")?;

    let candidates = evaluate_grid(oracle, training, validation, features, target, penalties, false)?;
    let eligible = candidates.len();
    let result = pick_lowest_rss(candidates, None, eligible)?;
    log::info!(
        "lowest validation RSS {:e} at l1 penalty {:e} ({} nonzeros)",
        result.validation_rss,
        result.penalty,
        result.coefficients.nonzero_count()
    );
    Ok(result)
}

/// Move the winning candidate into a [`SearchResult`] with no bracket.
fn pick_lowest_rss(
    mut candidates: Vec<Candidate>,
    nonzero: Option<usize>,
    eligible: usize,
) -> Result<SearchResult, SelectError> {
    let evaluations: Vec<PenaltyEvaluation> = candidates.iter().map(|(eval, _)| *eval).collect();
    let best = best_candidate(&evaluations, nonzero).ok_or(SelectError::NonFiniteValidationRss {
        candidates: eligible,
    })?;
    let (chosen, coefficients) = candidates.swap_remove(best);
    Ok(SearchResult {
        penalty: chosen.penalty,
        coefficients,
        validation_rss: chosen.validation_rss,
        bracket: None,
        evaluations,
    })
}

fn evaluate_grid<O: FittingOracle>(
    oracle: &O,
    training: &Frame,
    validation: &Frame,
    features: &[String],
    target: &str,
    penalties: &[f64],
    count_intercept: bool,
) -> Result<Vec<Candidate>, SelectError> {
    let mut candidates = Vec::with_capacity(penalties.len());
    for &penalty in penalties {
        let model = oracle.fit(training, target, features, penalty, 0.0)?;
        let validation_rss = rss(&model, validation, target)?;
        let nonzero_count = model.sparsity(count_intercept);
        log::debug!(
            "l1 penalty {:e}: {} nonzeros, validation RSS {:e}",
            penalty,
            nonzero_count,
            validation_rss
        );
        let eval = PenaltyEvaluation {
            penalty,
            nonzero_count,
            validation_rss,
        };
        candidates.push((eval, model));
    }
    Ok(candidates)
}

/// Index of the lowest finite RSS, optionally restricted to one sparsity.
///
/// Strict comparison in increasing penalty order leaves ties with the smaller
/// penalty.
fn best_candidate(evaluations: &[PenaltyEvaluation], nonzero: Option<usize>) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, eval) in evaluations.iter().enumerate() {
        if nonzero.is_some_and(|k| eval.nonzero_count != k) {
            continue;
        }
        if !eval.validation_rss.is_finite() {
            log::warn!(
                "skipping l1 penalty {:e}: validation RSS is not finite",
                eval.penalty
            );
            continue;
        }
        match best {
            Some(b) if evaluations[b].validation_rss <= eval.validation_rss => {}
            _ => best = Some(idx),
        }
    }
    best
}

fn check_inputs(
    training: &Frame,
    validation: &Frame,
    features: &[String],
    target: &str,
) -> Result<(), SelectError> {
    validate_features(training, features)?;
    validate_features(validation, features)?;
    training.column(target)?;
    validation.column(target)?;
    if training.is_empty() || validation.is_empty() {
        return Err(SelectError::EmptyInput);
    }
    Ok(())
}

fn check_penalty_grid(penalties: &[f64], label: &str) -> Result<(), SelectError> {
    if penalties.is_empty() {
        return Err(SelectError::InvalidConfig(format!("{} is empty", label)));
    }
    if let Some(&bad) = penalties.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(SelectError::InvalidConfig(format!(
            "{} must hold positive finite penalties, found {}",
            label, bad
        )));
    }
    if penalties.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SelectError::InvalidConfig(format!(
            "{} must be strictly increasing",
            label
        )));
    }
    Ok(())
}
