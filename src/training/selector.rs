use crate::error::EmptyResult;

use super::trainer::{CandidateResult, EvaluationResults};

/// Label reported when there is nothing to choose from.
pub const NO_MODEL_TRAINED: &str = "No models trained, so there is not a best model.";

/// The candidate with the strictly greatest score. Candidates are scanned in
/// training order, so the earliest one wins a tie. A failed candidate takes
/// part with its recorded score of 0.0.
pub fn best_candidate(results: &EvaluationResults) -> Result<&CandidateResult, EmptyResult> {
    let mut best: Option<&CandidateResult> = None;
    for entry in results.iter() {
        if best.map_or(true, |b| entry.outcome.score() > b.outcome.score()) {
            best = Some(entry);
        }
    }
    best.ok_or(EmptyResult)
}

/// Display label of the best candidate, e.g. `"Random Forest (Score: 87.000)"`.
pub fn select_best(results: &EvaluationResults) -> String {
    match best_candidate(results) {
        Ok(best) => {
            let label = format!("{} (Score: {:.3})", best.name, best.outcome.score());
            log::info!("Best model: {label}");
            label
        }
        Err(e) => {
            log::warn!("Selection skipped: {e}");
            NO_MODEL_TRAINED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::encode::TaskType;
    use crate::training::trainer::CandidateOutcome;

    fn scored(score: f64) -> CandidateOutcome {
        CandidateOutcome::Scored {
            score,
            summary: String::new(),
        }
    }

    #[test]
    fn first_maximum_wins_ties() {
        let mut results = EvaluationResults::new(TaskType::Classification);
        results.push("A", scored(0.80));
        results.push("B", scored(0.95));
        results.push("C", scored(0.95));

        assert_eq!(best_candidate(&results).unwrap().name, "B");
        assert_eq!(select_best(&results), "B (Score: 0.950)");
    }

    #[test]
    fn empty_results_give_sentinel() {
        let results = EvaluationResults::default();
        assert_eq!(best_candidate(&results), Err(EmptyResult));
        assert_eq!(select_best(&results), NO_MODEL_TRAINED);
    }

    fn failed() -> CandidateOutcome {
        CandidateOutcome::Failed {
            reason: "singular".into(),
        }
    }

    #[test]
    fn failed_candidate_competes_at_zero() {
        let mut results = EvaluationResults::new(TaskType::Regression);
        results.push("Linear Regression", failed());
        results.push("Random Forest (Regression)", scored(-0.3));
        assert_eq!(select_best(&results), "Linear Regression (Score: 0.000)");

        let mut results = EvaluationResults::new(TaskType::Regression);
        results.push("Linear Regression", failed());
        results.push("Random Forest (Regression)", scored(0.4));
        assert_eq!(select_best(&results), "Random Forest (Regression) (Score: 0.400)");
    }

    #[test]
    fn all_failed_still_selects_the_first() {
        let mut results = EvaluationResults::new(TaskType::Regression);
        results.push("Linear Regression", failed());
        results.push("Random Forest (Regression)", failed());
        assert_eq!(best_candidate(&results).unwrap().name, "Linear Regression");
        assert_eq!(select_best(&results), "Linear Regression (Score: 0.000)");
    }
}
