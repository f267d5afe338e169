//! Score-based stages.

use crate::traits::Postprocessor;
use places::Candidate;

/// What a threshold stage saw when the chain reached it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdReport {
    /// Highest score in the list, `None` for an empty list
    pub max_score: Option<f64>,
    pub threshold: f64,
    /// `max_score >= threshold`
    pub met: bool,
}

impl ThresholdReport {
    pub fn evaluate(candidates: &[Candidate], threshold: f64) -> Self {
        let max_score = candidates
            .iter()
            .map(|c| c.score)
            .filter(|s| !s.is_nan())
            .reduce(f64::max);
        Self {
            max_score,
            threshold,
            met: max_score.is_some_and(|max| max >= threshold),
        }
    }
}

/// Signals that a provider produced a good-enough match.
///
/// The candidate list passes through untouched; the chain evaluates the
/// threshold and reports it, and the orchestrator decides whether to skip
/// the remaining providers.
pub struct UseHighScoreIfAtLeast {
    threshold: f64,
}

impl UseHighScoreIfAtLeast {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(&self, candidates: &[Candidate]) -> ThresholdReport {
        ThresholdReport::evaluate(candidates, self.threshold)
    }
}

impl Postprocessor for UseHighScoreIfAtLeast {
    fn name(&self) -> &str {
        "UseHighScoreIfAtLeast"
    }

    fn process(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
    }

    fn score_threshold(&self) -> Option<f64> {
        Some(self.threshold)
    }
}

/// Drops candidates scoring below `min_score`.
pub struct ScoreFilter {
    min_score: f64,
}

impl ScoreFilter {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }
}

impl Postprocessor for ScoreFilter {
    fn name(&self) -> &str {
        "ScoreFilter"
    }

    fn process(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|c| c.score >= self.min_score)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocessors::test_support::{addrs, candidate};

    #[test]
    fn test_threshold_met_exactly_at_boundary() {
        let stage = UseHighScoreIfAtLeast::new(100.0);
        let report = stage.evaluate(&[candidate("a", 85.0, "p"), candidate("b", 100.0, "p")]);
        assert!(report.met);
        assert_eq!(report.max_score, Some(100.0));

        let report = stage.evaluate(&[candidate("a", 99.9, "p")]);
        assert!(!report.met);
    }

    #[test]
    fn test_empty_list_not_met() {
        let report = UseHighScoreIfAtLeast::new(100.0).evaluate(&[]);
        assert!(!report.met);
        assert_eq!(report.max_score, None);
    }

    #[test]
    fn test_threshold_stage_is_pass_through() {
        let stage = UseHighScoreIfAtLeast::new(50.0);
        let input = vec![candidate("a", 10.0, "p"), candidate("b", 90.0, "p")];
        let out = stage.process(input.clone());
        assert_eq!(out, input);
        assert_eq!(stage.score_threshold(), Some(50.0));
    }

    #[test]
    fn test_score_filter() {
        let out = ScoreFilter::new(80.0).process(vec![
            candidate("a", 79.9, "p"),
            candidate("b", 80.0, "p"),
            candidate("c", 100.0, "p"),
        ]);
        assert_eq!(addrs(&out), vec!["b", "c"]);
    }
}
