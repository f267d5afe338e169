//! Stable sorters.
//!
//! `Vec::sort_by_key` is stable, so candidates with equal keys always keep
//! the order the previous stage left them in.

use crate::traits::Postprocessor;
use places::{AttrValue, Candidate, CandidateAttr};

fn priority_index(values: &[AttrValue], candidate: &Candidate, attr: CandidateAttr) -> Option<usize> {
    let value = candidate.get(attr)?;
    values.iter().position(|v| *v == value)
}

/// Orders candidates by the position of their `attr` value in `priority`.
///
/// Candidates matching `priority[0]` come first, then `priority[1]`, and so
/// on; everything else (including candidates without the attribute) follows
/// in its original relative order.
pub struct AttrSorter {
    priority: Vec<AttrValue>,
    attr: CandidateAttr,
}

impl AttrSorter {
    pub fn new<I, V>(priority: I, attr: CandidateAttr) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        Self {
            priority: priority.into_iter().map(Into::into).collect(),
            attr,
        }
    }
}

impl Postprocessor for AttrSorter {
    fn name(&self) -> &str {
        "AttrSorter"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        let unmatched = self.priority.len();
        candidates.sort_by_key(|c| priority_index(&self.priority, c, self.attr).unwrap_or(unmatched));
        candidates
    }
}

/// Mirror image of `AttrSorter`: unmatched candidates first, then matches in
/// reverse priority order (the last listed value ends up at the very end).
pub struct AttrReverseSorter {
    priority: Vec<AttrValue>,
    attr: CandidateAttr,
}

impl AttrReverseSorter {
    pub fn new<I, V>(priority: I, attr: CandidateAttr) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        Self {
            priority: priority.into_iter().map(Into::into).collect(),
            attr,
        }
    }
}

impl Postprocessor for AttrReverseSorter {
    fn name(&self) -> &str {
        "AttrReverseSorter"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        let len = self.priority.len();
        candidates.sort_by_key(|c| match priority_index(&self.priority, c, self.attr) {
            Some(index) => len - index,
            None => 0,
        });
        candidates
    }
}

/// Sorts by `score`, highest first. Ties keep their relative order; NaN
/// scores sink to the bottom.
pub struct ScoreSorter;

impl ScoreSorter {
    fn key(score: f64) -> f64 {
        if score.is_nan() { f64::NEG_INFINITY } else { score }
    }
}

impl Postprocessor for ScoreSorter {
    fn name(&self) -> &str {
        "ScoreSorter"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| Self::key(b.score).total_cmp(&Self::key(a.score)));
        candidates
    }
}
