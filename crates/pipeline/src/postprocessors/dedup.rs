//! Duplicate removal.

use crate::traits::Postprocessor;
use places::{AttrValue, Candidate, CandidateAttr};
use std::collections::{HashMap, HashSet};

/// Keeps the first candidate for each distinct key.
///
/// The key is a single attribute or a composite of several (e.g. `(x, y)`).
/// A missing attribute is part of the key as "absent", so candidates lacking
/// it group together. No fields are merged across group members.
pub struct GroupBy {
    keys: Vec<CandidateAttr>,
}

impl GroupBy {
    pub fn new(key: CandidateAttr) -> Self {
        Self { keys: vec![key] }
    }

    pub fn composite(keys: impl IntoIterator<Item = CandidateAttr>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    fn key_of(&self, candidate: &Candidate) -> Vec<Option<AttrValue>> {
        self.keys.iter().map(|attr| candidate.get(*attr)).collect()
    }
}

impl Postprocessor for GroupBy {
    fn name(&self) -> &str {
        "GroupBy"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut seen: HashSet<Vec<Option<AttrValue>>> = HashSet::with_capacity(candidates.len());
        candidates.retain(|c| seen.insert(self.key_of(c)));
        candidates
    }
}

/// Among candidates sharing `dupe_attr`, keeps only those whose `sort_attr`
/// has the best rank in `ordered` found within that group.
///
/// Values missing from `ordered` rank after every listed value. Survivors keep
/// their relative order; more than one may survive per group when they tie.
pub struct DupePicker {
    dupe_attr: CandidateAttr,
    sort_attr: CandidateAttr,
    ordered: Vec<AttrValue>,
}

impl DupePicker {
    pub fn new<I, V>(dupe_attr: CandidateAttr, sort_attr: CandidateAttr, ordered: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        Self {
            dupe_attr,
            sort_attr,
            ordered: ordered.into_iter().map(Into::into).collect(),
        }
    }

    fn rank(&self, candidate: &Candidate) -> usize {
        candidate
            .get(self.sort_attr)
            .and_then(|value| self.ordered.iter().position(|v| *v == value))
            .unwrap_or(self.ordered.len())
    }
}

impl Postprocessor for DupePicker {
    fn name(&self) -> &str {
        "DupePicker"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut best: HashMap<Option<AttrValue>, usize> = HashMap::new();
        for candidate in &candidates {
            let rank = self.rank(candidate);
            best.entry(candidate.get(self.dupe_attr))
                .and_modify(|r| *r = (*r).min(rank))
                .or_insert(rank);
        }
        candidates.retain(|c| best.get(&c.get(self.dupe_attr)) == Some(&self.rank(c)));
        candidates
    }
}
