//! Lookup-table rewrites of candidate attributes.

use crate::traits::Postprocessor;
use places::{AttrValue, Candidate, CandidateAttr};
use std::collections::HashMap;
use tracing::warn;

fn build_mapping<I, K, V>(mapping: I) -> HashMap<AttrValue, AttrValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<AttrValue>,
    V: Into<AttrValue>,
{
    mapping
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Replaces the value of `attr` through a lookup table.
///
/// Values without an entry, and candidates without the attribute, pass
/// through unchanged.
pub struct AttrRename {
    attr: CandidateAttr,
    mapping: HashMap<AttrValue, AttrValue>,
}

impl AttrRename {
    pub fn new<I, K, V>(attr: CandidateAttr, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<AttrValue>,
        V: Into<AttrValue>,
    {
        Self {
            attr,
            mapping: build_mapping(mapping),
        }
    }
}

impl Postprocessor for AttrRename {
    fn name(&self) -> &str {
        "AttrRename"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        for candidate in &mut candidates {
            let Some(replacement) = candidate.get(self.attr).and_then(|v| self.mapping.get(&v))
            else {
                continue;
            };
            if !candidate.set(self.attr, replacement.clone()) {
                warn!("AttrRename could not assign {} to {}", replacement, self.attr);
            }
        }
        candidates
    }
}

/// Computes `dst_attr` from `src_attr` through a lookup table, e.g. a textual
/// confidence into a numeric score. `src_attr` is left as it was; candidates
/// whose source value has no entry keep their current `dst_attr`.
pub struct AttrMigrator {
    src_attr: CandidateAttr,
    dst_attr: CandidateAttr,
    mapping: HashMap<AttrValue, AttrValue>,
}

impl AttrMigrator {
    pub fn new<I, K, V>(src_attr: CandidateAttr, dst_attr: CandidateAttr, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<AttrValue>,
        V: Into<AttrValue>,
    {
        Self {
            src_attr,
            dst_attr,
            mapping: build_mapping(mapping),
        }
    }
}

impl Postprocessor for AttrMigrator {
    fn name(&self) -> &str {
        "AttrMigrator"
    }

    fn process(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        for candidate in &mut candidates {
            let Some(value) = candidate
                .get(self.src_attr)
                .and_then(|v| self.mapping.get(&v))
            else {
                continue;
            };
            if !candidate.set(self.dst_attr, value.clone()) {
                warn!(
                    "AttrMigrator could not assign {} from {} to {}",
                    value, self.src_attr, self.dst_attr
                );
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocessors::test_support::candidate;

    #[test]
    fn test_rename_locator_values() {
        let rename = AttrRename::new(
            CandidateAttr::Locator,
            [("Rooftop", "rooftop"), ("ParcelCentroid", "parcel")],
        );
        let out = rename.process(vec![
            candidate("a", 0.0, "Rooftop"),
            candidate("b", 0.0, "ParcelCentroid"),
            candidate("c", 0.0, "Street"),
        ]);
        let locators: Vec<_> = out.iter().map(|c| c.locator.as_deref().unwrap()).collect();
        assert_eq!(locators, vec!["rooftop", "parcel", "Street"]);
    }

    #[test]
    fn test_rename_skips_absent_attribute() {
        let rename = AttrRename::new(CandidateAttr::Entity, [("Address", "address")]);
        let out = rename.process(vec![candidate("a", 0.0, "parcel")]);
        assert!(out[0].entity.is_none());
    }

    #[test]
    fn test_migrate_confidence_to_score() {
        let migrate = AttrMigrator::new(
            CandidateAttr::Confidence,
            CandidateAttr::Score,
            [("High", 100), ("Medium", 85), ("Low", 50)],
        );
        let out = migrate.process(vec![
            candidate("a", 0.0, "rooftop").with_confidence("Medium"),
            candidate("b", 7.0, "rooftop").with_confidence("Unknown"),
            candidate("c", 7.0, "rooftop"),
        ]);
        assert_eq!(out[0].score, 85.0);
        assert_eq!(out[0].confidence.as_deref(), Some("Medium"));
        assert_eq!(out[1].score, 7.0);
        assert_eq!(out[2].score, 7.0);
    }

    #[test]
    fn test_migrate_rejected_assignment_leaves_candidate() {
        let migrate = AttrMigrator::new(
            CandidateAttr::Locator,
            CandidateAttr::Score,
            [("rooftop", "very good")],
        );
        let out = migrate.process(vec![candidate("a", 42.0, "rooftop")]);
        assert_eq!(out[0].score, 42.0);
    }
}
