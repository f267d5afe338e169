//! Membership filters on a candidate attribute.

use crate::traits::Postprocessor;
use places::{AttrValue, Candidate, CandidateAttr};

/// Keeps candidates whose `attr` equals one of `values`.
///
/// With `exact_match` off, a text value matches when it starts with one of
/// `values` ("building." accepts "building.yes"). The order of `values` is
/// irrelevant here.
pub struct AttrFilter {
    values: Vec<AttrValue>,
    attr: CandidateAttr,
    exact_match: bool,
}

impl AttrFilter {
    pub fn new<I, V>(values: I, attr: CandidateAttr) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            attr,
            exact_match: true,
        }
    }

    /// Switch between exact and prefix matching (default: exact)
    pub fn with_exact_match(mut self, exact_match: bool) -> Self {
        self.exact_match = exact_match;
        self
    }

    fn matches(&self, candidate: &Candidate) -> bool {
        let Some(value) = candidate.get(self.attr) else {
            return false;
        };
        if self.exact_match {
            self.values.contains(&value)
        } else {
            self.values.iter().any(|prefix| value.starts_with(prefix))
        }
    }
}

impl Postprocessor for AttrFilter {
    fn name(&self) -> &str {
        "AttrFilter"
    }

    fn process(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Drops candidates whose `attr` equals any of `values`.
pub struct AttrExclude {
    values: Vec<AttrValue>,
    attr: CandidateAttr,
}

impl AttrExclude {
    pub fn new<I, V>(values: I, attr: CandidateAttr) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            attr,
        }
    }
}

impl Postprocessor for AttrExclude {
    fn name(&self) -> &str {
        "AttrExclude"
    }

    fn process(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|c| match c.get(self.attr) {
                Some(value) => !self.values.contains(&value),
                None => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocessors::test_support::{addrs, candidate};

    #[test]
    fn test_exact_filter_keeps_members_in_order() {
        let filter = AttrFilter::new(["interpolation", "rooftop"], CandidateAttr::Locator);
        let out = filter.process(vec![
            candidate("a", 10.0, "rooftop"),
            candidate("b", 10.0, "parcel"),
            candidate("c", 10.0, "interpolation"),
        ]);
        assert_eq!(addrs(&out), vec!["a", "c"]);
    }

    #[test]
    fn test_prefix_filter() {
        let filter = AttrFilter::new(["building.", "amenity."], CandidateAttr::Entity)
            .with_exact_match(false);
        let out = filter.process(vec![
            candidate("a", 0.0, "parcel").with_entity("building.yes"),
            candidate("b", 0.0, "parcel").with_entity("highway.residential"),
            candidate("c", 0.0, "parcel").with_entity("amenity.cafe"),
        ]);
        assert_eq!(addrs(&out), vec!["a", "c"]);
    }

    #[test]
    fn test_absent_attribute_fails_membership() {
        let filter = AttrFilter::new(["Address"], CandidateAttr::Entity);
        let out = filter.process(vec![candidate("a", 0.0, "rooftop")]);
        assert!(out.is_empty());

        let exclude = AttrExclude::new(["Address"], CandidateAttr::Entity);
        let out = exclude.process(vec![candidate("a", 0.0, "rooftop")]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_numeric_attribute_filter() {
        let filter = AttrFilter::new([4326u32], CandidateAttr::Wkid);
        let mut other = candidate("b", 0.0, "parcel");
        other.wkid = 3857;
        let out = filter.process(vec![candidate("a", 0.0, "parcel"), other]);
        assert_eq!(addrs(&out), vec!["a"]);
    }

    #[test]
    fn test_exclude() {
        let exclude = AttrExclude::new(["amenity.atm", "amenity.post_box"], CandidateAttr::Entity);
        let out = exclude.process(vec![
            candidate("a", 0.0, "parcel").with_entity("amenity.atm"),
            candidate("b", 0.0, "parcel").with_entity("amenity.cafe"),
        ]);
        assert_eq!(addrs(&out), vec!["b"]);
    }

    #[test]
    fn test_filter_then_exclude_same_values_is_empty() {
        let values = ["rooftop", "parcel"];
        let input = vec![candidate("a", 0.0, "rooftop"), candidate("b", 0.0, "parcel")];

        let kept = AttrFilter::new(values, CandidateAttr::Locator).process(input);
        assert_eq!(kept.len(), 2);
        let out = AttrExclude::new(values, CandidateAttr::Locator).process(kept);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(AttrFilter::new(["x"], CandidateAttr::Locator).process(vec![]).is_empty());
        assert!(AttrExclude::new(["x"], CandidateAttr::Locator).process(vec![]).is_empty());
    }
}
