//! Postprocessor implementations for the candidate pipeline.
//!
//! All of them operate on a named candidate attribute (or on `score`), so the
//! same operators serve every provider. A candidate that lacks the attribute
//! is treated as carrying no value: it fails membership tests and sorts into
//! the unmatched partition.
//!
//! Default presets conventionally order stages as filters/excludes, then
//! renamers/migrators, then sorters, then group-dedup. Nothing here enforces
//! that order.

pub mod attr_filter;
pub mod attr_rewrite;
pub mod dedup;
pub mod score;
pub mod sorters;

// Re-export for convenience
pub use attr_filter::{AttrExclude, AttrFilter};
pub use attr_rewrite::{AttrMigrator, AttrRename};
pub use dedup::{DupePicker, GroupBy};
pub use score::{ScoreFilter, ThresholdReport, UseHighScoreIfAtLeast};
pub use sorters::{AttrReverseSorter, AttrSorter, ScoreSorter};
