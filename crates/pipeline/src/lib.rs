//! Pre- and post-processing pipelines for geocode queries and candidates.
//!
//! This crate provides:
//! - Preprocessor / Postprocessor traits
//! - Built-in query transformers (PO box cancellation, country handling,
//!   single-line parsing, address range rewriting)
//! - Built-in candidate transformers (attribute filter/exclude/rename/migrate,
//!   priority and score sorting, group-dedup, score threshold)
//! - PreprocessorChain and PostprocessorChain for composing them
//!
//! ## Architecture
//! A provider call is wrapped in two chains:
//! 1. The preprocessor chain rewrites the query or cancels it outright
//! 2. The provider adapter (in the `services` crate) returns raw candidates
//! 3. The postprocessor chain filters, relabels, ranks and deduplicates them,
//!    and reports whether a score threshold was met
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{PostprocessorChain, PreprocessorChain, QueryOutcome};
//! use pipeline::postprocessors::*;
//! use pipeline::preprocessors::*;
//! use places::CandidateAttr;
//!
//! let pre = PreprocessorChain::new()
//!     .add(ReplaceRangeWithNumber::new())
//!     .add(CancelIfPoBox::new());
//!
//! let post = PostprocessorChain::new()
//!     .add(AttrMigrator::new(CandidateAttr::Confidence, CandidateAttr::Score,
//!                            [("High", 100), ("Medium", 85), ("Low", 50)]))
//!     .add(UseHighScoreIfAtLeast::new(100.0))
//!     .add(ScoreSorter)
//!     .add(GroupBy::new(CandidateAttr::MatchAddr));
//!
//! if let QueryOutcome::Continue(query) = pre.run(query) {
//!     let result = post.run(adapter.geocode(&query)?);
//! }
//! ```

pub mod postprocessor_pipeline;
pub mod postprocessors;
pub mod preprocessor_pipeline;
pub mod preprocessors;
pub mod traits;

// Re-export main types
pub use postprocessor_pipeline::{PostprocessorChain, Postprocessed};
pub use postprocessors::ThresholdReport;
pub use preprocessor_pipeline::PreprocessorChain;
pub use traits::{CancelReason, Postprocessor, Preprocessor, QueryOutcome};
