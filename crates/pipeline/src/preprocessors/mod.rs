//! Preprocessor implementations for the query pipeline.
//!
//! This module contains the built-in query transformers that can be
//! composed into a PreprocessorChain.

pub mod country;
pub mod range;
pub mod regex_cancel;
pub mod single_line;

// Re-export for convenience
pub use country::{CountryPreProcessor, RequireCountry};
pub use range::ReplaceRangeWithNumber;
pub use regex_cancel::{CancelIfPoBox, CancelIfRegexInAttr};
pub use single_line::{AddressLocale, ComposeSingleLine, ParseSingleLine};
