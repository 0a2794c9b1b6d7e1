//! Rewriter.
//!
//! Replaces every located occurrence with a call to the translation
//! function. Script and template spans are both found by re-running the
//! extractor on the current file, then spliced textually so everything
//! outside the replaced spans stays byte-identical.

pub mod backup;
pub mod call;
pub mod edits;
pub mod import;
pub mod pending;
pub mod record;
pub mod rewriter;

pub use record::{FailureReason, RewriteRecord, RewriteSummary, Substitution, SubstitutionStatus};
pub use rewriter::{FileRewrite, RewriteOptions, Rewriter};
