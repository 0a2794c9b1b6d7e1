//! The extraction pipeline.
//!
//! Stages run in order: `parsers` → `extract` → `keys` → `emit` →
//! `rewrite` → `validate`. `snapshot` carries extraction results to a later
//! rewrite run.

pub mod context;
pub mod emit;
pub mod error;
pub mod extract;
pub mod file_scanner;
pub mod keys;
pub mod parsers;
pub mod rewrite;
pub mod snapshot;
pub mod validate;
