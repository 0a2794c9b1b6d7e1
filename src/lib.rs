//! hanzi-i18n - move hard-coded Chinese text of Vue2 projects into vue-i18n
//!
//! A codemod CLI and library. It finds Chinese literals in `.vue` single-file
//! components and JS/TS modules, gives every distinct phrase a stable key,
//! writes locale resource modules, rewrites the sources to call the
//! translation function, and checks what is left.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, reports)
//! - `config`: `.i18nrc.json` loading and validation
//! - `core`: The pipeline (parse, extract, assign keys, emit, rewrite, validate)
//! - `issues`: Recoverable findings (parse errors, skips, validation issues)
//! - `utils`: Shared text and path helpers

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
