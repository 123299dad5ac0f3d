//! # rx-cli — Rx Schema Command-Line Interface
//!
//! The file-facing side of `rx-schema`: reads JSON/YAML documents, builds
//! registries from configuration files, and prints validation results.
//!
//! ## Subcommands
//!
//! - `check` — validate value documents against a schema
//! - `expand` — expand type names to URIs
//! - `types` — list registered types and prefixes
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers take parsed args and a
//!   registry and return an exit code.
//! - All schema semantics live in `rx-schema`.

pub mod check;
pub mod document;
pub mod inspect;
