//! # rx-schema — Portable Schema Validation
//!
//! Compiles Rx schema documents into immutable checker trees and validates
//! nested values against them, reporting where and why a value failed.
//!
//! ## Flow
//!
//! 1. A [`Registry`] maps type names (`//int`, `/app/port`, full URIs) to
//!    native checker kinds or learned schema documents.
//! 2. [`Registry::compile`] turns a schema document — a type name or a
//!    mapping with a `type` key — into a [`Checker`] tree.
//! 3. [`Checker::check`] validates a [`serde_json::Value`] and returns a
//!    [`ValidationError`] carrying the location path of the failure.
//!
//! ```
//! use rx_schema::Registry;
//! use serde_json::json;
//!
//! let registry = Registry::new();
//! let checker = registry
//!     .compile(&json!({"type": "//arr", "contents": "//int"}))
//!     .unwrap();
//! let err = checker.check(&json!([1, "two"])).unwrap_err();
//! assert_eq!(err.path.to_string(), "[1]");
//! ```
//!
//! ## Crate Policy
//!
//! - Values are consumed already parsed; no text or file I/O here.
//! - Definition errors and validation errors are separate types.
//! - Compiled checkers are `Send + Sync` and never mutated.
//! - No `unsafe` code.

pub mod checker;
pub mod config;
pub mod error;
pub mod path;
pub mod range;
pub mod registry;

pub use checker::{Checker, CheckerKind, CORE_BASE, META_BASE};
pub use config::RegistryConfig;
pub use error::{DefinitionError, DefinitionResult, RxError, ValidationError};
pub use path::{LocationPath, PathSegment};
pub use range::RangeCheck;
pub use registry::Registry;
