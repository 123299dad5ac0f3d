//! # Check Subcommand
//!
//! Compiles one schema and validates any number of value documents
//! against it.
//!
//! ```bash
//! rx check --schema service.schema.yaml service-a.yaml service-b.json
//! rx --config types.yaml check --schema /app/endpoint endpoint.json
//! ```
//!
//! Prints `ok: <file>` per conforming document and the failure (path,
//! checker, message) per non-conforming one. Exit code is 1 if any
//! document fails.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rx_schema::{Registry, ValidationError};
use serde_json::Value;

use crate::document::load_document;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document (JSON/YAML file), or a type name such as `//int`.
    #[arg(long, short)]
    pub schema: String,

    /// Value documents to validate.
    #[arg(required = true)]
    pub values: Vec<PathBuf>,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, registry: &Registry) -> Result<u8> {
    let schema = resolve_schema(&args.schema)?;
    let checker = registry
        .compile(&schema)
        .with_context(|| format!("cannot compile schema {}", args.schema))?;

    let mut failed = 0usize;
    for path in &args.values {
        let value = load_document(path)?;
        match checker.check(&value) {
            Ok(()) => println!("ok: {}", path.display()),
            Err(err) => {
                failed += 1;
                println!("FAIL: {}", path.display());
                print_failure(&err, 1);
            }
        }
    }

    tracing::info!(checked = args.values.len(), failed, "check finished");
    Ok(if failed == 0 { 0 } else { 1 })
}

/// A schema argument naming an existing file is loaded; anything else is a type name.
fn resolve_schema(arg: &str) -> Result<Value> {
    let path = Path::new(arg);
    if path.is_file() {
        load_document(path)
    } else {
        Ok(Value::String(arg.to_string()))
    }
}

fn print_failure(err: &ValidationError, depth: usize) {
    let indent = "  ".repeat(depth);
    if err.causes.is_empty() {
        println!("{indent}{}: {} ({})", err.path, err.message, err.checker);
        return;
    }
    println!(
        "{indent}{}: no alternative of {} matched",
        err.path, err.checker
    );
    for cause in &err.causes {
        print_failure(cause, depth + 1);
    }
}
