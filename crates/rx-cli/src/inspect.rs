//! # Registry Inspection
//!
//! `rx expand` resolves type names through the prefix table; `rx types`
//! lists what the registry knows.

use anyhow::{Context, Result};
use clap::Args;
use rx_schema::Registry;

/// Arguments for the expand subcommand.
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Type names to expand, e.g. `//str` or `/app/port`.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for the types subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Also list the prefix table.
    #[arg(long)]
    pub prefixes: bool,
}

/// Execute the expand subcommand.
pub fn run_expand(args: &ExpandArgs, registry: &Registry) -> Result<u8> {
    for name in &args.names {
        let uri = registry
            .expand_uri(name)
            .with_context(|| format!("cannot expand {name}"))?;
        let status = if registry.has_type(&uri) { "" } else { "  (unregistered)" };
        println!("{name} -> {uri}{status}");
    }
    Ok(0)
}

/// Execute the types subcommand.
pub fn run_types(args: &TypesArgs, registry: &Registry) -> Result<u8> {
    if args.prefixes {
        println!("Prefixes:");
        for (name, base) in registry.prefixes() {
            println!("  /{name}/  {base}");
        }
        println!();
        println!("Types:");
    }
    let uris = registry.type_uris();
    for uri in &uris {
        println!("  {uri}");
    }
    tracing::debug!(count = uris.len(), "listed types");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_known_names() {
        let args = ExpandArgs {
            names: vec!["//str".to_string(), "/.meta/schema".to_string()],
        };
        assert_eq!(run_expand(&args, &Registry::new()).unwrap(), 0);
    }

    #[test]
    fn test_expand_bad_name_is_error() {
        let args = ExpandArgs {
            names: vec!["str".to_string()],
        };
        let err = run_expand(&args, &Registry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("couldn't understand type name"));
    }

    #[test]
    fn test_types_listing() {
        let args = TypesArgs { prefixes: true };
        assert_eq!(run_types(&args, &Registry::new()).unwrap(), 0);
    }
}
