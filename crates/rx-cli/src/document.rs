//! # Document Loading
//!
//! Reads schema, value, and registry configuration documents from disk.
//! The format is chosen by extension: `.yaml`/`.yml` are YAML, anything
//! else is JSON. YAML documents are converted into `serde_json::Value`,
//! the value model `rx-schema` works on. Rx mappings are string-keyed and
//! untagged, so a YAML document using a non-string key, an explicit tag,
//! or a non-finite float is rejected with the location of the offending
//! node.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rx_schema::{LocationPath, PathSegment, Registry, RegistryConfig};
use serde_json::Value;

/// Load a JSON or YAML document.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            parse_yaml(&content).with_context(|| format!("invalid YAML: {}", path.display()))
        }
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON: {}", path.display())),
    }
}

/// Build the registry: core types only, or as described by a config file.
pub fn load_registry(config: Option<&Path>) -> Result<Registry> {
    let Some(path) = config else {
        return Ok(Registry::new());
    };

    let document = load_document(path)?;
    let config: RegistryConfig = serde_json::from_value(document)
        .with_context(|| format!("invalid registry configuration: {}", path.display()))?;
    let registry = config
        .build()
        .with_context(|| format!("registry configuration rejected: {}", path.display()))?;

    tracing::info!(
        config = %path.display(),
        types = registry.type_uris().len(),
        "loaded registry configuration"
    );
    Ok(registry)
}

fn parse_yaml(content: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    ensure_json_compatible(&yaml, &mut Vec::new())?;
    Ok(serde_json::to_value(yaml)?)
}

/// Reject YAML constructs with no counterpart in the JSON value model.
fn ensure_json_compatible(node: &serde_yaml::Value, path: &mut Vec<PathSegment>) -> Result<()> {
    match node {
        serde_yaml::Value::Number(n) if n.as_f64().is_some_and(|f| !f.is_finite()) => {
            bail!("non-finite number {n} at {}", at(path))
        }
        serde_yaml::Value::Tagged(tagged) => {
            bail!("tag {} at {} is not supported", tagged.tag, at(path))
        }
        serde_yaml::Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                ensure_json_compatible(item, path)?;
                path.pop();
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (key, item) in map {
                let serde_yaml::Value::String(key) = key else {
                    bail!("mapping key {key:?} at {} is not a string", at(path));
                };
                path.push(PathSegment::from(key.as_str()));
                ensure_json_compatible(item, path)?;
                path.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn at(path: &[PathSegment]) -> LocationPath {
    LocationPath::from(path)
}
