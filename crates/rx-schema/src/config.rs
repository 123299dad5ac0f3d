//! # Registry Configuration
//!
//! A declarative description of a registry: extra prefixes and learned
//! types, typically deserialized from a YAML or JSON file.
//!
//! ```yaml
//! register_core_types: true
//! prefixes:
//!   app: "tag:example.com,2024:app/"
//! types:
//!   /app/port: { type: //int, range: { min: 1, max: 65535 } }
//! ```
//!
//! Prefixes are registered before types. Types are learned in key order,
//! so a type may refer to built-ins and to types whose keys sort earlier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checker::CheckerKind;
use crate::error::DefinitionResult;
use crate::registry::Registry;

/// Declarative registry contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Register the fourteen core types.
    #[serde(default = "default_true")]
    pub register_core_types: bool,
    /// Prefix name to URI base.
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    /// Type name (URI or short form) to schema document.
    #[serde(default)]
    pub types: BTreeMap<String, Value>,
}

fn default_true() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            register_core_types: true,
            prefixes: BTreeMap::new(),
            types: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    /// Build a fresh registry from this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `DefinitionError` raised by a registration.
    pub fn build(&self) -> DefinitionResult<Registry> {
        let mut registry = Registry::empty();
        if self.register_core_types {
            for kind in CheckerKind::ALL {
                registry.register_native_type(kind)?;
            }
        }
        self.apply(&mut registry)?;
        Ok(registry)
    }

    /// Register this configuration's prefixes and types into `registry`.
    ///
    /// Stops at the first failing registration; entries applied before it
    /// stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first `DefinitionError` raised by a registration.
    pub fn apply(&self, registry: &mut Registry) -> DefinitionResult<()> {
        for (name, base) in &self.prefixes {
            registry.add_prefix(name, base)?;
        }
        for (uri, schema) in &self.types {
            registry.learn_type(uri, schema)?;
        }
        tracing::debug!(
            prefixes = self.prefixes.len(),
            types = self.types.len(),
            "applied registry configuration"
        );
        Ok(())
    }
}
