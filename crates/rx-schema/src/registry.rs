//! # Type Registry
//!
//! Maps type names to checker constructors and compiles schema documents.
//!
//! ## Type Names
//!
//! A type name is either a URI (anything starting with `scheme:`), used as
//! is, or a short form `/<prefix>/<local>` that is expanded through the
//! prefix table. Two prefixes are always present:
//!
//! | Prefix | Base |
//! |---|---|
//! | `""` | `tag:codesimply.com,2008:rx/core/` |
//! | `".meta"` | `tag:codesimply.com,2008:rx/meta/` |
//!
//! so `//str` expands to `tag:codesimply.com,2008:rx/core/str`.
//!
//! ## Registration
//!
//! Registration is append-only. Re-registering a prefix or a type URI is a
//! [`DefinitionError`] and leaves the registry unchanged. A registry is an
//! ordinary value: create as many as needed, and wrap one in a lock if
//! registrations can race with compilation.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::checker::{Checker, CheckerKind, CORE_BASE, META_BASE};
use crate::error::{DefinitionError, DefinitionResult, RxError};

// URI schemes are ASCII word characters only.
static URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?-u:\w)+:").expect("URI pattern is a valid regex"));

static SHORT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([-._a-z0-9]*)/([-._a-z0-9]+)$").expect("short name pattern is a valid regex")
});

/// What a type URI resolves to.
#[derive(Debug, Clone)]
enum TypeEntry {
    /// One of the built-in checker kinds.
    Native(CheckerKind),
    /// A learned type: compiles to this schema document.
    Alias(Value),
}

/// Prefix table plus type table.
#[derive(Debug, Clone)]
pub struct Registry {
    prefixes: HashMap<String, String>,
    types: HashMap<String, TypeEntry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry with the default prefixes and every core type.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for kind in CheckerKind::ALL {
            registry.types.insert(kind.uri(), TypeEntry::Native(kind));
        }
        registry
    }

    /// A registry with the default prefixes and no types.
    pub fn empty() -> Self {
        let prefixes = HashMap::from([
            (String::new(), CORE_BASE.to_string()),
            (".meta".to_string(), META_BASE.to_string()),
        ]);
        Self {
            prefixes,
            types: HashMap::new(),
        }
    }

    /// Expand a type name to its canonical URI.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::UnrecognizedTypeName` if `name` is neither
    /// a URI nor a `/prefix/name` short form, and
    /// `DefinitionError::UnknownPrefix` if the prefix is not registered.
    pub fn expand_uri(&self, name: &str) -> DefinitionResult<String> {
        if URI_RE.is_match(name) {
            return Ok(name.to_string());
        }

        let caps = SHORT_NAME_RE
            .captures(name)
            .ok_or_else(|| DefinitionError::UnrecognizedTypeName(name.to_string()))?;
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let local = caps.get(2).map_or("", |m| m.as_str());

        let base = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| DefinitionError::UnknownPrefix {
                prefix: prefix.to_string(),
                name: name.to_string(),
            })?;

        Ok(format!("{base}{local}"))
    }

    /// Register a short prefix for a URI base.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::DuplicatePrefix` if `name` is taken.
    pub fn add_prefix(&mut self, name: &str, base: &str) -> DefinitionResult<()> {
        if self.prefixes.contains_key(name) {
            return Err(DefinitionError::DuplicatePrefix(name.to_string()));
        }
        tracing::debug!(prefix = name, base, "registered prefix");
        self.prefixes.insert(name.to_string(), base.to_string());
        Ok(())
    }

    /// Register a native checker kind under its core URI.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::DuplicateType` if the URI is taken.
    pub fn register_native_type(&mut self, kind: CheckerKind) -> DefinitionResult<()> {
        let uri = kind.uri();
        if self.types.contains_key(&uri) {
            return Err(DefinitionError::DuplicateType(uri));
        }
        tracing::debug!(%uri, "registered native type");
        self.types.insert(uri, TypeEntry::Native(kind));
        Ok(())
    }

    /// Register `uri` as a named alias for `schema`.
    ///
    /// `uri` may be a short name under any registered prefix. The schema is
    /// compiled before registration, so a malformed alias is rejected here
    /// rather than at first use.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::DuplicateType` if the URI is taken, or any
    /// error raised while expanding `uri` or compiling `schema`.
    pub fn learn_type(&mut self, uri: &str, schema: &Value) -> DefinitionResult<()> {
        let uri = self.expand_uri(uri)?;
        if self.types.contains_key(&uri) {
            return Err(DefinitionError::DuplicateType(uri));
        }
        self.compile(schema)?;
        tracing::debug!(%uri, "learned type");
        self.types.insert(uri, TypeEntry::Alias(schema.clone()));
        Ok(())
    }

    /// Compile a schema document into a checker tree.
    ///
    /// `schema` is either a type name (shorthand for `{"type": name}`) or a
    /// mapping with a `type` key plus the parameters of that type.
    ///
    /// # Errors
    ///
    /// Returns the first `DefinitionError` encountered anywhere in the tree.
    pub fn compile(&self, schema: &Value) -> DefinitionResult<Checker> {
        match schema {
            Value::String(name) => {
                let mut params = Map::new();
                params.insert("type".to_string(), Value::String(name.clone()));
                self.compile_params(&params)
            }
            Value::Object(params) => self.compile_params(params),
            other => Err(DefinitionError::InvalidSchema(format!(
                "expected a type name or a mapping, got {other}"
            ))),
        }
    }

    fn compile_params(&self, params: &Map<String, Value>) -> DefinitionResult<Checker> {
        let type_name = match params.get("type") {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(DefinitionError::InvalidSchema(format!(
                    "'type' must be a string, got {other}"
                )))
            }
            None => {
                return Err(DefinitionError::InvalidSchema(
                    "schema mapping has no 'type'".to_string(),
                ))
            }
        };

        let uri = self.expand_uri(type_name)?;
        match self.types.get(&uri) {
            None => Err(DefinitionError::UnknownType(uri)),
            Some(TypeEntry::Native(kind)) => Checker::build(*kind, params, self),
            Some(TypeEntry::Alias(schema)) => {
                if params.keys().any(|k| k != "type") {
                    return Err(DefinitionError::AliasParameters(uri));
                }
                tracing::trace!(%uri, "expanding learned type");
                self.compile(schema)
            }
        }
    }

    /// Compile `schema` and check `value` against it.
    ///
    /// # Errors
    ///
    /// Returns `RxError::Definition` if the schema does not compile and
    /// `RxError::Validation` if the value does not conform.
    pub fn validate(&self, schema: &Value, value: &Value) -> Result<(), RxError> {
        self.compile(schema)?.check(value)?;
        Ok(())
    }

    /// Returns true if `uri` names a registered type.
    pub fn has_type(&self, uri: &str) -> bool {
        self.types.contains_key(uri)
    }

    /// All registered type URIs, sorted.
    pub fn type_uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.types.keys().map(|s| s.as_str()).collect();
        uris.sort_unstable();
        uris
    }

    /// All registered prefixes and their bases, sorted by prefix.
    pub fn prefixes(&self) -> Vec<(&str, &str)> {
        let mut prefixes: Vec<(&str, &str)> = self
            .prefixes
            .iter()
            .map(|(name, base)| (name.as_str(), base.as_str()))
            .collect();
        prefixes.sort_unstable();
        prefixes
    }
}
