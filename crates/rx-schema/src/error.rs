//! # Error Types — Definition vs. Validation
//!
//! Two tiers, kept deliberately separate:
//!
//! - [`DefinitionError`] — the schema or the registry is wrong: unknown
//!   type, malformed parameters, duplicate registration. Raised while
//!   registering or compiling; compilation stops at the first one.
//! - [`ValidationError`] — the schema is fine but a value does not
//!   conform. Carries the checker kind, the location path, the offending
//!   value, and a message.
//!
//! [`RxError`] wraps both for callers that compile and check in one step.

use serde_json::Value;
use thiserror::Error;

use crate::checker::CheckerKind;
use crate::path::{LocationPath, PathSegment};

/// A schema document or registry operation is invalid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// The type name is neither a URI nor a `/prefix/name` short form.
    #[error("couldn't understand type name '{0}'")]
    UnrecognizedTypeName(String),

    /// The short form names a prefix that is not registered.
    #[error("unknown prefix '{prefix}' in type name '{name}'")]
    UnknownPrefix {
        /// The prefix part of the type name.
        prefix: String,
        /// The full type name as written.
        name: String,
    },

    /// The prefix is already registered.
    #[error("the prefix '{0}' is already registered")]
    DuplicatePrefix(String),

    /// A type is already registered under this URI.
    #[error("type already registered for {0}")]
    DuplicateType(String),

    /// No type is registered under this URI.
    #[error("unknown type {0}")]
    UnknownType(String),

    /// The schema document is not a type name or a mapping with a `type`.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// A native type was given a parameter it does not accept.
    #[error("unknown parameter '{param}' for {checker}")]
    UnknownParameter {
        /// Short name of the checker, e.g. `//str`.
        checker: String,
        /// The offending key.
        param: String,
    },

    /// A native type is missing a parameter it needs.
    #[error("missing parameter '{param}' for {checker}")]
    MissingParameter {
        /// Short name of the checker.
        checker: String,
        /// The absent key.
        param: String,
    },

    /// A parameter is present but has the wrong shape.
    #[error("invalid '{param}' parameter for {checker}: {reason}")]
    InvalidParameter {
        /// Short name of the checker.
        checker: String,
        /// The offending key.
        param: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A learned type was referenced with parameters besides `type`.
    #[error("composed type {0} does not take check arguments")]
    AliasParameters(String),

    /// A record field is listed as both required and optional.
    #[error("'{0}' appears in both required and optional")]
    FieldInRequiredAndOptional(String),

    /// A `//str` pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,
        /// Regex compiler diagnostic.
        reason: String,
    },

    /// A range configuration is malformed.
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

/// A value failed to conform to a compiled schema.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} at {}: {}", .checker.uri(), .path, .message)]
pub struct ValidationError {
    /// Kind of the checker that detected the failure.
    pub checker: CheckerKind,
    /// Location of the failing value, relative to the validated root.
    pub path: LocationPath,
    /// The failing value.
    pub value: Value,
    /// Human-readable description of the failure.
    pub message: String,
    /// Failures of each alternative, populated only by `//any`.
    pub causes: Vec<ValidationError>,
}

impl ValidationError {
    /// Build an error, snapshotting the current path.
    pub(crate) fn new(
        checker: CheckerKind,
        path: &[PathSegment],
        value: &Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            checker,
            path: LocationPath::from(path),
            value: value.clone(),
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Attach the failures this error aggregates.
    pub(crate) fn with_causes(mut self, causes: Vec<ValidationError>) -> Self {
        self.causes = causes;
        self
    }
}

/// Either tier of error, for one-shot compile-and-check calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RxError {
    /// The schema could not be compiled.
    #[error("schema definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// The value does not conform.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Convenience alias for registry and compilation results.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_error_display_root() {
        let err = ValidationError::new(CheckerKind::Boolean, &[], &json!(1), "boolean expected");
        assert_eq!(
            err.to_string(),
            "tag:codesimply.com,2008:rx/core/bool at (root): boolean expected"
        );
    }

    #[test]
    fn test_validation_error_display_nested() {
        let path = [PathSegment::from("items"), PathSegment::from(3), PathSegment::from("name")];
        let err = ValidationError::new(CheckerKind::String, &path, &json!(7), "string expected");
        assert!(err.to_string().contains(" at .items[3].name: string expected"));
        assert_eq!(err.value, json!(7));
    }

    #[test]
    fn test_rx_error_from_definition() {
        let err: RxError = DefinitionError::UnknownType("tag:x:y".to_string()).into();
        assert!(matches!(err, RxError::Definition(_)));
        assert!(err.to_string().contains("unknown type tag:x:y"));
    }
}
