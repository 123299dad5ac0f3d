//! # Checker Family
//!
//! A compiled schema is a tree of [`Checker`] nodes. Each node is one of the
//! fourteen core Rx types; composite nodes own their children outright, so a
//! tree is immutable, acyclic, and `Send + Sync` once built.
//!
//! ## Validation Protocol
//!
//! [`Checker::check`] allocates a fresh location path for every call and
//! walks the value. Composite checkers extend the path by exactly one
//! segment per child and restore it on every exit, success or failure.
//! Scalar checkers never touch the path. Every checker except `//any`
//! stops at the first failure; `//any` collects one failure per
//! alternative and reports them together.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::error::{DefinitionError, DefinitionResult, ValidationError};
use crate::path::{descend, PathSegment};
use crate::range::{compare_numbers, optional_range, RangeCheck};
use crate::registry::Registry;

/// URI base of the core Rx types.
pub const CORE_BASE: &str = "tag:codesimply.com,2008:rx/core/";

/// URI base reserved for Rx meta-schemas.
pub const META_BASE: &str = "tag:codesimply.com,2008:rx/meta/";

/// The fourteen native checker kinds.
///
/// A kind is what the registry stores for a native type: given a schema
/// mapping, [`Registry::compile`] hands it to the kind to build a
/// [`Checker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckerKind {
    AllOf,
    AnyOf,
    Array,
    Boolean,
    Defined,
    Fail,
    Integer,
    Map,
    Nil,
    Number,
    Scalar,
    Record,
    FixedSequence,
    String,
}

impl CheckerKind {
    /// Every native kind, in registration order.
    pub const ALL: [CheckerKind; 14] = [
        Self::AllOf,
        Self::AnyOf,
        Self::Array,
        Self::Boolean,
        Self::Defined,
        Self::Fail,
        Self::Integer,
        Self::Map,
        Self::Nil,
        Self::Number,
        Self::Scalar,
        Self::Record,
        Self::FixedSequence,
        Self::String,
    ];

    /// Local name under the core prefix, e.g. `"arr"`.
    pub fn subname(self) -> &'static str {
        match self {
            Self::AllOf => "all",
            Self::AnyOf => "any",
            Self::Array => "arr",
            Self::Boolean => "bool",
            Self::Defined => "def",
            Self::Fail => "fail",
            Self::Integer => "int",
            Self::Map => "map",
            Self::Nil => "nil",
            Self::Number => "num",
            Self::Scalar => "one",
            Self::Record => "rec",
            Self::FixedSequence => "seq",
            Self::String => "str",
        }
    }

    /// Canonical type URI.
    pub fn uri(self) -> String {
        format!("{CORE_BASE}{}", self.subname())
    }

    /// Parameters accepted besides `type`.
    fn params(self) -> &'static [&'static str] {
        match self {
            Self::AllOf | Self::AnyOf => &["of"],
            Self::Array => &["contents", "length"],
            Self::Integer | Self::Number => &["range", "value"],
            Self::Map => &["values"],
            Self::Record => &["required", "optional", "rest"],
            Self::FixedSequence => &["contents", "tail"],
            Self::String => &["value", "pattern", "length"],
            Self::Boolean | Self::Defined | Self::Fail | Self::Nil | Self::Scalar => &[],
        }
    }
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}", self.subname())
    }
}

/// A compiled schema node.
#[derive(Debug, Clone)]
pub enum Checker {
    /// `//all`: every alternative must pass, checked in order.
    AllOf { of: Vec<Checker> },
    /// `//any`: at least one alternative must pass; `None` accepts anything.
    AnyOf { of: Option<Vec<Checker>> },
    /// `//arr`: homogeneous sequence.
    Array {
        contents: Box<Checker>,
        length: Option<RangeCheck>,
    },
    /// `//bool`
    Boolean,
    /// `//def`: anything but null.
    Defined,
    /// `//fail`: nothing.
    Fail,
    /// `//int`
    Integer {
        value: Option<Number>,
        range: Option<RangeCheck>,
    },
    /// `//map`: string-keyed mapping with homogeneous values.
    Map { values: Box<Checker> },
    /// `//nil`
    Nil,
    /// `//num`
    Number {
        value: Option<Number>,
        range: Option<RangeCheck>,
    },
    /// `//one`: boolean, number, or string.
    Scalar,
    /// `//rec`: mapping with named fields.
    Record {
        required: BTreeMap<String, Checker>,
        optional: BTreeMap<String, Checker>,
        rest: Option<Box<Checker>>,
    },
    /// `//seq`: positional sequence with an optional tail.
    FixedSequence {
        contents: Vec<Checker>,
        tail: Option<Box<Checker>>,
    },
    /// `//str`
    String {
        value: Option<String>,
        pattern: Option<Regex>,
        length: Option<RangeCheck>,
    },
}

impl Checker {
    /// Build a native checker from its schema mapping.
    ///
    /// `params` is the full schema mapping including `type`. Child schemas
    /// are compiled through `registry`.
    ///
    /// # Errors
    ///
    /// Returns a `DefinitionError` for unknown or malformed parameters, or
    /// for any error compiling a child schema.
    pub(crate) fn build(
        kind: CheckerKind,
        params: &Map<String, Value>,
        registry: &Registry,
    ) -> DefinitionResult<Self> {
        if let Some(param) = params
            .keys()
            .find(|k| k.as_str() != "type" && !kind.params().contains(&k.as_str()))
        {
            return Err(DefinitionError::UnknownParameter {
                checker: kind.to_string(),
                param: param.clone(),
            });
        }

        let p = Params { kind, params };
        let checker = match kind {
            CheckerKind::AllOf => Self::AllOf {
                of: p
                    .required_list("of")?
                    .iter()
                    .map(|s| registry.compile(s))
                    .collect::<DefinitionResult<_>>()?,
            },
            CheckerKind::AnyOf => Self::AnyOf {
                of: p
                    .optional_list("of")?
                    .map(|alts| {
                        alts.iter()
                            .map(|s| registry.compile(s))
                            .collect::<DefinitionResult<Vec<_>>>()
                    })
                    .transpose()?,
            },
            CheckerKind::Array => Self::Array {
                contents: Box::new(registry.compile(p.required("contents")?)?),
                length: optional_range(&kind.to_string(), params, "length")?,
            },
            CheckerKind::Boolean => Self::Boolean,
            CheckerKind::Defined => Self::Defined,
            CheckerKind::Fail => Self::Fail,
            CheckerKind::Integer => Self::Integer {
                value: p.numeric_value(true)?,
                range: optional_range(&kind.to_string(), params, "range")?,
            },
            CheckerKind::Map => Self::Map {
                values: Box::new(registry.compile(p.required("values")?)?),
            },
            CheckerKind::Nil => Self::Nil,
            CheckerKind::Number => Self::Number {
                value: p.numeric_value(false)?,
                range: optional_range(&kind.to_string(), params, "range")?,
            },
            CheckerKind::Scalar => Self::Scalar,
            CheckerKind::Record => build_record(&p, registry)?,
            CheckerKind::FixedSequence => Self::FixedSequence {
                contents: p
                    .required_list("contents")?
                    .iter()
                    .map(|s| registry.compile(s))
                    .collect::<DefinitionResult<_>>()?,
                tail: p
                    .optional("tail")
                    .map(|s| registry.compile(s).map(Box::new))
                    .transpose()?,
            },
            CheckerKind::String => build_string(&p)?,
        };

        Ok(checker)
    }

    /// The kind of this node.
    pub fn kind(&self) -> CheckerKind {
        match self {
            Self::AllOf { .. } => CheckerKind::AllOf,
            Self::AnyOf { .. } => CheckerKind::AnyOf,
            Self::Array { .. } => CheckerKind::Array,
            Self::Boolean => CheckerKind::Boolean,
            Self::Defined => CheckerKind::Defined,
            Self::Fail => CheckerKind::Fail,
            Self::Integer { .. } => CheckerKind::Integer,
            Self::Map { .. } => CheckerKind::Map,
            Self::Nil => CheckerKind::Nil,
            Self::Number { .. } => CheckerKind::Number,
            Self::Scalar => CheckerKind::Scalar,
            Self::Record { .. } => CheckerKind::Record,
            Self::FixedSequence { .. } => CheckerKind::FixedSequence,
            Self::String { .. } => CheckerKind::String,
        }
    }

    /// Validate `value` against this checker.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` for the first failure found (for
    /// `//any`, the aggregate of every alternative's failure).
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let mut path = Vec::new();
        self.check_at(value, &mut path)
    }

    /// Returns true if `value` conforms.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.check(value).is_ok()
    }

    fn reject(
        &self,
        path: &[PathSegment],
        value: &Value,
        message: impl Into<String>,
    ) -> Result<(), ValidationError> {
        Err(ValidationError::new(self.kind(), path, value, message))
    }

    /// Validate `value` that sits at `path` within a larger document.
    ///
    /// Reported paths are prefixed with `path`. On return `path` has the
    /// same segments it had on entry.
    pub fn check_at(
        &self,
        value: &Value,
        path: &mut Vec<PathSegment>,
    ) -> Result<(), ValidationError> {
        match self {
            Self::AllOf { of } => of.iter().try_for_each(|alt| alt.check_at(value, path)),

            Self::AnyOf { of: None } => Ok(()),
            Self::AnyOf { of: Some(alts) } => {
                let mut failures = Vec::with_capacity(alts.len());
                for alt in alts {
                    match alt.check_at(value, path) {
                        Ok(()) => return Ok(()),
                        Err(e) => failures.push(e),
                    }
                }
                let listed: Vec<String> = failures.iter().map(|e| e.to_string()).collect();
                Err(ValidationError::new(
                    self.kind(),
                    path,
                    value,
                    format!(
                        "none of {} alternative(s) matched: [{}]",
                        failures.len(),
                        listed.join("; ")
                    ),
                )
                .with_causes(failures))
            }

            Self::Array { contents, length } => {
                let Value::Array(items) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, sequence expected", type_name(value)),
                    );
                };
                if let Some(range) = length {
                    if !range.contains_len(items.len()) {
                        return self.reject(
                            path,
                            value,
                            format!("length {} not in range {range}", items.len()),
                        );
                    }
                }
                items.iter().enumerate().try_for_each(|(i, item)| {
                    descend(path, PathSegment::Index(i), |path| contents.check_at(item, path))
                })
            }

            Self::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => self.reject(
                    path,
                    value,
                    format!("invalid type {}, boolean expected", type_name(value)),
                ),
            },

            Self::Defined => match value {
                Value::Null => self.reject(path, value, "must not be null".to_string()),
                _ => Ok(()),
            },

            Self::Fail => self.reject(path, value, "forced failure".to_string()),

            Self::Integer { value: expected, range } => {
                let Value::Number(n) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, integer expected", type_name(value)),
                    );
                };
                if !is_integral(n) {
                    return self.reject(path, value, format!("{n} is not an integer"));
                }
                check_number(n, expected.as_ref(), range.as_ref())
                    .or_else(|message| self.reject(path, value, message))
            }

            Self::Map { values } => {
                let Value::Object(entries) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, mapping expected", type_name(value)),
                    );
                };
                entries.iter().try_for_each(|(key, item)| {
                    descend(path, PathSegment::Key(key.clone()), |path| {
                        values.check_at(item, path)
                    })
                })
            }

            Self::Nil => match value {
                Value::Null => Ok(()),
                _ => self.reject(
                    path,
                    value,
                    format!("invalid type {}, null expected", type_name(value)),
                ),
            },

            Self::Number { value: expected, range } => {
                let Value::Number(n) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, number expected", type_name(value)),
                    );
                };
                check_number(n, expected.as_ref(), range.as_ref())
                    .or_else(|message| self.reject(path, value, message))
            }

            Self::Scalar => match value {
                Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
                _ => self.reject(
                    path,
                    value,
                    format!("invalid type {}, single item expected", type_name(value)),
                ),
            },

            Self::Record { required, optional, rest } => {
                let Value::Object(fields) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, mapping expected", type_name(value)),
                    );
                };

                let unknown: Vec<&String> = fields
                    .keys()
                    .filter(|k| !required.contains_key(*k) && !optional.contains_key(*k))
                    .collect();
                if !unknown.is_empty() && rest.is_none() {
                    let names: Vec<&str> = unknown.iter().map(|k| k.as_str()).collect();
                    return self.reject(
                        path,
                        value,
                        format!("unknown key(s): {}", names.join(", ")),
                    );
                }

                for (field, schema) in required {
                    let Some(item) = fields.get(field) else {
                        return self.reject(
                            path,
                            value,
                            format!("required field '{field}' not found"),
                        );
                    };
                    descend(path, PathSegment::Key(field.clone()), |path| {
                        schema.check_at(item, path)
                    })?;
                }

                for (field, schema) in optional {
                    if let Some(item) = fields.get(field) {
                        descend(path, PathSegment::Key(field.clone()), |path| {
                            schema.check_at(item, path)
                        })?;
                    }
                }

                match rest {
                    Some(rest) if !unknown.is_empty() => {
                        let leftover: Map<String, Value> = unknown
                            .into_iter()
                            .filter_map(|k| fields.get(k).map(|v| (k.clone(), v.clone())))
                            .collect();
                        rest.check_at(&Value::Object(leftover), path)
                    }
                    _ => Ok(()),
                }
            }

            Self::FixedSequence { contents, tail } => {
                let Value::Array(items) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, sequence expected", type_name(value)),
                    );
                };
                if items.len() < contents.len() {
                    return self.reject(
                        path,
                        value,
                        format!(
                            "length mismatch (specified: {}, input: {})",
                            contents.len(),
                            items.len()
                        ),
                    );
                }

                for (i, (schema, item)) in contents.iter().zip(items).enumerate() {
                    descend(path, PathSegment::Index(i), |path| schema.check_at(item, path))?;
                }

                if items.len() > contents.len() {
                    let Some(tail) = tail else {
                        return self.reject(
                            path,
                            value,
                            format!(
                                "{} trailing element(s) and no tail schema specified",
                                items.len() - contents.len()
                            ),
                        );
                    };
                    let trailing = Value::Array(items[contents.len()..].to_vec());
                    descend(path, PathSegment::Index(contents.len()), |path| {
                        tail.check_at(&trailing, path)
                    })?;
                }
                Ok(())
            }

            Self::String { value: expected, pattern, length } => {
                let Value::String(s) = value else {
                    return self.reject(
                        path,
                        value,
                        format!("invalid type {}, string expected", type_name(value)),
                    );
                };
                if let Some(expected) = expected {
                    if s != expected {
                        return self.reject(
                            path,
                            value,
                            format!("value mismatch (expected {expected:?})"),
                        );
                    }
                }
                if let Some(pattern) = pattern {
                    if !pattern.is_match(s) {
                        return self.reject(
                            path,
                            value,
                            format!("does not match regular expression /{}/", pattern.as_str()),
                        );
                    }
                }
                if let Some(range) = length {
                    let chars = s.chars().count();
                    if !range.contains_len(chars) {
                        return self.reject(
                            path,
                            value,
                            format!("length {chars} not in range {range}"),
                        );
                    }
                }
                Ok(())
            }
        }
    }
}

/// Accessor over a schema mapping that reports errors against its kind.
struct Params<'a> {
    kind: CheckerKind,
    params: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    /// A present, non-null parameter.
    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.params.get(key).filter(|v| !v.is_null())
    }

    fn required(&self, key: &str) -> DefinitionResult<&'a Value> {
        self.optional(key).ok_or_else(|| DefinitionError::MissingParameter {
            checker: self.kind.to_string(),
            param: key.to_string(),
        })
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> DefinitionError {
        DefinitionError::InvalidParameter {
            checker: self.kind.to_string(),
            param: key.to_string(),
            reason: reason.into(),
        }
    }

    fn optional_list(&self, key: &str) -> DefinitionResult<Option<&'a Vec<Value>>> {
        let Some(value) = self.optional(key) else {
            return Ok(None);
        };
        match value {
            Value::Array(items) if items.is_empty() => {
                Err(self.invalid(key, "must not be empty"))
            }
            Value::Array(items) => Ok(Some(items)),
            other => Err(self.invalid(key, format!("expected a list, got {other}"))),
        }
    }

    fn required_list(&self, key: &str) -> DefinitionResult<&'a Vec<Value>> {
        self.required(key)?;
        self.optional_list(key)?
            .ok_or_else(|| self.invalid(key, "expected a list"))
    }

    fn optional_mapping(&self, key: &str) -> DefinitionResult<Option<&'a Map<String, Value>>> {
        match self.optional(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(self.invalid(key, format!("expected a mapping, got {other}"))),
        }
    }

    fn numeric_value(&self, integral: bool) -> DefinitionResult<Option<Number>> {
        let Some(value) = self.params.get("value") else {
            return Ok(None);
        };
        match value {
            Value::Number(n) if integral && !is_integral(n) => {
                Err(self.invalid("value", format!("{n} is not an integer")))
            }
            Value::Number(n) => Ok(Some(n.clone())),
            other => Err(self.invalid("value", format!("expected a number, got {other}"))),
        }
    }
}

fn build_record(p: &Params<'_>, registry: &Registry) -> DefinitionResult<Checker> {
    let required_fields = p.optional_mapping("required")?;
    let optional_fields = p.optional_mapping("optional")?;

    if let (Some(required), Some(optional)) = (required_fields, optional_fields) {
        if let Some(field) = optional.keys().find(|f| required.contains_key(*f)) {
            return Err(DefinitionError::FieldInRequiredAndOptional(field.clone()));
        }
    }

    let compile_fields = |fields: Option<&Map<String, Value>>| {
        fields
            .into_iter()
            .flatten()
            .map(|(field, schema)| Ok((field.clone(), registry.compile(schema)?)))
            .collect::<DefinitionResult<BTreeMap<_, _>>>()
    };

    Ok(Checker::Record {
        required: compile_fields(required_fields)?,
        optional: compile_fields(optional_fields)?,
        rest: p
            .optional("rest")
            .map(|s| registry.compile(s).map(Box::new))
            .transpose()?,
    })
}

fn build_string(p: &Params<'_>) -> DefinitionResult<Checker> {
    let value = match p.params.get("value") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(p.invalid("value", format!("expected a string, got {other}"))),
    };

    let pattern = match p.params.get("pattern") {
        None => None,
        Some(Value::String(source)) => {
            Some(Regex::new(source).map_err(|e| DefinitionError::InvalidPattern {
                pattern: source.clone(),
                reason: e.to_string(),
            })?)
        }
        Some(other) => {
            return Err(p.invalid("pattern", format!("expected a string, got {other}")))
        }
    };

    Ok(Checker::String {
        value,
        pattern,
        length: optional_range(&p.kind.to_string(), p.params, "length")?,
    })
}

/// Range then exact-value test shared by `//int` and `//num`.
fn check_number(
    n: &Number,
    expected: Option<&Number>,
    range: Option<&RangeCheck>,
) -> Result<(), String> {
    if let Some(range) = range {
        if !range.contains(n) {
            return Err(format!("{n} not in range {range}"));
        }
    }
    if let Some(expected) = expected {
        if !numbers_equal(n, expected) {
            return Err(format!("value mismatch (expected {expected}, got {n})"));
        }
    }
    Ok(())
}

fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// Numeric equality across integer and float representations; `1` equals `1.0`.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    compare_numbers(a, b).is_some_and(Ordering::is_eq)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
