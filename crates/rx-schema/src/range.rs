//! # Range Checks
//!
//! Numeric bounds shared by `//arr` and `//str` lengths and by `//int` and
//! `//num` values. A range is configured by a mapping with any of:
//!
//! | Key | Bound |
//! |---|---|
//! | `min` | `value >= min` |
//! | `min-ex` | `value > min-ex` |
//! | `max-ex` | `value < max-ex` |
//! | `max` | `value <= max` |
//!
//! `min-exclusive` and `max-exclusive` are accepted as long-form spellings
//! of `min-ex` and `max-ex`. All configured bounds must hold.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::{DefinitionError, DefinitionResult};

/// A compiled set of numeric bounds. Unset bounds are unconstrained.
///
/// Bounds keep their JSON number representation; integer bounds compare
/// exactly against integer values across the whole `i64`/`u64` domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeCheck {
    min: Option<Number>,
    min_ex: Option<Number>,
    max_ex: Option<Number>,
    max: Option<Number>,
}

impl RangeCheck {
    /// Build a range from its configuration mapping.
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::InvalidRange` if the configuration is not a
    /// mapping, has an unknown key, gives a non-numeric bound, or spells the
    /// same bound twice.
    pub fn from_config(config: &Value) -> DefinitionResult<Self> {
        let options = config.as_object().ok_or_else(|| {
            DefinitionError::InvalidRange(format!("expected a mapping, got {config}"))
        })?;

        let mut range = Self::default();
        for (key, bound) in options {
            let slot = match key.as_str() {
                "min" => &mut range.min,
                "min-ex" | "min-exclusive" => &mut range.min_ex,
                "max-ex" | "max-exclusive" => &mut range.max_ex,
                "max" => &mut range.max,
                other => {
                    return Err(DefinitionError::InvalidRange(format!(
                        "illegal argument '{other}'"
                    )))
                }
            };
            if slot.is_some() {
                return Err(DefinitionError::InvalidRange(format!(
                    "bound '{key}' given more than once"
                )));
            }
            *slot = Some(numeric_bound(key, bound)?);
        }

        Ok(range)
    }

    /// Returns true if `value` satisfies every configured bound.
    pub fn contains(&self, value: &Number) -> bool {
        let holds = |bound: &Option<Number>, ok: fn(Ordering) -> bool| {
            bound
                .as_ref()
                .map_or(true, |b| compare_numbers(value, b).is_some_and(ok))
        };
        holds(&self.min, Ordering::is_ge)
            && holds(&self.min_ex, Ordering::is_gt)
            && holds(&self.max_ex, Ordering::is_lt)
            && holds(&self.max, Ordering::is_le)
    }

    /// Returns true if `len` satisfies every configured bound.
    pub fn contains_len(&self, len: usize) -> bool {
        self.contains(&Number::from(len as u64))
    }
}

/// Order two JSON numbers. Integers compare exactly; a float on either side
/// falls back to `f64`. `None` only for NaN, which JSON cannot carry.
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_i128(a), as_i128(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn as_i128(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn numeric_bound(key: &str, bound: &Value) -> DefinitionResult<Number> {
    match bound {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(DefinitionError::InvalidRange(format!(
            "bound '{key}' must be a number, got {bound}"
        ))),
    }
}

impl fmt::Display for RangeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(min) = &self.min {
            parts.push(format!(">= {min}"));
        }
        if let Some(min_ex) = &self.min_ex {
            parts.push(format!("> {min_ex}"));
        }
        if let Some(max_ex) = &self.max_ex {
            parts.push(format!("< {max_ex}"));
        }
        if let Some(max) = &self.max {
            parts.push(format!("<= {max}"));
        }
        if parts.is_empty() {
            f.write_str("any")
        } else {
            f.write_str(&parts.join(" and "))
        }
    }
}

/// Read an optional range parameter out of a schema mapping. An explicit
/// null is the same as leaving the parameter out.
pub(crate) fn optional_range(
    checker: &str,
    params: &Map<String, Value>,
    key: &str,
) -> DefinitionResult<Option<RangeCheck>> {
    params
        .get(key)
        .filter(|config| !config.is_null())
        .map(|config| {
            RangeCheck::from_config(config).map_err(|e| DefinitionError::InvalidParameter {
                checker: checker.to_string(),
                param: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The predicate agrees with the arithmetic meaning of each bound.
        #[test]
        fn range_matches_definition(
            lo in -1000i64..1000,
            span in 0i64..1000,
            value in -3000i64..3000,
        ) {
            let hi = lo + span;
            let inclusive = RangeCheck::from_config(&json_bounds("min", lo, "max", hi)).unwrap();
            prop_assert_eq!(inclusive.contains(&Number::from(value)), lo <= value && value <= hi);

            let exclusive = RangeCheck::from_config(&json_bounds("min-ex", lo, "max-ex", hi)).unwrap();
            prop_assert_eq!(exclusive.contains(&Number::from(value)), lo < value && value < hi);
        }
    }

    fn json_bounds(lo_key: &str, lo: i64, hi_key: &str, hi: i64) -> Value {
        let mut map = Map::new();
        map.insert(lo_key.to_string(), Value::from(lo));
        map.insert(hi_key.to_string(), Value::from(hi));
        Value::Object(map)
    }
}
