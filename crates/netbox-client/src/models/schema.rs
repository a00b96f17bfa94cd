//! Field-level shape checks run before typed deserialization
//!
//! serde alone reports "missing field `x`" without saying which resource it
//! was reading, and cannot point into nested references. Each resource
//! declares its fields here so a failure names the kind, the dotted field
//! path and the expected shape. Keys not listed are never inspected.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::ResourceKind;

/// Validation failure of a record against its declared resource shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} schema violation at `{field}`: {problem}")]
pub struct SchemaViolation {
    /// Resource kind being validated
    pub kind: ResourceKind,
    /// Dotted path of the offending field (`<record>` for the record itself)
    pub field: String,
    /// What was wrong
    pub problem: Problem,
}

/// Kind of schema failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A required field is absent
    Missing,
    /// The field is present with the wrong JSON shape
    WrongShape {
        /// Shape the schema declares
        expected: &'static str,
        /// Shape actually found
        found: &'static str,
    },
    /// Typed deserialization rejected the value (e.g. integer out of range)
    Invalid(String),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("required field is missing"),
            Self::WrongShape { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::Invalid(message) => f.write_str(message),
        }
    }
}

/// JSON shape a declared field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Integer,
    U16,
    String,
    Bool,
    Nested,
    Choice,
    NestedList,
}

impl Shape {
    fn describe(self) -> &'static str {
        match self {
            Self::Integer => "a non-negative integer",
            Self::U16 => "an integer between 0 and 65535",
            Self::String => "a string",
            Self::Bool => "a boolean",
            Self::Nested => "an {id, display} object",
            Self::Choice => "a {value, label} object",
            Self::NestedList => "a list of {id, display} objects",
        }
    }
}

/// Whether a field may be absent or null
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    /// Must be present and non-null
    Required,
    /// May be absent or null
    Optional,
    /// May be absent (a default applies) but not null
    Defaulted,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub name: &'static str,
    pub shape: Shape,
    pub presence: Presence,
}

pub(crate) const fn required(name: &'static str, shape: Shape) -> FieldSpec {
    FieldSpec { name, shape, presence: Presence::Required }
}

pub(crate) const fn optional(name: &'static str, shape: Shape) -> FieldSpec {
    FieldSpec { name, shape, presence: Presence::Optional }
}

pub(crate) const fn defaulted(name: &'static str, shape: Shape) -> FieldSpec {
    FieldSpec { name, shape, presence: Presence::Defaulted }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Check `raw` against `fields`, reporting the first violation.
pub(crate) fn check(kind: ResourceKind, raw: &Value, fields: &[FieldSpec]) -> Result<(), SchemaViolation> {
    let Some(object) = raw.as_object() else {
        return Err(SchemaViolation {
            kind,
            field: "<record>".to_string(),
            problem: Problem::WrongShape {
                expected: "an object",
                found: json_kind(raw),
            },
        });
    };

    for declared in fields {
        match (object.get(declared.name), declared.presence) {
            (None, Presence::Required) | (Some(Value::Null), Presence::Required) => {
                return Err(SchemaViolation {
                    kind,
                    field: declared.name.to_string(),
                    problem: Problem::Missing,
                });
            }
            (None, _) | (Some(Value::Null), Presence::Optional) => {}
            (Some(value), _) => check_shape(kind, declared.name, declared.shape, value)?,
        }
    }
    Ok(())
}

fn check_shape(kind: ResourceKind, path: &str, shape: Shape, value: &Value) -> Result<(), SchemaViolation> {
    let wrong = |found: &Value| SchemaViolation {
        kind,
        field: path.to_string(),
        problem: Problem::WrongShape {
            expected: shape.describe(),
            found: json_kind(found),
        },
    };

    match shape {
        Shape::Integer if value.is_u64() => Ok(()),
        Shape::U16 if value.as_u64().is_some_and(|n| u16::try_from(n).is_ok()) => Ok(()),
        Shape::String if value.is_string() => Ok(()),
        Shape::Bool if value.is_boolean() => Ok(()),
        Shape::Nested if value.is_object() => {
            check_member(kind, path, value, "id", Shape::Integer)?;
            check_member(kind, path, value, "display", Shape::String)
        }
        Shape::Choice if value.is_object() => {
            check_member(kind, path, value, "value", Shape::String)?;
            check_member(kind, path, value, "label", Shape::String)
        }
        Shape::NestedList => {
            let items = value.as_array().ok_or_else(|| wrong(value))?;
            for (index, item) in items.iter().enumerate() {
                check_shape(kind, &format!("{path}[{index}]"), Shape::Nested, item)?;
            }
            Ok(())
        }
        _ => Err(wrong(value)),
    }
}

fn check_member(
    kind: ResourceKind,
    parent: &str,
    value: &Value,
    member: &str,
    shape: Shape,
) -> Result<(), SchemaViolation> {
    let path = format!("{parent}.{member}");
    match value.get(member) {
        None | Some(Value::Null) => Err(SchemaViolation {
            kind,
            field: path,
            problem: Problem::Missing,
        }),
        Some(inner) => check_shape(kind, &path, shape, inner),
    }
}
