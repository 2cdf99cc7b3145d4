//! Typed IFC values: a declared defined-type name wrapping a primitive.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four primitive kinds every IFC defined type collapses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Float,
    Text,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Text => "string",
        }
    }
}

/// A native value before it is wrapped in its declared IFC type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Primitive {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Boolean(_) => PrimitiveKind::Boolean,
            Primitive::Integer(_) => PrimitiveKind::Integer,
            Primitive::Float(_) => PrimitiveKind::Float,
            Primitive::Text(_) => PrimitiveKind::Text,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Primitive { fn from(v: bool) -> Self { Primitive::Boolean(v) } }
impl From<i64> for Primitive { fn from(v: i64) -> Self { Primitive::Integer(v) } }
impl From<f64> for Primitive { fn from(v: f64) -> Self { Primitive::Float(v) } }
impl From<String> for Primitive { fn from(v: String) -> Self { Primitive::Text(v) } }
impl From<&str> for Primitive { fn from(v: &str) -> Self { Primitive::Text(v.to_owned()) } }

/// A primitive wrapped in its declared IFC defined type, e.g. `IfcReal(0.5)`.
///
/// In a STEP file these are written inline (`IFCREAL(0.5)`), they are not
/// instances of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    pub type_name: String,
    pub value: Primitive,
}

impl TypedValue {
    pub fn new(type_name: impl Into<String>, value: impl Into<Primitive>) -> Self {
        Self { type_name: type_name.into(), value: value.into() }
    }

    /// `IfcLabel` wrapper, the fallback for anything that failed to coerce.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new("IfcLabel", Primitive::Text(text.into()))
    }

    /// The `IfcLabel('NaN')` cell used where a value could not be found.
    pub fn missing() -> Self {
        Self::label(NAN_SENTINEL)
    }

    pub fn is_missing(&self) -> bool {
        self.type_name == "IfcLabel" && self.value.as_str() == Some(NAN_SENTINEL)
    }
}

/// Text placeholder for absent values.
pub const NAN_SENTINEL: &str = "NaN";

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Primitive::Boolean(b) => write!(f, "{}({b})", self.type_name),
            Primitive::Integer(i) => write!(f, "{}({i})", self.type_name),
            Primitive::Float(v) => write!(f, "{}({v})", self.type_name),
            Primitive::Text(s) => write!(f, "{}('{s}')", self.type_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_and_missing() {
        assert_eq!(TypedValue::label("x").value, Primitive::Text("x".into()));
        assert!(TypedValue::missing().is_missing());
        assert!(!TypedValue::label("0").is_missing());
        assert!(!TypedValue::new("IfcText", "NaN").is_missing());
    }

    #[test]
    fn test_display() {
        assert_eq!(TypedValue::new("IfcReal", 0.5).to_string(), "IfcReal(0.5)");
        assert_eq!(TypedValue::label("Concrete").to_string(), "IfcLabel('Concrete')");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Primitive::from("a").as_str(), Some("a"));
        assert_eq!(Primitive::Integer(3).as_str(), None);
        assert_eq!(Primitive::from(true).kind(), PrimitiveKind::Boolean);
    }
}
