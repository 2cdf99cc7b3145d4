//! Raw text → typed IFC value.
//!
//! Empty input never fails: it yields the kind's zero value (`false`, `0`,
//! `0.0`, or the `"NaN"` text sentinel). Non-empty text that does not parse
//! as the declared number kind is an `Error::Coercion`, which callers turn
//! into an `IfcLabel` of the raw text via [`coerce_or_label`].

use serde_json::Number;

use crate::model::{NAN_SENTINEL, Primitive, PrimitiveKind, TypedValue};
use crate::{Error, Result};

const TRUTHY: &[&str] = &["true", "1", "t", "yes"];

/// Zero value of a kind, used for empty input.
pub fn default_for(kind: PrimitiveKind) -> Primitive {
    match kind {
        PrimitiveKind::Boolean => Primitive::Boolean(false),
        PrimitiveKind::Integer => Primitive::Integer(0),
        PrimitiveKind::Float => Primitive::Float(0.0),
        PrimitiveKind::Text => Primitive::Text(NAN_SENTINEL.to_string()),
    }
}

/// Parse `raw` as `kind`. `None` means the text did not parse.
pub fn parse_primitive(kind: PrimitiveKind, raw: Option<&str>) -> Option<Primitive> {
    let Some(text) = raw.filter(|t| !t.is_empty()) else {
        return Some(default_for(kind));
    };
    match kind {
        PrimitiveKind::Boolean => Some(Primitive::Boolean(TRUTHY.contains(&text.to_lowercase().as_str()))),
        PrimitiveKind::Integer => text.trim().parse::<i64>().ok().map(Primitive::Integer),
        PrimitiveKind::Float => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Primitive::Float),
        PrimitiveKind::Text => Some(Primitive::Text(text.to_string())),
    }
}

/// Coerce raw text into the declared IFC type.
///
/// Fails with `Error::UnknownDataType` for a type the schema does not know,
/// and with `Error::Coercion` for unparsable numbers.
pub fn coerce(declared_type: &str, raw: Option<&str>) -> Result<TypedValue> {
    let kind = PrimitiveKind::for_type(declared_type)?;
    let value = parse_primitive(kind, raw).ok_or_else(|| Error::Coercion {
        type_name: declared_type.to_string(),
        raw: raw.unwrap_or_default().to_string(),
    })?;
    Ok(TypedValue::new(declared_type, value))
}

/// [`coerce`], falling back to `IfcLabel(raw)` when the text does not parse.
pub fn coerce_or_label(declared_type: &str, raw: Option<&str>) -> Result<TypedValue> {
    match coerce(declared_type, raw) {
        Err(Error::Coercion { type_name, raw }) => {
            tracing::debug!(%type_name, %raw, "value does not parse, keeping it as a label");
            Ok(TypedValue::label(raw))
        }
        other => other,
    }
}

/// Coerce a JSON number. Integer types also take floats without a
/// fractional part, so `50.0` reads as `50`.
pub fn coerce_number_or_label(declared_type: &str, number: &Number) -> Result<TypedValue> {
    if PrimitiveKind::for_type(declared_type)? == PrimitiveKind::Integer {
        if let Some(n) = integral(number) {
            return Ok(TypedValue::new(declared_type, Primitive::Integer(n)));
        }
    }
    coerce_or_label(declared_type, Some(&number.to_string()))
}

fn integral(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean() {
        for yes in ["true", "True", "TRUE", "1", "t", "T", "yes", "Yes"] {
            assert_eq!(parse_primitive(PrimitiveKind::Boolean, Some(yes)), Some(Primitive::Boolean(true)), "{yes}");
        }
        for no in ["false", "0", "no", "y", " true"] {
            assert_eq!(parse_primitive(PrimitiveKind::Boolean, Some(no)), Some(Primitive::Boolean(false)), "{no}");
        }
    }

    #[test]
    fn test_empty_defaults() {
        assert_eq!(coerce("IfcBoolean", None).unwrap().value, Primitive::Boolean(false));
        assert_eq!(coerce("IfcInteger", Some("")).unwrap().value, Primitive::Integer(0));
        assert_eq!(coerce("IfcReal", None).unwrap().value, Primitive::Float(0.0));
        assert_eq!(coerce("IfcLabel", None).unwrap().value, Primitive::Text("NaN".into()));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce("IfcInteger", Some(" 42 ")).unwrap().value, Primitive::Integer(42));
        assert_eq!(coerce("IfcMassMeasure", Some("12.5")).unwrap().value, Primitive::Float(12.5));
        assert_eq!(coerce("IfcReal", Some("1e3")).unwrap().value, Primitive::Float(1000.0));
    }

    #[test]
    fn test_declared_type_kept() {
        let v = coerce("IfcMassMeasure", Some("1")).unwrap();
        assert_eq!(v.type_name, "IfcMassMeasure");
    }

    #[test]
    fn test_parse_failure_is_coercion_error() {
        assert!(matches!(coerce("IfcReal", Some("n/a")), Err(Error::Coercion { .. })));
        assert!(matches!(coerce("IfcInteger", Some("4.5")), Err(Error::Coercion { .. })));
        assert!(matches!(coerce("IfcReal", Some("inf")), Err(Error::Coercion { .. })));
    }

    #[test]
    fn test_fallback_to_label() {
        assert_eq!(coerce_or_label("IfcReal", Some("n/a")).unwrap(), TypedValue::label("n/a"));
        assert_eq!(coerce_or_label("IfcReal", Some("2")).unwrap(), TypedValue::new("IfcReal", 2.0));
    }

    #[test]
    fn test_integral_numbers_for_integer_types() {
        let fifty = Number::from_f64(50.0).unwrap();
        assert_eq!(coerce_number_or_label("IfcInteger", &fifty).unwrap(), TypedValue::new("IfcInteger", Primitive::Integer(50)));
        assert_eq!(coerce_number_or_label("IfcTimeStamp", &Number::from(7)).unwrap().value, Primitive::Integer(7));

        let half = Number::from_f64(0.5).unwrap();
        assert_eq!(coerce_number_or_label("IfcInteger", &half).unwrap(), TypedValue::label("0.5"));
        assert_eq!(coerce_number_or_label("IfcReal", &half).unwrap(), TypedValue::new("IfcReal", 0.5));
    }

    #[test]
    fn test_less_common_types_coerce() {
        for name in [
            "IfcLanguageId",
            "IfcPHMeasure",
            "IfcParameterValue",
            "IfcMolecularWeightMeasure",
            "IfcTorqueMeasure",
            "IfcWellKnownTextLiteral",
            "IfcSpecularExponent",
            "IfcLuminousIntensityMeasure",
        ] {
            let value = coerce_or_label(name, Some("1")).unwrap();
            assert_eq!(value.type_name, name);
        }
    }

    #[test]
    fn test_unknown_type_propagates() {
        assert!(matches!(coerce_or_label("IfcWall", Some("x")), Err(Error::UnknownDataType(_))));
    }
}
