//! Conversion strategies: how a map value becomes a field carrier.
//!
//! A strategy is any [`Converter`]. Two are built in:
//!
//! - [`NoConvert`] accepts only a value of exactly the field's kind.
//! - [`ParseText`] renders the value as text and parses it as the field's
//!   category, so `"9"`, `9i64` and `9u8` all fill a `u8` field.
//!
//! Closures with the right signature are converters too.

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::kind::{Carrier, KindCategory, ScalarKind};
use crate::value::Value;

/// Turns a dynamic value into the carrier for a declared field kind.
pub trait Converter {
    fn convert(&self, value: &Value, kind: ScalarKind) -> Result<Carrier, ConvertError>;
}

impl<F> Converter for F
where
    F: Fn(&Value, ScalarKind) -> Result<Carrier, ConvertError>,
{
    fn convert(&self, value: &Value, kind: ScalarKind) -> Result<Carrier, ConvertError> {
        self(value, kind)
    }
}

/// Strict strategy: the value's concrete kind must equal the field's kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoConvert;

impl NoConvert {
    pub const NAME: &'static str = "no_convert";
}

impl Converter for NoConvert {
    fn convert(&self, value: &Value, kind: ScalarKind) -> Result<Carrier, ConvertError> {
        let carrier = match (value, kind) {
            (Value::Bool(v), ScalarKind::Bool) => Carrier::Bool(*v),
            (Value::I8(v), ScalarKind::I8) => Carrier::Int(i64::from(*v)),
            (Value::I16(v), ScalarKind::I16) => Carrier::Int(i64::from(*v)),
            (Value::I32(v), ScalarKind::I32) => Carrier::Int(i64::from(*v)),
            (Value::I64(v), ScalarKind::I64) => Carrier::Int(*v),
            (Value::Isize(v), ScalarKind::Isize) => Carrier::Int(*v as i64),
            (Value::U8(v), ScalarKind::U8) => Carrier::Uint(u64::from(*v)),
            (Value::U16(v), ScalarKind::U16) => Carrier::Uint(u64::from(*v)),
            (Value::U32(v), ScalarKind::U32) => Carrier::Uint(u64::from(*v)),
            (Value::U64(v), ScalarKind::U64) => Carrier::Uint(*v),
            (Value::Usize(v), ScalarKind::Usize) => Carrier::Uint(*v as u64),
            (Value::F32(v), ScalarKind::F32) => Carrier::Float(f64::from(*v)),
            (Value::F64(v), ScalarKind::F64) => Carrier::Float(*v),
            (Value::String(v), ScalarKind::String) => Carrier::Text(v.clone()),
            _ => {
                return Err(ConvertError::Mismatch {
                    strategy: Self::NAME,
                    value: format!("{value:?}"),
                    kind,
                });
            }
        };
        Ok(carrier)
    }
}

/// Text-parsing strategy: render with `Display`, then parse by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseText;

impl ParseText {
    pub const NAME: &'static str = "parse_text";
}

impl Converter for ParseText {
    fn convert(&self, value: &Value, kind: ScalarKind) -> Result<Carrier, ConvertError> {
        let text = value.to_string();
        match kind.category() {
            KindCategory::Text => Ok(Carrier::Text(text)),
            KindCategory::Bool => match parse_bool(&text) {
                Some(flag) => Ok(Carrier::Bool(flag)),
                None => Err(parse_error(text, kind, "invalid syntax")),
            },
            KindCategory::Signed => match text.parse::<i64>() {
                Ok(parsed) => Ok(Carrier::Int(parsed)),
                Err(err) => Err(parse_error(text, kind, err)),
            },
            KindCategory::Unsigned => {
                if text.starts_with(['+', '-']) {
                    return Err(parse_error(text, kind, "sign not allowed"));
                }
                match text.parse::<u64>() {
                    Ok(parsed) => Ok(Carrier::Uint(parsed)),
                    Err(err) => Err(parse_error(text, kind, err)),
                }
            }
            KindCategory::Float => match text.parse::<f64>() {
                // Finite text too large for f64 parses as infinity.
                Ok(parsed) if parsed.is_infinite() && !spells_infinity(&text) => {
                    Err(parse_error(text, kind, "value out of range"))
                }
                Ok(parsed) => Ok(Carrier::Float(parsed)),
                Err(err) => Err(parse_error(text, kind, err)),
            },
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn spells_infinity(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn parse_error(text: String, kind: ScalarKind, reason: impl ToString) -> ConvertError {
    ConvertError::Parse {
        strategy: ParseText::NAME,
        text,
        kind,
        reason: reason.to_string(),
    }
}

/// Built-in strategy selector, for configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    NoConvert,
    ParseText,
}

impl Converter for Strategy {
    fn convert(&self, value: &Value, kind: ScalarKind) -> Result<Carrier, ConvertError> {
        match self {
            Strategy::NoConvert => NoConvert.convert(value, kind),
            Strategy::ParseText => ParseText.convert(value, kind),
        }
    }
}
