//! Scalar kinds, kind categories and the category-width carrier values that
//! conversion strategies hand to field setters.

use std::fmt;

use crate::error::ConvertError;
use crate::value::Value;

/// Concrete kind a record field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 14] = [
        ScalarKind::Bool,
        ScalarKind::I8,
        ScalarKind::I16,
        ScalarKind::I32,
        ScalarKind::I64,
        ScalarKind::Isize,
        ScalarKind::U8,
        ScalarKind::U16,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::Usize,
        ScalarKind::F32,
        ScalarKind::F64,
        ScalarKind::String,
    ];

    /// Rust spelling of the kind.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::String => "String",
        }
    }

    pub const fn category(self) -> KindCategory {
        match self {
            ScalarKind::Bool => KindCategory::Bool,
            ScalarKind::I8
            | ScalarKind::I16
            | ScalarKind::I32
            | ScalarKind::I64
            | ScalarKind::Isize => KindCategory::Signed,
            ScalarKind::U8
            | ScalarKind::U16
            | ScalarKind::U32
            | ScalarKind::U64
            | ScalarKind::Usize => KindCategory::Unsigned,
            ScalarKind::F32 | ScalarKind::F64 => KindCategory::Float,
            ScalarKind::String => KindCategory::Text,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse grouping of kinds that share a carrier representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindCategory {
    Bool,
    Signed,
    Unsigned,
    Float,
    Text,
}

impl KindCategory {
    pub const fn name(self) -> &'static str {
        match self {
            KindCategory::Bool => "bool",
            KindCategory::Signed => "signed integer",
            KindCategory::Unsigned => "unsigned integer",
            KindCategory::Float => "float",
            KindCategory::Text => "text",
        }
    }
}

impl fmt::Display for KindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Widest representation of a category. Setters narrow it to the field width.
#[derive(Debug, Clone, PartialEq)]
pub enum Carrier {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
}

impl Carrier {
    pub fn category(&self) -> KindCategory {
        match self {
            Carrier::Bool(_) => KindCategory::Bool,
            Carrier::Int(_) => KindCategory::Signed,
            Carrier::Uint(_) => KindCategory::Unsigned,
            Carrier::Float(_) => KindCategory::Float,
            Carrier::Text(_) => KindCategory::Text,
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Carrier::Bool(v) => write!(f, "{v}"),
            Carrier::Int(v) => write!(f, "{v}"),
            Carrier::Uint(v) => write!(f, "{v}"),
            Carrier::Float(v) => write!(f, "{v}"),
            Carrier::Text(v) => f.write_str(v),
        }
    }
}

/// A Rust type usable as a mapped record field.
///
/// Implemented for `bool`, every fixed and pointer-sized integer, `f32`, `f64`
/// and `String`. Generated record accessors go through this trait.
pub trait ScalarField: Sized {
    const KIND: ScalarKind;

    /// The field's natural value, without widening.
    fn to_value(&self) -> Value;

    /// Narrows a carrier to this type, failing on a category or range mismatch.
    fn from_carrier(carrier: Carrier) -> Result<Self, ConvertError>;
}

macro_rules! impl_scalar_field_for_int {
    ($($ty:ty => $kind:ident via $carrier:ident),* $(,)?) => {
        $(
            impl ScalarField for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn to_value(&self) -> Value {
                    Value::$kind(*self)
                }

                fn from_carrier(carrier: Carrier) -> Result<Self, ConvertError> {
                    match carrier {
                        Carrier::$carrier(raw) => <$ty>::try_from(raw).map_err(|_| {
                            ConvertError::OutOfRange {
                                value: raw.to_string(),
                                kind: Self::KIND,
                            }
                        }),
                        other => Err(ConvertError::representation(Self::KIND, &other)),
                    }
                }
            }
        )*
    };
}

impl_scalar_field_for_int!(
    i8 => I8 via Int,
    i16 => I16 via Int,
    i32 => I32 via Int,
    i64 => I64 via Int,
    isize => Isize via Int,
    u8 => U8 via Uint,
    u16 => U16 via Uint,
    u32 => U32 via Uint,
    u64 => U64 via Uint,
    usize => Usize via Uint,
);

impl ScalarField for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_carrier(carrier: Carrier) -> Result<Self, ConvertError> {
        match carrier {
            Carrier::Bool(v) => Ok(v),
            other => Err(ConvertError::representation(Self::KIND, &other)),
        }
    }
}

impl ScalarField for f32 {
    const KIND: ScalarKind = ScalarKind::F32;

    fn to_value(&self) -> Value {
        Value::F32(*self)
    }

    fn from_carrier(carrier: Carrier) -> Result<Self, ConvertError> {
        match carrier {
            Carrier::Float(raw) => {
                let narrowed = raw as f32;
                // Non-finite inputs pass through; finite ones must stay finite.
                if raw.is_finite() && !narrowed.is_finite() {
                    return Err(ConvertError::OutOfRange {
                        value: raw.to_string(),
                        kind: Self::KIND,
                    });
                }
                Ok(narrowed)
            }
            other => Err(ConvertError::representation(Self::KIND, &other)),
        }
    }
}

impl ScalarField for f64 {
    const KIND: ScalarKind = ScalarKind::F64;

    fn to_value(&self) -> Value {
        Value::F64(*self)
    }

    fn from_carrier(carrier: Carrier) -> Result<Self, ConvertError> {
        match carrier {
            Carrier::Float(v) => Ok(v),
            other => Err(ConvertError::representation(Self::KIND, &other)),
        }
    }
}

impl ScalarField for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_carrier(carrier: Carrier) -> Result<Self, ConvertError> {
        match carrier {
            Carrier::Text(v) => Ok(v),
            other => Err(ConvertError::representation(Self::KIND, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_belongs_to_one_category() {
        let signed = ScalarKind::ALL
            .iter()
            .filter(|kind| kind.category() == KindCategory::Signed)
            .count();
        let unsigned = ScalarKind::ALL
            .iter()
            .filter(|kind| kind.category() == KindCategory::Unsigned)
            .count();
        assert_eq!(signed, 5);
        assert_eq!(unsigned, 5);
        assert_eq!(ScalarKind::String.category(), KindCategory::Text);
        assert_eq!(ScalarKind::F32.to_string(), "f32");
    }

    #[test]
    fn integers_narrow_with_range_checks() {
        assert_eq!(u8::from_carrier(Carrier::Uint(255)), Ok(255));
        assert_eq!(
            u8::from_carrier(Carrier::Uint(300)),
            Err(ConvertError::OutOfRange {
                value: "300".to_string(),
                kind: ScalarKind::U8,
            })
        );
        assert_eq!(i8::from_carrier(Carrier::Int(-128)), Ok(-128));
        assert!(i16::from_carrier(Carrier::Int(i64::from(i16::MAX) + 1)).is_err());
        assert_eq!(i64::from_carrier(Carrier::Int(i64::MIN)), Ok(i64::MIN));
    }

    #[test]
    fn wrong_category_is_a_representation_error() {
        let err = u32::from_carrier(Carrier::Int(4)).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Representation {
                kind: ScalarKind::U32,
                expected: KindCategory::Unsigned,
                got: KindCategory::Signed,
            }
        );
        assert!(String::from_carrier(Carrier::Bool(true)).is_err());
        assert!(bool::from_carrier(Carrier::Text("true".into())).is_err());
    }

    #[test]
    fn f32_narrowing_rejects_finite_overflow() {
        assert_eq!(f32::from_carrier(Carrier::Float(3.14)), Ok(3.14f32));
        assert!(f32::from_carrier(Carrier::Float(1e300)).is_err());
        assert!(f32::from_carrier(Carrier::Float(f64::INFINITY)).is_ok_and(f32::is_infinite));
    }

    #[test]
    fn to_value_keeps_the_natural_width() {
        assert_eq!(8u8.to_value(), Value::U8(8));
        assert_eq!((-1isize).to_value(), Value::Isize(-1));
        assert_eq!("s".to_string().to_value(), Value::String("s".into()));
    }
}
