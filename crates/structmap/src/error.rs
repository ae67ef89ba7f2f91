use crate::kind::{Carrier, KindCategory, ScalarKind};

/// Failure converting a single value into a field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// The strict strategy saw a value whose concrete kind differs from the field.
    #[error("{strategy}: can't convert {value} to {kind}")]
    Mismatch {
        strategy: &'static str,
        value: String,
        kind: ScalarKind,
    },

    /// A text-parsing strategy could not read the rendered value.
    #[error("{strategy}: can't parse {text:?} as {kind}: {reason}")]
    Parse {
        strategy: &'static str,
        text: String,
        kind: ScalarKind,
        reason: String,
    },

    /// A carrier of the wrong category reached a field setter.
    #[error("expected a {expected} value for {kind}, got a {got} value")]
    Representation {
        kind: ScalarKind,
        expected: KindCategory,
        got: KindCategory,
    },

    /// The carrier does not fit the field's width.
    #[error("value {value} out of range for {kind}")]
    OutOfRange { value: String, kind: ScalarKind },

    /// A record was asked to set a field it does not map.
    #[error("no mappable field at index {index}")]
    NoSuchField { index: usize },
}

impl ConvertError {
    pub(crate) fn representation(kind: ScalarKind, carrier: &Carrier) -> Self {
        ConvertError::Representation {
            kind,
            expected: kind.category(),
            got: carrier.category(),
        }
    }
}

/// Failure of a mapping operation, annotated with where it happened.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    /// Converting the value stored under `path` failed.
    #[error("{operation}, field {}: {source}", join_path(.path))]
    Field {
        operation: &'static str,
        path: Vec<String>,
        #[source]
        source: ConvertError,
    },

    /// An element of an untyped sequence was not an attribute map.
    #[error("{operation}: element {index} is a {actual}, not a map")]
    NotAMap {
        operation: &'static str,
        index: usize,
        actual: &'static str,
    },

    /// A `Record` implementation broke the accessor contract.
    #[error("{operation}: record `{record}` {detail}")]
    Contract {
        operation: &'static str,
        record: &'static str,
        detail: String,
    },
}

impl MapError {
    pub(crate) fn field(operation: &'static str, key: &str, source: ConvertError) -> Self {
        MapError::Field {
            operation,
            path: vec![key.to_string()],
            source,
        }
    }

    /// Prepends a path segment (an element index inside a collection).
    pub fn with_path_prefix(self, segment: impl Into<String>) -> Self {
        match self {
            MapError::Field {
                operation,
                mut path,
                source,
            } => {
                path.insert(0, segment.into());
                MapError::Field {
                    operation,
                    path,
                    source,
                }
            }
            other => other,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            MapError::Field { operation, .. }
            | MapError::NotAMap { operation, .. }
            | MapError::Contract { operation, .. } => operation,
        }
    }

    /// Dot-joined location of the failure; `<root>` when there is none.
    pub fn path_string(&self) -> String {
        match self {
            MapError::Field { path, .. } => join_path(path),
            MapError::NotAMap { index, .. } => index.to_string(),
            MapError::Contract { .. } => "<root>".to_string(),
        }
    }

    /// The underlying value conversion failure, if any.
    pub fn conversion(&self) -> Option<&ConvertError> {
        match self {
            MapError::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn join_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_failure() -> ConvertError {
        ConvertError::Parse {
            strategy: "parse_text",
            text: "-1".to_string(),
            kind: ScalarKind::U8,
            reason: "sign not allowed".to_string(),
        }
    }

    #[test]
    fn field_errors_name_operation_and_key() {
        let err = MapError::field("map_to_struct", "f32", parse_failure());
        assert_eq!(
            err.to_string(),
            "map_to_struct, field f32: parse_text: can't parse \"-1\" as u8: sign not allowed"
        );
        assert_eq!(err.path_string(), "f32");
        assert_eq!(err.conversion(), Some(&parse_failure()));
    }

    #[test]
    fn path_prefix_only_touches_field_errors() {
        let err =
            MapError::field("maps_to_structs", "Uint8", parse_failure()).with_path_prefix("2");
        assert_eq!(err.path_string(), "2.Uint8");
        assert_eq!(err.operation(), "maps_to_structs");

        let shape = MapError::NotAMap {
            operation: "values_to_structs",
            index: 3,
            actual: "list",
        };
        assert_eq!(shape.clone().with_path_prefix("9"), shape);
        assert_eq!(shape.path_string(), "3");
        assert!(shape.conversion().is_none());
    }

    #[test]
    fn contract_errors_have_no_path() {
        let err = MapError::Contract {
            operation: "struct_to_map",
            record: "Broken",
            detail: "exposes no value for field `a`".to_string(),
        };
        assert_eq!(err.path_string(), "<root>");
        assert_eq!(
            err.to_string(),
            "struct_to_map: record `Broken` exposes no value for field `a`"
        );
    }
}
