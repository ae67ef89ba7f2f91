//! Bridge between [`serde_json::Value`] and [`Value`].
//!
//! JSON integers become `I64` (or `U64` above `i64::MAX`) and other numbers
//! become `F64`, so maps decoded from JSON fill `i64`/`u64`/`f64` fields under
//! the strict strategy and anything else under [`ParseText`](crate::ParseText).

use serde_json::{Map, Number, Value as Json};

use crate::value::{AttrMap, Value};

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(flag) => Value::Bool(flag),
            Json::Number(number) => number_to_value(&number),
            Json::String(text) => Value::String(text),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

fn number_to_value(number: &Number) -> Value {
    if let Some(signed) = number.as_i64() {
        Value::I64(signed)
    } else if let Some(unsigned) = number.as_u64() {
        Value::U64(unsigned)
    } else if let Some(float) = number.as_f64() {
        Value::F64(float)
    } else {
        Value::String(number.to_string())
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Json::Null,
            Value::Bool(flag) => Json::Bool(*flag),
            Value::I8(v) => Json::from(*v),
            Value::I16(v) => Json::from(*v),
            Value::I32(v) => Json::from(*v),
            Value::I64(v) => Json::from(*v),
            Value::Isize(v) => Json::from(*v),
            Value::U8(v) => Json::from(*v),
            Value::U16(v) => Json::from(*v),
            Value::U32(v) => Json::from(*v),
            Value::U64(v) => Json::from(*v),
            Value::Usize(v) => Json::from(*v),
            // Go through the shortest text form so 3.14f32 stays 3.14.
            Value::F32(v) => float_to_json(v.to_string().parse().unwrap_or(f64::from(*v))),
            Value::F64(v) => float_to_json(*v),
            Value::String(text) => Json::String(text.clone()),
            Value::List(items) => Json::Array(items.iter().map(Json::from).collect()),
            Value::Map(map) => Json::Object(attrs_to_json(map)),
        }
    }
}

fn float_to_json(value: f64) -> Json {
    Number::from_f64(value).map_or(Json::Null, Json::Number)
}

fn attrs_to_json(map: &AttrMap) -> Map<String, Json> {
    map.iter()
        .map(|(key, item)| (key.clone(), Json::from(item)))
        .collect()
}

/// Reads a JSON object into an attribute map; `None` for any other JSON shape.
pub fn attrs_from_json(json: Json) -> Option<AttrMap> {
    Value::from(json).into_map()
}

pub fn attrs_to_json_value(map: &AttrMap) -> Json {
    Json::Object(attrs_to_json(map))
}
