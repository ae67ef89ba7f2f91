//! The mapping engine: records to attribute maps and back.

use tracing::trace;

use crate::Record;
use crate::error::{ConvertError, MapError};
use crate::strategy::Converter;
use crate::value::{AttrMap, Value};

const STRUCT_TO_MAP: &str = "struct_to_map";
const MAP_TO_STRUCT: &str = "map_to_struct";
const STRUCTS_TO_MAPS: &str = "structs_to_maps";
const MAPS_TO_STRUCTS: &str = "maps_to_structs";
const VALUES_TO_STRUCTS: &str = "values_to_structs";

/// Writes every mappable field of `record` into `map` under its resolved key.
///
/// Keys already in `map` that no field resolves to are left alone; keys a
/// field resolves to are overwritten.
#[tracing::instrument(
    level = "trace",
    name = "structmap.struct_to_map",
    skip_all,
    fields(record = R::descriptor().type_name, tag = tag)
)]
pub fn struct_to_map<R: Record>(record: &R, map: &mut AttrMap, tag: &str) -> Result<(), MapError> {
    write_fields(record, map, tag, STRUCT_TO_MAP)
}

/// Fills the mappable fields of `record` from `map`, converting each value
/// with `converter`.
///
/// Fields whose key is absent keep their current value. The first failure
/// stops the walk; fields assigned before it keep their new values.
#[tracing::instrument(
    level = "trace",
    name = "structmap.map_to_struct",
    skip_all,
    fields(record = R::descriptor().type_name, tag = tag)
)]
pub fn map_to_struct<R, C>(
    map: &AttrMap,
    record: &mut R,
    converter: &C,
    tag: &str,
) -> Result<(), MapError>
where
    R: Record,
    C: Converter + ?Sized,
{
    read_fields(map, record, converter, tag, MAP_TO_STRUCT)
}

/// Replaces `maps` with one fresh map per record, in order.
#[tracing::instrument(
    level = "trace",
    name = "structmap.structs_to_maps",
    skip_all,
    fields(record = R::descriptor().type_name, tag = tag, count = records.len())
)]
pub fn structs_to_maps<R: Record>(
    records: &[R],
    maps: &mut Vec<AttrMap>,
    tag: &str,
) -> Result<(), MapError> {
    let mut built = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let mut map = AttrMap::new();
        write_fields(record, &mut map, tag, STRUCTS_TO_MAPS)
            .map_err(|err| err.with_path_prefix(index.to_string()))?;
        built.push(map);
    }
    *maps = built;
    Ok(())
}

/// Replaces `records` with one record per map, each starting from
/// `R::default()`.
///
/// All or nothing: on failure `records` is untouched and the error names the
/// element index and key.
#[tracing::instrument(
    level = "trace",
    name = "structmap.maps_to_structs",
    skip_all,
    fields(record = R::descriptor().type_name, tag = tag, count = maps.len())
)]
pub fn maps_to_structs<R, C>(
    maps: &[AttrMap],
    records: &mut Vec<R>,
    converter: &C,
    tag: &str,
) -> Result<(), MapError>
where
    R: Record,
    C: Converter + ?Sized,
{
    *records = build_records(maps.iter(), converter, tag, MAPS_TO_STRUCTS)?;
    Ok(())
}

/// Like [`maps_to_structs`] for an untyped sequence; every element must be a
/// [`Value::Map`].
#[tracing::instrument(
    level = "trace",
    name = "structmap.values_to_structs",
    skip_all,
    fields(record = R::descriptor().type_name, tag = tag, count = values.len())
)]
pub fn values_to_structs<R, C>(
    values: &[Value],
    records: &mut Vec<R>,
    converter: &C,
    tag: &str,
) -> Result<(), MapError>
where
    R: Record,
    C: Converter + ?Sized,
{
    let maps = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            value.as_map().ok_or(MapError::NotAMap {
                operation: VALUES_TO_STRUCTS,
                index,
                actual: value.kind_name(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    *records = build_records(maps.into_iter(), converter, tag, VALUES_TO_STRUCTS)?;
    Ok(())
}

fn write_fields<R: Record>(
    record: &R,
    map: &mut AttrMap,
    tag: &str,
    operation: &'static str,
) -> Result<(), MapError> {
    let descriptor = R::descriptor();
    for (index, field, _) in descriptor.mappable_fields() {
        let Some(value) = record.field_value(index) else {
            return Err(MapError::Contract {
                operation,
                record: descriptor.type_name,
                detail: format!("exposes no value for field `{}`", field.name),
            });
        };
        map.insert(field.resolve_name(tag).to_string(), value);
    }
    Ok(())
}

fn read_fields<R, C>(
    map: &AttrMap,
    record: &mut R,
    converter: &C,
    tag: &str,
    operation: &'static str,
) -> Result<(), MapError>
where
    R: Record,
    C: Converter + ?Sized,
{
    let descriptor = R::descriptor();
    for (index, field, kind) in descriptor.mappable_fields() {
        let key = field.resolve_name(tag);
        let Some(value) = map.get(key) else {
            trace!(field = field.name, key, "key absent; field unchanged");
            continue;
        };
        let carrier = converter
            .convert(value, kind)
            .map_err(|source| MapError::field(operation, key, source))?;
        record
            .set_field_value(index, carrier)
            .map_err(|source| match source {
                ConvertError::NoSuchField { .. } => MapError::Contract {
                    operation,
                    record: descriptor.type_name,
                    detail: format!("rejects its own field `{}`", field.name),
                },
                source => MapError::field(operation, key, source),
            })?;
    }
    Ok(())
}

fn build_records<'a, R, C, I>(
    maps: I,
    converter: &C,
    tag: &str,
    operation: &'static str,
) -> Result<Vec<R>, MapError>
where
    R: Record,
    C: Converter + ?Sized,
    I: ExactSizeIterator<Item = &'a AttrMap>,
{
    let mut built = Vec::with_capacity(maps.len());
    for (index, map) in maps.enumerate() {
        let mut record = R::default();
        read_fields(map, &mut record, converter, tag, operation)
            .map_err(|err| err.with_path_prefix(index.to_string()))?;
        built.push(record);
    }
    trace!(count = built.len(), "built records");
    Ok(built)
}
