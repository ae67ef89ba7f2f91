//! structmap - tag-driven conversion between attribute maps and records
//!
//! This crate moves data between loosely-typed attribute maps
//! (`IndexMap<String, Value>`) and strongly-typed structs, in both directions,
//! without per-type conversion code.
//!
//! # Usage
//!
//! ```ignore
//! use structmap::{NoConvert, Record};
//!
//! #[derive(Debug, Default, Record)]
//! #[structmap(rename_all = "PascalCase")]
//! pub struct Sample {
//!     pub uint8: u8,
//!     #[structmap(tag(json = "f32"))]
//!     pub float32: f32,
//!     pub string: String,
//!     hidden: i32,
//! }
//!
//! let map = sample.to_map("json")?;          // {"Uint8": .., "f32": .., "String": ..}
//! let back = Sample::from_map(&map, &NoConvert, "json")?;
//! ```
//!
//! Only fields declared `pub` (and not marked `#[structmap(skip)]`) of a
//! supported scalar type take part. A field's key is its declared name unless
//! the active tag key names a non-empty alias for it.
//!
//! Values reach a field through a [`Converter`]: [`NoConvert`] requires the
//! exact kind, [`ParseText`] parses the value's text form.
//!
//! Every operation runs inside a `trace`-level `structmap.<operation>` span,
//! and fields skipped for an absent key emit a `trace` event. Install any
//! `tracing` subscriber to see them; errors are returned, never logged.

// Lets generated `::structmap::...` paths resolve inside this crate too.
extern crate self as structmap;

pub mod config;
pub mod descriptor;
pub mod error;
pub mod kind;
pub mod mapping;
pub mod strategy;
pub mod value;

#[cfg(feature = "json")]
pub mod json;

pub use config::Mapper;
pub use descriptor::{FieldDesc, FieldKind, RecordDescriptor};
pub use error::{ConvertError, MapError};
pub use kind::{Carrier, KindCategory, ScalarField, ScalarKind};
pub use mapping::{
    map_to_struct, maps_to_structs, struct_to_map, structs_to_maps, values_to_structs,
};
pub use strategy::{Converter, NoConvert, ParseText, Strategy};
pub use value::{AttrMap, Value};

// Re-export the derive macro
#[cfg(feature = "derive")]
pub use structmap_derive::Record;

/// A struct the mapping engine can introspect.
///
/// Usually derived. A manual implementation must keep three things consistent:
/// `descriptor()` lists the fields, `field_value` returns `Some` for every
/// mappable index, and `set_field_value` accepts every mappable index.
pub trait Record: Default + 'static {
    /// Field metadata, computed once per type.
    fn descriptor() -> &'static RecordDescriptor;

    /// Current value of the field at `index`, or `None` if it is not mapped.
    fn field_value(&self, index: usize) -> Option<Value>;

    /// Assigns the field at `index` from a strategy carrier.
    fn set_field_value(&mut self, index: usize, value: Carrier) -> Result<(), ConvertError>;

    /// Collects the mappable fields into a fresh map.
    fn to_map(&self, tag: &str) -> Result<AttrMap, MapError> {
        let mut map = AttrMap::new();
        struct_to_map(self, &mut map, tag)?;
        Ok(map)
    }

    /// Builds a record from `Self::default()` and the entries of `map`.
    fn from_map<C>(map: &AttrMap, converter: &C, tag: &str) -> Result<Self, MapError>
    where
        C: Converter + ?Sized,
    {
        let mut record = Self::default();
        map_to_struct(map, &mut record, converter, tag)?;
        Ok(record)
    }
}
