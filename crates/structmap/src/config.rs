use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::Record;
use crate::error::MapError;
use crate::mapping::{
    map_to_struct, maps_to_structs, struct_to_map, structs_to_maps, values_to_structs,
};
use crate::strategy::Strategy;
use crate::value::{AttrMap, Value};

/// A reusable tag key and strategy pair.
///
/// ```ignore
/// let mapper = Mapper::builder().tag("json").strategy(Strategy::ParseText).build();
/// let sample: Sample = mapper.from_map(&map)?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct Mapper {
    /// Tag key consulted for field aliases. Empty means declared names only.
    #[builder(default, into)]
    pub tag: String,
    /// Strategy applied when reading maps into records.
    #[builder(default)]
    pub strategy: Strategy,
}

impl Default for Mapper {
    fn default() -> Self {
        Mapper::builder().build()
    }
}

impl Mapper {
    pub fn to_map<R: Record>(&self, record: &R) -> Result<AttrMap, MapError> {
        let mut map = AttrMap::new();
        struct_to_map(record, &mut map, &self.tag)?;
        Ok(map)
    }

    /// Writes into an existing map, keeping keys no field resolves to.
    pub fn write_map<R: Record>(&self, record: &R, map: &mut AttrMap) -> Result<(), MapError> {
        struct_to_map(record, map, &self.tag)
    }

    pub fn from_map<R: Record>(&self, map: &AttrMap) -> Result<R, MapError> {
        let mut record = R::default();
        map_to_struct(map, &mut record, &self.strategy, &self.tag)?;
        Ok(record)
    }

    /// Updates an existing record; fields whose key is absent keep their value.
    pub fn read_map<R: Record>(&self, map: &AttrMap, record: &mut R) -> Result<(), MapError> {
        map_to_struct(map, record, &self.strategy, &self.tag)
    }

    pub fn to_maps<R: Record>(&self, records: &[R]) -> Result<Vec<AttrMap>, MapError> {
        let mut maps = Vec::new();
        structs_to_maps(records, &mut maps, &self.tag)?;
        Ok(maps)
    }

    pub fn from_maps<R: Record>(&self, maps: &[AttrMap]) -> Result<Vec<R>, MapError> {
        let mut records = Vec::new();
        maps_to_structs(maps, &mut records, &self.strategy, &self.tag)?;
        Ok(records)
    }

    pub fn from_values<R: Record>(&self, values: &[Value]) -> Result<Vec<R>, MapError> {
        let mut records = Vec::new();
        values_to_structs(values, &mut records, &self.strategy, &self.tag)?;
        Ok(records)
    }
}
