//! Parameter tables carried by requests, responses and events
//!
//! # Format
//! ```text
//! {u16 count}({u8 key}{u8 type tag}{value})*count
//! ```

use std::collections::BTreeMap;

use photon_core::Result;
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::protocol16::read_value;
use crate::value::DecodedValue;

/// Mapping from an 8-bit parameter key to its decoded value
///
/// A key that appears twice keeps the value decoded last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterTable(BTreeMap<u8, DecodedValue>);

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: u8) -> Option<&DecodedValue> {
        self.0.get(&key)
    }

    pub fn insert(&mut self, key: u8, value: DecodedValue) -> Option<DecodedValue> {
        self.0.insert(key, value)
    }

    pub fn contains_key(&self, key: u8) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &DecodedValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(u8, DecodedValue)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (u8, DecodedValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode a complete parameter table
pub fn decode_parameter_table(cursor: &mut ByteCursor<'_>) -> Result<ParameterTable> {
    read_parameter_table(cursor, 0)
}

pub(crate) fn read_parameter_table(
    cursor: &mut ByteCursor<'_>,
    depth: usize,
) -> Result<ParameterTable> {
    let count = cursor.read_u16()?;
    let mut table = ParameterTable::new();

    for _ in 0..count {
        let key = cursor.read_u8()?;
        let type_code = cursor.read_u8()?;
        let value = read_value(cursor, type_code, depth)?;
        table.insert(key, value);
    }

    Ok(table)
}
