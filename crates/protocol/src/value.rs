//! Decoded Protocol16 values
//!
//! [`DecodedValue`] is a closed tree: composite variants own their children
//! and there is no sharing between nodes.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::messages::{EventData, OperationRequest, OperationResponse};
use crate::parameters::ParameterTable;
use crate::type_codes::Protocol16Type;

/// One decoded Protocol16 value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum DecodedValue {
    Null,
    Byte(u8),
    Boolean(bool),
    Short(i16),
    Integer(i32),
    IntegerArray(Vec<i32>),
    Double(f64),
    Long(i64),
    Float(f32),
    String(String),
    StringArray(Vec<String>),
    ByteArray(Vec<u8>),
    EventData(Box<EventData>),
    Dictionary(Dictionary),
    Array(Vec<DecodedValue>),
    OperationResponse(Box<OperationResponse>),
    OperationRequest(Box<OperationRequest>),
    Hashtable(Dictionary),
    ObjectArray(Vec<DecodedValue>),
}

impl DecodedValue {
    /// Type tag this value was decoded from
    ///
    /// Null always reports [`Protocol16Type::Null`], even when the wire
    /// carried the `Unknown` tag.
    pub fn type_code(&self) -> Protocol16Type {
        match self {
            Self::Null => Protocol16Type::Null,
            Self::Byte(_) => Protocol16Type::Byte,
            Self::Boolean(_) => Protocol16Type::Boolean,
            Self::Short(_) => Protocol16Type::Short,
            Self::Integer(_) => Protocol16Type::Integer,
            Self::IntegerArray(_) => Protocol16Type::IntegerArray,
            Self::Double(_) => Protocol16Type::Double,
            Self::Long(_) => Protocol16Type::Long,
            Self::Float(_) => Protocol16Type::Float,
            Self::String(_) => Protocol16Type::String,
            Self::StringArray(_) => Protocol16Type::StringArray,
            Self::ByteArray(_) => Protocol16Type::ByteArray,
            Self::EventData(_) => Protocol16Type::EventData,
            Self::Dictionary(_) => Protocol16Type::Dictionary,
            Self::Array(_) => Protocol16Type::Array,
            Self::OperationResponse(_) => Protocol16Type::OperationResponse,
            Self::OperationRequest(_) => Protocol16Type::OperationRequest,
            Self::Hashtable(_) => Protocol16Type::Hashtable,
            Self::ObjectArray(_) => Protocol16Type::ObjectArray,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteArray(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Widen any integer variant to `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Integer(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Widen either float variant to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }
}

/// Key/value pairs of a Dictionary or Hashtable
///
/// Keys can be any decoded value (floats included), so entries are kept in
/// first-seen order and found through a side index of key hashes. Inserting
/// an existing key replaces its value in place.
#[derive(Clone, Default)]
pub struct Dictionary {
    entries: Vec<(DecodedValue, DecodedValue)>,
    /// Key hash to the slots in `entries` holding keys with that hash
    index: HashMap<u64, Vec<usize>>,
    hasher: RandomState,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            hasher: RandomState::new(),
        }
    }

    fn key_hash(&self, key: &DecodedValue) -> u64 {
        let mut state = self.hasher.build_hasher();
        hash_value(key, &mut state);
        state.finish()
    }

    fn slot(&self, hash: u64, key: &DecodedValue) -> Option<usize> {
        self.index
            .get(&hash)?
            .iter()
            .copied()
            .find(|&slot| self.entries[slot].0 == *key)
    }

    /// Insert a pair, returning the previous value for an equal key
    pub fn insert(&mut self, key: DecodedValue, value: DecodedValue) -> Option<DecodedValue> {
        let hash = self.key_hash(&key);
        match self.slot(hash, &key) {
            Some(slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.index.entry(hash).or_default().push(self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &DecodedValue) -> Option<&DecodedValue> {
        let slot = self.slot(self.key_hash(key), key)?;
        Some(&self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DecodedValue, &DecodedValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("entries", &self.entries)
            .finish()
    }
}

impl Serialize for Dictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl FromIterator<(DecodedValue, DecodedValue)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (DecodedValue, DecodedValue)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

/// Hash a value consistently with its `PartialEq`
///
/// Floats hash by bit pattern with `-0.0` folded into `0.0`. NaN keys hash
/// fine but never compare equal, so each one gets its own slot.
fn hash_value<H: Hasher>(value: &DecodedValue, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        DecodedValue::Null => {}
        DecodedValue::Byte(v) => v.hash(state),
        DecodedValue::Boolean(v) => v.hash(state),
        DecodedValue::Short(v) => v.hash(state),
        DecodedValue::Integer(v) => v.hash(state),
        DecodedValue::IntegerArray(v) => v.hash(state),
        DecodedValue::Double(v) => (v + 0.0).to_bits().hash(state),
        DecodedValue::Long(v) => v.hash(state),
        DecodedValue::Float(v) => (v + 0.0).to_bits().hash(state),
        DecodedValue::String(v) => v.hash(state),
        DecodedValue::StringArray(v) => v.hash(state),
        DecodedValue::ByteArray(v) => v.hash(state),
        DecodedValue::Array(values) | DecodedValue::ObjectArray(values) => {
            values.len().hash(state);
            for v in values {
                hash_value(v, state);
            }
        }
        DecodedValue::Dictionary(dict) | DecodedValue::Hashtable(dict) => {
            dict.len().hash(state);
            for (k, v) in dict.iter() {
                hash_value(k, state);
                hash_value(v, state);
            }
        }
        DecodedValue::EventData(event) => {
            event.code.hash(state);
            hash_parameters(&event.parameters, state);
        }
        DecodedValue::OperationRequest(request) => {
            request.operation_code.hash(state);
            hash_parameters(&request.parameters, state);
        }
        DecodedValue::OperationResponse(response) => {
            response.operation_code.hash(state);
            response.return_code.hash(state);
            hash_value(&response.debug_message, state);
            hash_parameters(&response.parameters, state);
        }
    }
}

fn hash_parameters<H: Hasher>(parameters: &ParameterTable, state: &mut H) {
    parameters.len().hash(state);
    for (key, value) in parameters.iter() {
        key.hash(state);
        hash_value(value, state);
    }
}
