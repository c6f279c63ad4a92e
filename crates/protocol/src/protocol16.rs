//! Protocol16 value deserializer
//!
//! Decodes one type-tagged value at a time from a [`ByteCursor`], recursing
//! into itself for arrays, dictionaries and embedded messages.
//!
//! # Format
//!
//! All multi-byte scalars are big-endian. Strings, arrays and maps use a
//! `u16` count; `ByteArray` and `IntegerArray` use a `u32` length.

use photon_core::{DecodeError, Result};

use crate::cursor::ByteCursor;
use crate::messages::{read_event_data, read_operation_request, read_operation_response};
use crate::type_codes::Protocol16Type;
use crate::value::{DecodedValue, Dictionary};

/// Maximum depth of nested composite values in one packet
pub const MAX_NESTING_DEPTH: usize = 64;

/// Decode one value of the type named by `type_code`
pub fn decode_value(cursor: &mut ByteCursor<'_>, type_code: u8) -> Result<DecodedValue> {
    read_value(cursor, type_code, 0)
}

/// Read a tag byte, then the value it names
pub fn decode_tagged_value(cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    let type_code = cursor.read_u8()?;
    read_value(cursor, type_code, 0)
}

/// Step one level deeper into a composite value
#[inline]
pub(crate) fn descend(depth: usize) -> Result<usize> {
    let next = depth + 1;
    if next > MAX_NESTING_DEPTH {
        return Err(DecodeError::NestingTooDeep(next));
    }
    Ok(next)
}

pub(crate) fn read_value(
    cursor: &mut ByteCursor<'_>,
    type_code: u8,
    depth: usize,
) -> Result<DecodedValue> {
    let ty = Protocol16Type::try_from(type_code)?;

    let value = match ty {
        Protocol16Type::Unknown | Protocol16Type::Null => DecodedValue::Null,
        Protocol16Type::Byte => DecodedValue::Byte(cursor.read_u8()?),
        Protocol16Type::Boolean => DecodedValue::Boolean(read_boolean(cursor)?),
        Protocol16Type::Short => DecodedValue::Short(cursor.read_i16()?),
        Protocol16Type::Integer => DecodedValue::Integer(cursor.read_i32()?),
        Protocol16Type::Long => DecodedValue::Long(cursor.read_i64()?),
        Protocol16Type::Float => DecodedValue::Float(cursor.read_f32()?),
        Protocol16Type::Double => DecodedValue::Double(cursor.read_f64()?),
        Protocol16Type::String => DecodedValue::String(read_string(cursor)?),
        Protocol16Type::StringArray => DecodedValue::StringArray(read_string_array(cursor)?),
        Protocol16Type::ByteArray => DecodedValue::ByteArray(read_byte_array(cursor)?),
        Protocol16Type::IntegerArray => DecodedValue::IntegerArray(read_integer_array(cursor)?),
        Protocol16Type::Array => DecodedValue::Array(read_array(cursor, descend(depth)?)?),
        Protocol16Type::ObjectArray => {
            DecodedValue::ObjectArray(read_object_array(cursor, descend(depth)?)?)
        }
        Protocol16Type::Dictionary => {
            DecodedValue::Dictionary(read_dictionary(cursor, descend(depth)?)?)
        }
        Protocol16Type::Hashtable => {
            DecodedValue::Hashtable(read_hashtable(cursor, descend(depth)?)?)
        }
        Protocol16Type::EventData => {
            DecodedValue::EventData(Box::new(read_event_data(cursor, descend(depth)?)?))
        }
        Protocol16Type::OperationRequest => DecodedValue::OperationRequest(Box::new(
            read_operation_request(cursor, descend(depth)?)?,
        )),
        Protocol16Type::OperationResponse => DecodedValue::OperationResponse(Box::new(
            read_operation_response(cursor, descend(depth)?)?,
        )),
    };

    Ok(value)
}

/// Read a Boolean (one byte, nonzero = true)
#[inline]
pub fn read_boolean(cursor: &mut ByteCursor<'_>) -> Result<bool> {
    Ok(cursor.read_u8()? != 0)
}

/// Read a String
///
/// # Format
/// - u16: byte length
/// - bytes, decoded as UTF-8 with invalid sequences replaced
///
/// A zero length yields an empty string without touching the cursor again.
pub fn read_string(cursor: &mut ByteCursor<'_>) -> Result<String> {
    let len = cursor.read_u16()? as usize;
    if len == 0 {
        return Ok(String::new());
    }
    let bytes = cursor.read_bytes(len)?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Read a StringArray (u16 count, then untagged Strings)
pub fn read_string_array(cursor: &mut ByteCursor<'_>) -> Result<Vec<String>> {
    let count = cursor.read_u16()? as usize;
    // Every string needs at least its 2-byte length prefix
    let mut strings = Vec::with_capacity(count.min(cursor.remaining() / 2));
    for _ in 0..count {
        strings.push(read_string(cursor)?);
    }
    Ok(strings)
}

/// Read a ByteArray (u32 length, then raw bytes)
pub fn read_byte_array(cursor: &mut ByteCursor<'_>) -> Result<Vec<u8>> {
    let len = cursor.read_u32()? as usize;
    Ok(cursor.read_bytes(len)?.to_vec())
}

/// Read an IntegerArray (u32 count, then big-endian i32 values)
pub fn read_integer_array(cursor: &mut ByteCursor<'_>) -> Result<Vec<i32>> {
    let count = cursor.read_u32()? as usize;
    // Reject impossible counts before allocating for them
    cursor.ensure(count.saturating_mul(4))?;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(cursor.read_i32()?);
    }
    Ok(values)
}

/// Read an Array: u16 count, one shared tag, then `count` values of that type
///
/// Elements are never individually tagged; bytes that were written as
/// per-element tags are read as part of the values instead.
///
/// An untyped shared tag (Unknown/Null) would produce elements that occupy
/// no bytes at all, so a non-empty Array of them is rejected as malformed.
pub(crate) fn read_array(cursor: &mut ByteCursor<'_>, depth: usize) -> Result<Vec<DecodedValue>> {
    let count = cursor.read_u16()? as usize;
    let type_code = cursor.read_u8()?;
    if count > 0 && Protocol16Type::from_u8(type_code).is_some_and(|ty| ty.is_untyped()) {
        return Err(DecodeError::MalformedLength {
            declared: count,
            available: cursor.remaining(),
        });
    }
    let mut values = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        values.push(read_value(cursor, type_code, depth)?);
    }
    Ok(values)
}

/// Read an ObjectArray: u16 count, each element preceded by its own tag
pub(crate) fn read_object_array(
    cursor: &mut ByteCursor<'_>,
    depth: usize,
) -> Result<Vec<DecodedValue>> {
    let count = cursor.read_u16()? as usize;
    let mut values = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        let type_code = cursor.read_u8()?;
        values.push(read_value(cursor, type_code, depth)?);
    }
    Ok(values)
}

/// Read a Dictionary header (key tag, value tag, u16 count), then its elements
pub(crate) fn read_dictionary(cursor: &mut ByteCursor<'_>, depth: usize) -> Result<Dictionary> {
    let key_type = cursor.read_u8()?;
    let value_type = cursor.read_u8()?;
    let count = cursor.read_u16()? as usize;
    read_dictionary_elements(cursor, count, key_type, value_type, depth)
}

/// Read a Hashtable: a Dictionary whose keys and values are always tagged
pub(crate) fn read_hashtable(cursor: &mut ByteCursor<'_>, depth: usize) -> Result<Dictionary> {
    let count = cursor.read_u16()? as usize;
    read_dictionary_elements(
        cursor,
        count,
        Protocol16Type::Unknown.as_u8(),
        Protocol16Type::Unknown.as_u8(),
        depth,
    )
}

/// Read `count` key/value pairs
///
/// An untyped key or value tag (Unknown/Null) means every element reads its
/// own tag for that side. The header tag is re-checked for each element, so
/// one element's tag never leaks into the next.
fn read_dictionary_elements(
    cursor: &mut ByteCursor<'_>,
    count: usize,
    key_type: u8,
    value_type: u8,
    depth: usize,
) -> Result<Dictionary> {
    let mut dict = Dictionary::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        let key = read_element(cursor, key_type, depth)?;
        let value = read_element(cursor, value_type, depth)?;
        dict.insert(key, value);
    }
    Ok(dict)
}

#[inline]
fn read_element(cursor: &mut ByteCursor<'_>, declared: u8, depth: usize) -> Result<DecodedValue> {
    let type_code = match Protocol16Type::from_u8(declared) {
        Some(ty) if ty.is_untyped() => cursor.read_u8()?,
        _ => declared,
    };
    read_value(cursor, type_code, depth)
}
