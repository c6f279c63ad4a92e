//! # Protocol16 Type Codes
//!
//! Every serialized Protocol16 value is introduced by a one-byte type tag,
//! either inline right before the value or shared by a whole container
//! (arrays and typed dictionaries).
//!
//! ## Untyped Markers
//!
//! Two tags mean "no type": `Unknown` (0) and `Null` (42). As a value they
//! decode to [`DecodedValue::Null`](crate::DecodedValue::Null) without
//! consuming any bytes. Inside a dictionary header they mean that each
//! element carries its own tag instead.

use photon_core::DecodeError;

/// Protocol16 type tag enumeration
///
/// # Type Tags
///
/// Tags are ASCII letters in the wire format (`'D'` = Byte, `'k'` = String,
/// `'x'` = OperationRequest, ...), except for `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Protocol16Type {
    //=== Untyped ===//

    /// No type information, decodes to null
    Unknown = 0,

    /// Explicit null (`'*'`)
    Null = 42,

    //=== Scalars ===//

    /// Unsigned 8-bit value (`'D'`)
    Byte = 68,

    /// One byte, nonzero = true (`'a'`)
    Boolean = 97,

    /// Signed 16-bit big-endian (`'b'`)
    Short = 98,

    /// Signed 32-bit big-endian (`'d'`)
    Integer = 100,

    /// 64-bit IEEE float, big-endian (`'f'`)
    Double = 102,

    /// 32-bit IEEE float, big-endian (`'h'`)
    Float = 104,

    /// Signed 64-bit big-endian (`'i'`)
    Long = 105,

    //=== Length-prefixed ===//

    /// `{u16 length}{bytes}` (`'k'`)
    String = 107,

    /// `{u16 count}{String...}` without per-element tags (`'l'`)
    StringArray = 108,

    /// `{u32 length}{bytes}` (`'n'`)
    ByteArray = 110,

    /// `{u32 count}{i32...}` (`'e'`)
    IntegerArray = 101,

    //=== Containers ===//

    /// `{u16 count}{tag}{value...}`, one tag shared by all elements (`'q'`)
    Array = 113,

    /// `{u16 count}{tag value...}`, one tag per element (`'z'`)
    ObjectArray = 122,

    /// `{key tag}{value tag}{u16 count}{key value...}` (`'p'`)
    Dictionary = 112,

    /// `{u16 count}{tag key tag value...}` (`'y'`)
    Hashtable = 121,

    //=== Messages ===//

    /// `{u8 code}{parameter table}` (`'o'`)
    EventData = 111,

    /// `{u8 code}{i16 return}{tag debug}{parameter table}` (`'s'`)
    OperationResponse = 115,

    /// `{u8 code}{parameter table}` (`'x'`)
    OperationRequest = 120,
}

impl Protocol16Type {
    pub fn from_u8(value: u8) -> Option<Self> {
        let ty = match value {
            0 => Self::Unknown,
            42 => Self::Null,
            68 => Self::Byte,
            97 => Self::Boolean,
            98 => Self::Short,
            100 => Self::Integer,
            101 => Self::IntegerArray,
            102 => Self::Double,
            104 => Self::Float,
            105 => Self::Long,
            107 => Self::String,
            108 => Self::StringArray,
            110 => Self::ByteArray,
            111 => Self::EventData,
            112 => Self::Dictionary,
            113 => Self::Array,
            115 => Self::OperationResponse,
            120 => Self::OperationRequest,
            121 => Self::Hashtable,
            122 => Self::ObjectArray,
            _ => return None,
        };
        Some(ty)
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// True for the two tags that carry no type information
    #[inline]
    pub fn is_untyped(self) -> bool {
        matches!(self, Self::Unknown | Self::Null)
    }

    /// True for tags whose values contain further tagged values
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            Self::Array
                | Self::ObjectArray
                | Self::Dictionary
                | Self::Hashtable
                | Self::EventData
                | Self::OperationResponse
                | Self::OperationRequest
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Null => "Null",
            Self::Byte => "Byte",
            Self::Boolean => "Boolean",
            Self::Short => "Short",
            Self::Integer => "Integer",
            Self::IntegerArray => "IntegerArray",
            Self::Double => "Double",
            Self::Float => "Float",
            Self::Long => "Long",
            Self::String => "String",
            Self::StringArray => "StringArray",
            Self::ByteArray => "ByteArray",
            Self::EventData => "EventData",
            Self::Dictionary => "Dictionary",
            Self::Array => "Array",
            Self::OperationResponse => "OperationResponse",
            Self::OperationRequest => "OperationRequest",
            Self::Hashtable => "Hashtable",
            Self::ObjectArray => "ObjectArray",
        }
    }
}

impl TryFrom<u8> for Protocol16Type {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(DecodeError::UnsupportedTypeCode(value))
    }
}

impl From<Protocol16Type> for u8 {
    fn from(ty: Protocol16Type) -> Self {
        ty as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tags_roundtrip_through_u8() {
        for value in 0..=u8::MAX {
            if let Some(ty) = Protocol16Type::from_u8(value) {
                assert_eq!(ty.as_u8(), value, "Failed for {}", ty.as_str());
            }
        }
    }

    #[test]
    fn test_recognized_tag_count() {
        let count = (0..=u8::MAX)
            .filter(|v| Protocol16Type::from_u8(*v).is_some())
            .count();
        assert_eq!(count, 20);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert_eq!(
            Protocol16Type::try_from(99),
            Err(DecodeError::UnsupportedTypeCode(99))
        );
    }

    #[test]
    fn test_untyped_markers() {
        assert!(Protocol16Type::Unknown.is_untyped());
        assert!(Protocol16Type::Null.is_untyped());
        assert!(!Protocol16Type::Byte.is_untyped());
    }
}
