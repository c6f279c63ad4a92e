//! # Operation and Event Messages
//!
//! The three application payloads a reliable command can carry:
//!
//! - [`OperationRequest`]: `{u8 operation code}{parameter table}`
//! - [`OperationResponse`]: `{u8 operation code}{i16 return code}{tag}{debug message}{parameter table}`
//! - [`EventData`]: `{u8 event code}{parameter table}`
//!
//! ## Positional Events
//!
//! Events with code [`POSITION_EVENT_CODE`] do not send their coordinates as
//! regular parameters. Instead parameter 1 is a byte array holding a small
//! little-endian record; the coordinates are two `f64` values starting at
//! byte 9. After decoding, the coordinates are copied out into parameters 4
//! and 5 and parameter 252 is set to `Byte(3)` to mark the event as patched.

use photon_core::{DecodeError, MessageKind, Result, WorldPosition};
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::parameters::{read_parameter_table, ParameterTable};
use crate::protocol16::read_value;
use crate::value::DecodedValue;

/// Event code whose parameter 1 carries packed coordinates
pub const POSITION_EVENT_CODE: u8 = 3;
/// Parameter holding the packed coordinate record
pub const POSITION_SOURCE_KEY: u8 = 1;
/// Offset of the first coordinate inside the record
pub const POSITION_OFFSET: usize = 9;
/// Parameter receiving the first coordinate
pub const POSITION_X_KEY: u8 = 4;
/// Parameter receiving the second coordinate
pub const POSITION_Y_KEY: u8 = 5;
/// Parameter marking an event as patched
pub const POSITION_MARKER_KEY: u8 = 252;

/// Remote procedure call from one peer to the other
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRequest {
    pub operation_code: u8,
    pub parameters: ParameterTable,
}

/// Reply to an [`OperationRequest`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResponse {
    pub operation_code: u8,
    pub return_code: i16,
    /// Usually a String, or Null on success
    pub debug_message: DecodedValue,
    pub parameters: ParameterTable,
}

/// One-way notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventData {
    pub code: u8,
    pub parameters: ParameterTable,
}

impl EventData {
    /// Coordinates injected by the positional fix-up, if present
    pub fn position(&self) -> Option<WorldPosition> {
        if self.code != POSITION_EVENT_CODE {
            return None;
        }
        match (
            self.parameters.get(POSITION_X_KEY),
            self.parameters.get(POSITION_Y_KEY),
        ) {
            (Some(DecodedValue::Double(x)), Some(DecodedValue::Double(y))) => {
                Some(WorldPosition::new(*x, *y))
            }
            _ => None,
        }
    }
}

/// Typed payload of a reliable command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Message {
    Request(OperationRequest),
    Response(OperationResponse),
    Event(EventData),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Request(_) => MessageKind::Request,
            Self::Response(_) => MessageKind::Response,
            Self::Event(_) => MessageKind::Event,
        }
    }

    /// Operation code for requests/responses, event code for events
    pub fn code(&self) -> u8 {
        match self {
            Self::Request(req) => req.operation_code,
            Self::Response(resp) => resp.operation_code,
            Self::Event(event) => event.code,
        }
    }

    pub fn parameters(&self) -> &ParameterTable {
        match self {
            Self::Request(req) => &req.parameters,
            Self::Response(resp) => &resp.parameters,
            Self::Event(event) => &event.parameters,
        }
    }
}

/// Decode an OperationRequest body (no leading type tag)
pub fn decode_operation_request(cursor: &mut ByteCursor<'_>) -> Result<OperationRequest> {
    read_operation_request(cursor, 0)
}

/// Decode an OperationResponse body (no leading type tag)
pub fn decode_operation_response(cursor: &mut ByteCursor<'_>) -> Result<OperationResponse> {
    read_operation_response(cursor, 0)
}

/// Decode an EventData body (no leading type tag), including the positional fix-up
pub fn decode_event_data(cursor: &mut ByteCursor<'_>) -> Result<EventData> {
    read_event_data(cursor, 0)
}

pub(crate) fn read_operation_request(
    cursor: &mut ByteCursor<'_>,
    depth: usize,
) -> Result<OperationRequest> {
    let operation_code = cursor.read_u8()?;
    let parameters = read_parameter_table(cursor, depth)?;
    Ok(OperationRequest {
        operation_code,
        parameters,
    })
}

pub(crate) fn read_operation_response(
    cursor: &mut ByteCursor<'_>,
    depth: usize,
) -> Result<OperationResponse> {
    let operation_code = cursor.read_u8()?;
    let return_code = cursor.read_i16()?;
    let debug_type = cursor.read_u8()?;
    let debug_message = read_value(cursor, debug_type, depth)?;
    let parameters = read_parameter_table(cursor, depth)?;
    Ok(OperationResponse {
        operation_code,
        return_code,
        debug_message,
        parameters,
    })
}

pub(crate) fn read_event_data(cursor: &mut ByteCursor<'_>, depth: usize) -> Result<EventData> {
    let code = cursor.read_u8()?;
    let parameters = read_parameter_table(cursor, depth)?;
    let mut event = EventData { code, parameters };
    if event.code == POSITION_EVENT_CODE {
        apply_position_fixup(&mut event)?;
    }
    Ok(event)
}

/// Copy the packed coordinates of a positional event into parameters 4 and 5
///
/// The table is only modified once both coordinates have been read, so a
/// failure leaves the event untouched. Events with any other code are
/// returned unchanged.
pub fn apply_position_fixup(event: &mut EventData) -> Result<()> {
    if event.code != POSITION_EVENT_CODE {
        return Ok(());
    }

    let record = event
        .parameters
        .get(POSITION_SOURCE_KEY)
        .and_then(DecodedValue::as_bytes)
        .ok_or(DecodeError::MissingParameter(POSITION_SOURCE_KEY))?;

    let mut cursor = ByteCursor::new(record);
    cursor.skip(POSITION_OFFSET)?;
    let x = cursor.read_f64_le()?;
    let y = cursor.read_f64_le()?;

    event.parameters.insert(POSITION_X_KEY, DecodedValue::Double(x));
    event.parameters.insert(POSITION_Y_KEY, DecodedValue::Double(y));
    event
        .parameters
        .insert(POSITION_MARKER_KEY, DecodedValue::Byte(POSITION_EVENT_CODE));
    Ok(())
}
