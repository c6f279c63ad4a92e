//! # Transport Commands
//!
//! Each packet carries a sequence of ENet-style commands. Every command
//! starts with the same 12-byte header:
//!
//! ```text
//! {u8 type}{u8 channel}{u8 flags}{u8 reserved}{u32 length}{u32 sequence}
//! ```
//!
//! ## Bodies
//!
//! - **SendReliable (6)**: `{u8 reserved}{u8 message type}{2 bytes reserved}`
//!   followed by a request, response or event body for message types 2, 3
//!   and 4. Other message types carry no decoded payload.
//! - **SendUnreliable (7)**: 4 bytes are skipped; parsing of the following
//!   commands continues right after them.
//! - Everything else (including Disconnect (4)) is header-only.
//!
//! ## Command Length
//!
//! By default the declared length is informational only and the body is
//! parsed from the shared packet cursor. With
//! [`DecodeOptions::strict_command_length`] the body is bounded by the
//! declared length and the cursor always ends up at the command's end.

use photon_core::{DecodeError, Result};
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::messages::{read_event_data, read_operation_request, read_operation_response, Message};
use crate::packet::DecodeOptions;

/// Size of the fixed command header
pub const COMMAND_HEADER_SIZE: usize = 12;

/// Command kinds of the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandType {
    Acknowledge,
    Connect,
    VerifyConnect,
    Disconnect,
    Ping,
    SendReliable,
    SendUnreliable,
    SendFragment,
    Other(u8),
}

impl CommandType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Acknowledge,
            2 => Self::Connect,
            3 => Self::VerifyConnect,
            4 => Self::Disconnect,
            5 => Self::Ping,
            6 => Self::SendReliable,
            7 => Self::SendUnreliable,
            8 => Self::SendFragment,
            other => Self::Other(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Acknowledge => 1,
            Self::Connect => 2,
            Self::VerifyConnect => 3,
            Self::Disconnect => 4,
            Self::Ping => 5,
            Self::SendReliable => 6,
            Self::SendUnreliable => 7,
            Self::SendFragment => 8,
            Self::Other(value) => *value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acknowledge => "acknowledge",
            Self::Connect => "connect",
            Self::VerifyConnect => "verify-connect",
            Self::Disconnect => "disconnect",
            Self::Ping => "ping",
            Self::SendReliable => "send-reliable",
            Self::SendUnreliable => "send-unreliable",
            Self::SendFragment => "send-fragment",
            Self::Other(_) => "other",
        }
    }
}

/// Message kinds inside a reliable command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageType {
    Init,
    InitResponse,
    Request,
    Response,
    Event,
    InternalRequest,
    InternalResponse,
    Message,
    RawMessage,
    Other(u8),
}

impl MessageType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Init,
            1 => Self::InitResponse,
            2 => Self::Request,
            3 => Self::Response,
            4 => Self::Event,
            6 => Self::InternalRequest,
            7 => Self::InternalResponse,
            8 => Self::Message,
            9 => Self::RawMessage,
            other => Self::Other(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Init => 0,
            Self::InitResponse => 1,
            Self::Request => 2,
            Self::Response => 3,
            Self::Event => 4,
            Self::InternalRequest => 6,
            Self::InternalResponse => 7,
            Self::Message => 8,
            Self::RawMessage => 9,
            Self::Other(value) => *value,
        }
    }
}

/// One decoded command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub command_type: CommandType,
    pub channel_id: u8,
    pub command_flags: u8,
    pub command_length: u32,
    pub sequence_number: u32,
    /// Only set for reliable commands
    pub message_type: Option<MessageType>,
    /// Only set for reliable requests, responses and events
    pub payload: Option<Message>,
}

impl Command {
    pub fn is_reliable(&self) -> bool {
        self.command_type == CommandType::SendReliable
    }
}

/// Decode one command, header and body, from the packet cursor
pub fn decode_command(cursor: &mut ByteCursor<'_>, options: &DecodeOptions) -> Result<Command> {
    let command_type = CommandType::from_u8(cursor.read_u8()?);
    let channel_id = cursor.read_u8()?;
    let command_flags = cursor.read_u8()?;
    cursor.skip(1)?;
    let command_length = cursor.read_u32()?;
    let sequence_number = cursor.read_u32()?;

    tracing::trace!(
        "Command {} (channel {}, seq {}, {} bytes)",
        command_type.as_str(),
        channel_id,
        sequence_number,
        command_length
    );

    let (message_type, payload) = if options.strict_command_length {
        let declared = command_length as usize;
        let available = cursor.remaining() + COMMAND_HEADER_SIZE;
        if declared < COMMAND_HEADER_SIZE || declared > available {
            return Err(DecodeError::MalformedLength { declared, available });
        }
        let mut body = cursor.split_to(declared - COMMAND_HEADER_SIZE)?;
        match decode_body(&mut body, command_type) {
            // Only reads that ran off the body itself point at the declared length
            Err(DecodeError::TruncatedInput { .. }) if body.overran() => {
                return Err(DecodeError::MalformedLength { declared, available });
            }
            result => result?,
        }
    } else {
        decode_body(cursor, command_type)?
    };

    Ok(Command {
        command_type,
        channel_id,
        command_flags,
        command_length,
        sequence_number,
        message_type,
        payload,
    })
}

fn decode_body(
    cursor: &mut ByteCursor<'_>,
    command_type: CommandType,
) -> Result<(Option<MessageType>, Option<Message>)> {
    match command_type {
        CommandType::SendReliable => {
            cursor.skip(1)?;
            let message_type = MessageType::from_u8(cursor.read_u8()?);
            cursor.skip(2)?;

            let payload = match message_type {
                MessageType::Request => Some(Message::Request(read_operation_request(cursor, 0)?)),
                MessageType::Response => {
                    Some(Message::Response(read_operation_response(cursor, 0)?))
                }
                MessageType::Event => Some(Message::Event(read_event_data(cursor, 0)?)),
                other => {
                    tracing::debug!("Reliable command with undecoded message type {}", other.as_u8());
                    None
                }
            };
            Ok((Some(message_type), payload))
        }
        CommandType::SendUnreliable => {
            cursor.skip(4)?;
            Ok((None, None))
        }
        _ => Ok((None, None)),
    }
}
