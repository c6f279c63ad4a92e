//! # Packet Decoder
//!
//! Entry point of the crate: turns one captured UDP payload into a
//! [`Packet`] or a [`DecodeError`].
//!
//! ## Packet Format
//! ```text
//! {u16 peer id}{u8 flags}{u8 command count}{u32 timestamp}{u32 challenge}{command...}
//! ```
//!
//! All header fields are big-endian. Commands are decoded in order over the
//! same cursor; the first failure aborts the whole packet.

use photon_core::{PeerId, Result};
use serde::Serialize;

use crate::command::{decode_command, Command};
use crate::cursor::ByteCursor;
use crate::messages::Message;

/// Size of the fixed packet header
pub const PACKET_HEADER_SIZE: usize = 12;

/// Knobs for [`PacketDecoder`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Bound every command body by its declared length
    pub strict_command_length: bool,
}

/// Fixed header at the start of every packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PacketHeader {
    pub peer_id: PeerId,
    pub flags: u8,
    pub command_count: u8,
    pub timestamp: u32,
    pub challenge: u32,
}

impl PacketHeader {
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            peer_id: PeerId::new(cursor.read_u16()?),
            flags: cursor.read_u8()?,
            command_count: cursor.read_u8()?,
            timestamp: cursor.read_u32()?,
            challenge: cursor.read_u32()?,
        })
    }
}

/// A fully decoded packet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    pub header: PacketHeader,
    /// Commands in wire order
    pub commands: Vec<Command>,
}

impl Packet {
    /// Typed payloads of all commands, in wire order
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.commands.iter().filter_map(|command| command.payload.as_ref())
    }

    /// Take ownership of the typed payloads, in wire order
    pub fn into_messages(self) -> impl Iterator<Item = Message> {
        self.commands.into_iter().filter_map(|command| command.payload)
    }
}

/// Stateless packet decoder
///
/// Holds only its options, so one decoder can be shared freely between
/// threads decoding different packets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketDecoder {
    options: DecodeOptions,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one UDP payload
    pub fn decode(&self, payload: &[u8]) -> Result<Packet> {
        let mut cursor = ByteCursor::new(payload);
        let header = PacketHeader::decode(&mut cursor)?;

        let mut commands = Vec::with_capacity(header.command_count as usize);
        for _ in 0..header.command_count {
            commands.push(decode_command(&mut cursor, &self.options)?);
        }

        if !cursor.is_empty() {
            tracing::trace!("{} trailing bytes after last command", cursor.remaining());
        }
        tracing::debug!(
            "Decoded packet from peer {} with {} commands",
            header.peer_id.get(),
            commands.len()
        );

        Ok(Packet { header, commands })
    }
}

/// Decode one UDP payload with default options
pub fn decode_packet(payload: &[u8]) -> Result<Packet> {
    PacketDecoder::new().decode(payload)
}
