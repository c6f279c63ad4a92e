//! # Photon Protocol Library
//!
//! This library decodes captured UDP payloads of the Photon reliable-UDP
//! transport and the Protocol16 serialization format it carries.
//!
//! ## Architecture
//!
//! The decoder is organized into several layers, leaf-first:
//!
//! ### 1. Cursor ([`cursor`])
//! Bounds-checked big- and little-endian reads over one datagram.
//!
//! ### 2. Protocol16 ([`type_codes`], [`value`], [`protocol16`])
//! Type-tagged values:
//! - Scalars: Byte, Boolean, Short, Integer, Long, Float, Double
//! - Length-prefixed: String, StringArray, ByteArray, IntegerArray
//! - Containers: Array (one shared tag), ObjectArray (tag per element),
//!   Dictionary (typed or per-element tags), Hashtable (always per-element)
//! - Embedded messages: EventData, OperationRequest, OperationResponse
//!
//! ### 3. Messages ([`parameters`], [`messages`])
//! Parameter tables and the request/response/event payloads built on them,
//! including the positional fix-up applied to event code 3.
//!
//! ### 4. Framing ([`command`], [`packet`])
//! The packet header and the command sequence it announces.
//!
//! ## Usage Example
//!
//! ```rust
//! use photon_protocol::{decode_packet, Message};
//!
//! // peer 1, no flags, no commands
//! let payload = [0x00, 0x01, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
//! let packet = decode_packet(&payload).unwrap();
//!
//! for message in packet.messages() {
//!     match message {
//!         Message::Event(event) => println!("event {}", event.code),
//!         other => println!("{} {}", other.kind(), other.code()),
//!     }
//! }
//! ```
//!
//! ## Failure Model
//!
//! Decoding is all-or-nothing. Any error at any depth aborts the packet and
//! no partially decoded structure is returned. The decoder never panics on
//! malformed input.

pub mod cursor;
pub mod type_codes;
pub mod value;
pub mod protocol16;
pub mod parameters;
pub mod messages;
pub mod command;
pub mod packet;

// Re-export commonly used items
pub use cursor::ByteCursor;
pub use type_codes::Protocol16Type;
pub use value::{DecodedValue, Dictionary};
pub use protocol16::{decode_tagged_value, decode_value, MAX_NESTING_DEPTH};
pub use parameters::{decode_parameter_table, ParameterTable};
pub use messages::*;
pub use command::{decode_command, Command, CommandType, MessageType, COMMAND_HEADER_SIZE};
pub use packet::{decode_packet, DecodeOptions, Packet, PacketDecoder, PacketHeader, PACKET_HEADER_SIZE};
pub use photon_core::{DecodeError, MessageKind, PeerId, Result, WorldPosition};
