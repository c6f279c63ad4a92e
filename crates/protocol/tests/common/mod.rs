//! Byte builders for hand-assembled test packets

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use photon_protocol::{Protocol16Type, COMMAND_HEADER_SIZE};

pub const RELIABLE: u8 = 6;
pub const UNRELIABLE: u8 = 7;

pub fn packet(peer_id: u16, commands: &[BytesMut]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u16(peer_id);
    buf.put_u8(0);
    buf.put_u8(commands.len() as u8);
    buf.put_u32(0x0102_0304);
    buf.put_u32(0xA1B2_C3D4);
    for command in commands {
        buf.put_slice(command);
    }
    buf
}

/// A command whose declared length matches its body
pub fn command(command_type: u8, sequence: u32, body: &[u8]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u8(command_type);
    buf.put_u8(0);
    buf.put_u8(1);
    buf.put_u8(4);
    buf.put_u32((COMMAND_HEADER_SIZE + body.len()) as u32);
    buf.put_u32(sequence);
    buf.put_slice(body);
    buf
}

pub fn reliable(sequence: u32, message_type: u8, payload: &[u8]) -> BytesMut {
    let mut body = BytesMut::new();
    body.put_u8(0xF3);
    body.put_u8(message_type);
    body.put_u16(0);
    body.put_slice(payload);
    command(RELIABLE, sequence, &body)
}

/// `{count}({key}{tagged value})*`
pub fn table(entries: &[(u8, BytesMut)]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u16(entries.len() as u16);
    for (key, value) in entries {
        buf.put_u8(*key);
        buf.put_slice(value);
    }
    buf
}

pub fn request(operation_code: u8, entries: &[(u8, BytesMut)]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u8(operation_code);
    buf.put_slice(&table(entries));
    buf
}

pub fn response(operation_code: u8, return_code: i16, debug: BytesMut, entries: &[(u8, BytesMut)]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u8(operation_code);
    buf.put_i16(return_code);
    buf.put_slice(&debug);
    buf.put_slice(&table(entries));
    buf
}

pub fn event(code: u8, entries: &[(u8, BytesMut)]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u8(code);
    buf.put_slice(&table(entries));
    buf
}

pub fn tagged(ty: Protocol16Type, raw: &[u8]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_u8(ty.as_u8());
    buf.put_slice(raw);
    buf
}

pub fn string(s: &str) -> BytesMut {
    let mut raw = BytesMut::new();
    raw.put_u16(s.len() as u16);
    raw.put_slice(s.as_bytes());
    tagged(Protocol16Type::String, &raw)
}

pub fn byte_array(bytes: &[u8]) -> BytesMut {
    let mut raw = BytesMut::new();
    raw.put_u32(bytes.len() as u32);
    raw.put_slice(bytes);
    tagged(Protocol16Type::ByteArray, &raw)
}

pub fn integer(value: i32) -> BytesMut {
    tagged(Protocol16Type::Integer, &value.to_be_bytes())
}

pub fn short(value: i16) -> BytesMut {
    tagged(Protocol16Type::Short, &value.to_be_bytes())
}

pub fn null() -> BytesMut {
    tagged(Protocol16Type::Null, &[])
}

/// Positional record: 9 opaque bytes, then two little-endian doubles
pub fn position_record(x: f64, y: f64) -> Vec<u8> {
    let mut record = vec![0x01, 0x00, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x07];
    record.extend_from_slice(&x.to_le_bytes());
    record.extend_from_slice(&y.to_le_bytes());
    record
}
