//! End-to-end decoding of hand-assembled packets

mod common;

use bytes::{BufMut, BytesMut};
use common::*;
use photon_protocol::{
    decode_packet, CommandType, DecodeError, DecodeOptions, DecodedValue, Message, MessageKind,
    MessageType, PacketDecoder, Protocol16Type, WorldPosition,
};

#[test]
fn empty_packet_has_no_commands() {
    let bytes = [0x00, 0x01, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
    let packet = decode_packet(&bytes).unwrap();

    assert_eq!(packet.header.peer_id.get(), 1);
    assert_eq!(packet.header.timestamp, 0);
    assert_eq!(packet.header.challenge, 0);
    assert!(packet.commands.is_empty());
}

#[test]
fn mixed_packet_decodes_every_payload_in_order() {
    let request_cmd = reliable(
        1,
        2,
        &request(
            7,
            &[
                (0, string("hello")),
                (1, tagged(Protocol16Type::Boolean, &[1])),
                (2, tagged(Protocol16Type::Boolean, &[0])),
            ],
        ),
    );
    let response_cmd = reliable(2, 3, &response(7, 0, null(), &[(0, integer(-5))]));
    let event_cmd = reliable(3, 4, &event(12, &[(9, short(300))]));
    let ack = command(1, 4, &[]);

    let bytes = packet(55, &[request_cmd, ack, response_cmd, event_cmd]);
    let packet = decode_packet(&bytes).unwrap();

    assert_eq!(packet.header.command_count, 4);
    assert_eq!(packet.commands[1].command_type, CommandType::Acknowledge);
    assert_eq!(packet.commands[2].message_type, Some(MessageType::Response));

    let kinds: Vec<_> = packet.messages().map(Message::kind).collect();
    assert_eq!(
        kinds,
        vec![MessageKind::Request, MessageKind::Response, MessageKind::Event]
    );

    let Some(Message::Request(req)) = &packet.commands[0].payload else {
        panic!("expected request");
    };
    assert_eq!(req.operation_code, 7);
    assert_eq!(req.parameters.get(0), Some(&DecodedValue::String("hello".into())));
    assert_eq!(req.parameters.get(1), Some(&DecodedValue::Boolean(true)));
    assert_eq!(req.parameters.get(2), Some(&DecodedValue::Boolean(false)));

    let Some(Message::Response(resp)) = &packet.commands[2].payload else {
        panic!("expected response");
    };
    assert_eq!(resp.return_code, 0);
    assert!(resp.debug_message.is_null());
    assert_eq!(resp.parameters.get(0), Some(&DecodedValue::Integer(-5)));

    let Some(Message::Event(ev)) = &packet.commands[3].payload else {
        panic!("expected event");
    };
    assert_eq!(ev.code, 12);
    assert_eq!(ev.parameters.get(9), Some(&DecodedValue::Short(300)));
}

#[test]
fn position_event_gets_synthetic_parameters() {
    let record = position_record(-17.5, 204.125);
    let bytes = packet(
        1,
        &[reliable(1, 4, &event(3, &[(0, integer(991)), (1, byte_array(&record))]))],
    );

    let packet = decode_packet(&bytes).unwrap();
    let Some(Message::Event(ev)) = packet.messages().next() else {
        panic!("expected event");
    };

    assert_eq!(ev.parameters.get(4), Some(&DecodedValue::Double(-17.5)));
    assert_eq!(ev.parameters.get(5), Some(&DecodedValue::Double(204.125)));
    assert_eq!(ev.parameters.get(252), Some(&DecodedValue::Byte(3)));
    assert_eq!(ev.parameters.get(1), Some(&DecodedValue::ByteArray(record)));
    assert_eq!(ev.position(), Some(WorldPosition::new(-17.5, 204.125)));
}

#[test]
fn position_event_without_byte_array_fails_packet() {
    let missing = packet(1, &[reliable(1, 4, &event(3, &[(0, integer(1))]))]);
    assert_eq!(decode_packet(&missing), Err(DecodeError::MissingParameter(1)));

    let mistyped = packet(1, &[reliable(1, 4, &event(3, &[(1, string("nope"))]))]);
    assert_eq!(decode_packet(&mistyped), Err(DecodeError::MissingParameter(1)));
}

#[test]
fn unsupported_tag_deep_in_packet_fails_packet() {
    let bad = tagged(Protocol16Type::ObjectArray, &[0x00, 0x01, 0x63]);
    let bytes = packet(1, &[command(1, 1, &[]), reliable(2, 2, &request(1, &[(0, bad)]))]);

    assert_eq!(decode_packet(&bytes), Err(DecodeError::UnsupportedTypeCode(0x63)));
}

#[test]
fn unreliable_command_continues_with_next_command() {
    let mut unreliable_body = BytesMut::new();
    unreliable_body.put_u32(77);
    let bytes = packet(
        1,
        &[
            command(UNRELIABLE, 1, &unreliable_body),
            reliable(2, 4, &event(8, &[])),
        ],
    );

    let packet = decode_packet(&bytes).unwrap();
    assert_eq!(packet.commands[0].command_type, CommandType::SendUnreliable);
    assert_eq!(packet.messages().count(), 1);
}

#[test]
fn nested_containers_in_parameters() {
    // Hashtable { "items": Array<Integer>[1, 2] }
    let mut array = BytesMut::new();
    array.put_u16(2);
    array.put_u8(Protocol16Type::Integer.as_u8());
    array.put_i32(1);
    array.put_i32(2);

    let mut hashtable = BytesMut::new();
    hashtable.put_u16(1);
    hashtable.put_slice(&string("items"));
    hashtable.put_slice(&tagged(Protocol16Type::Array, &array));

    let bytes = packet(
        1,
        &[reliable(1, 2, &request(3, &[(5, tagged(Protocol16Type::Hashtable, &hashtable))]))],
    );
    let packet = decode_packet(&bytes).unwrap();

    let params = packet.messages().next().unwrap().parameters();
    let Some(DecodedValue::Hashtable(table)) = params.get(5) else {
        panic!("expected hashtable");
    };
    assert_eq!(
        table.get(&DecodedValue::String("items".into())),
        Some(&DecodedValue::Array(vec![
            DecodedValue::Integer(1),
            DecodedValue::Integer(2)
        ]))
    );
}

#[test]
fn embedded_event_value() {
    let mut inner = BytesMut::new();
    inner.put_u8(40);
    inner.put_slice(&table(&[(0, short(1))]));

    let bytes = packet(
        1,
        &[reliable(1, 2, &request(3, &[(0, tagged(Protocol16Type::EventData, &inner))]))],
    );
    let packet = decode_packet(&bytes).unwrap();

    let Some(DecodedValue::EventData(ev)) = packet.messages().next().unwrap().parameters().get(0)
    else {
        panic!("expected embedded event");
    };
    assert_eq!(ev.code, 40);
    assert_eq!(ev.parameters.get(0), Some(&DecodedValue::Short(1)));
}

#[test]
fn decoding_is_deterministic() {
    let record = position_record(1.0, 2.0);
    let bytes = packet(
        9,
        &[
            reliable(1, 2, &request(1, &[(0, string("x"))])),
            reliable(2, 4, &event(3, &[(1, byte_array(&record))])),
        ],
    );

    let first = decode_packet(&bytes).unwrap();
    let second = decode_packet(&bytes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn strict_decoder_matches_lenient_on_well_formed_input() {
    let bytes = packet(
        2,
        &[
            reliable(1, 2, &request(1, &[(0, string("x"))])),
            command(1, 2, &[]),
            reliable(3, 3, &response(1, -3, string("denied"), &[])),
        ],
    );

    let strict = PacketDecoder::with_options(DecodeOptions {
        strict_command_length: true,
    });
    assert_eq!(strict.decode(&bytes).unwrap(), decode_packet(&bytes).unwrap());
}

#[test]
fn strict_decoder_steps_over_unknown_message_bodies() {
    let mut raw = BytesMut::new();
    raw.put_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let bytes = packet(
        2,
        &[reliable(1, 9, &raw), reliable(2, 4, &event(11, &[]))],
    );

    let strict = PacketDecoder::with_options(DecodeOptions {
        strict_command_length: true,
    });
    let packet = strict.decode(&bytes).unwrap();
    assert_eq!(packet.commands[0].payload, None);
    assert_eq!(packet.messages().next().map(Message::code), Some(11));
}

#[test]
fn decoded_packet_serializes_to_json() {
    let bytes = packet(1, &[reliable(1, 4, &event(12, &[(9, short(300))]))]);
    let packet = decode_packet(&bytes).unwrap();

    let json = serde_json::to_value(&packet).unwrap();
    assert_eq!(json["commands"][0]["payload"]["kind"], "event");
    assert_eq!(json["commands"][0]["payload"]["code"], 12);
    assert_eq!(json["commands"][0]["payload"]["parameters"]["9"]["value"], 300);
}
