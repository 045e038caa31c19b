//! Integration tests for the subscriber wire protocol.
//!
//! These tests exercise the codec through the crate's public API only, the
//! way a subscriber client library would: encode with [`encode_event`],
//! decode with the reference decoder [`decode_frame`], and walk
//! concatenated frames with the consumed-byte count.

use tracker_core::protocol::events::{EDGE_FRAME_LEN, MOTION_FRAME_LEN, STYLUS_BUTTON};
use tracker_core::{decode_frame, encode_event, encode_event_now, ProtocolError, TrackerEvent};

fn all_kinds() -> Vec<TrackerEvent> {
    vec![
        TrackerEvent::Pressed { button: STYLUS_BUTTON },
        TrackerEvent::Released { button: STYLUS_BUTTON },
        TrackerEvent::Moved {
            position: [-30.0, 0.25, 17.63],
        },
        TrackerEvent::Swayed {
            orientation: [179.9, -89.5, 0.0],
        },
    ]
}

#[test]
fn every_kind_round_trips_with_its_timestamp() {
    for (i, event) in all_kinds().into_iter().enumerate() {
        let ts = 1_700_000_000_000 + i as u64;
        let frame = encode_event(&event, ts);

        let (decoded, decoded_ts, consumed) = decode_frame(&frame).expect("decode failed");

        assert_eq!(decoded, event);
        assert_eq!(decoded_ts, ts);
        assert_eq!(consumed, frame.len());
    }
}

#[test]
fn frame_sizes_match_the_wire_contract() {
    for event in all_kinds() {
        let frame = encode_event(&event, 0);
        let expected = match frame[0] {
            0 | 1 => EDGE_FRAME_LEN,
            2 | 3 => MOTION_FRAME_LEN,
            tag => panic!("unexpected kind tag {tag}"),
        };
        assert_eq!(frame.len(), expected);
    }
}

#[test]
fn concatenated_stream_decodes_in_order() {
    let events = all_kinds();
    let mut stream = Vec::new();
    for (i, event) in events.iter().enumerate() {
        stream.extend(encode_event(event, i as u64));
    }

    let mut cursor = 0;
    let mut decoded = Vec::new();
    while cursor < stream.len() {
        let (event, ts, consumed) = decode_frame(&stream[cursor..]).expect("decode failed");
        decoded.push(event);
        assert_eq!(ts, decoded.len() as u64 - 1);
        cursor += consumed;
    }

    assert_eq!(decoded, events);
    assert_eq!(cursor, stream.len(), "no trailing bytes may remain");
}

#[test]
fn encode_now_produces_non_decreasing_timestamps_across_kinds() {
    let mut previous = 0u64;
    for _ in 0..25 {
        for event in all_kinds() {
            let frame = encode_event_now(&event);
            let (_, ts, _) = decode_frame(&frame).expect("decode failed");
            assert!(ts >= previous, "timestamps must be non-decreasing");
            previous = ts;
        }
    }
}

#[test]
fn garbage_leading_byte_is_rejected_without_panicking() {
    for tag in 4u8..=255 {
        let mut frame = vec![tag];
        frame.extend_from_slice(&[0u8; 40]);
        assert_eq!(decode_frame(&frame), Err(ProtocolError::UnknownEventKind(tag)));
    }
}
