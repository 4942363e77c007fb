use pretty_assertions::assert_eq;

use crate::wire::{
	ByteBuffer, DecodeOptions, EncodeOptions, Map, Value, WireError, deserialize, deserialize_slice, deserialize_with, serialize, serialize_with,
};

fn envelope(value: &Value, metadata: &[u8], opt: &EncodeOptions) -> Vec<u8> {
	let mut buffer = ByteBuffer::new();
	serialize_with(&mut buffer, value, metadata, opt).expect("serialize succeeds");
	buffer.into_vec()
}

fn raw_envelope(payload: &[u8], flags: u64) -> Vec<u8> {
	let mut bytes = b"OSSP".to_vec();
	bytes.extend_from_slice(&(16 + payload.len() as u32).to_be_bytes());
	bytes.extend_from_slice(&flags.to_be_bytes());
	bytes.extend_from_slice(payload);
	bytes.extend_from_slice(b"EOF");
	bytes
}

fn nested_sample() -> Value {
	let inner: Map = [
		(Value::Int(-7), Value::Float(2.5)),
		(Value::Float(0.25), Value::symbol("quarter")),
		(Value::symbol("flag"), Value::Bool(false)),
	]
	.into_iter()
	.collect();
	let outer: Map = [
		(Value::string("list"), Value::Array(vec![Value::Nil, Value::Bool(true), Value::Int(i64::MAX), Value::Int(i64::MIN)])),
		(Value::string("inner"), Value::Map(inner)),
		(Value::string("empty"), Value::Array(Vec::new())),
		(Value::string("bytes"), Value::String(vec![0, 255, 10])),
	]
	.into_iter()
	.collect();
	Value::Map(outer)
}

#[test]
fn nested_value_round_trips_in_both_profiles() {
	let value = nested_sample();
	for opt in [EncodeOptions::default(), EncodeOptions::compact()] {
		let bytes = envelope(&value, b"", &opt);
		let decoded = deserialize_slice(&bytes).expect("decode succeeds");
		assert_eq!(decoded.value, value);
		assert_eq!(decoded.metadata, None);
		assert_eq!(decoded.header.int_encoding(), opt.int_encoding);
	}
}

#[test]
fn compact_profile_is_smaller_for_small_ints() {
	let value = Value::Array((0..100).map(Value::Int).collect());
	let fixed = envelope(&value, b"", &EncodeOptions::default());
	let compact = envelope(&value, b"", &EncodeOptions::compact());
	assert!(compact.len() < fixed.len());
	assert_eq!(deserialize_slice(&compact).expect("decode").value, value);
}

#[test]
fn metadata_round_trips_byte_for_byte() {
	let metadata = b"version=3;EOF inside;\x00\xff";
	let bytes = envelope(&Value::Int(1), metadata, &EncodeOptions::default());
	let decoded = deserialize_slice(&bytes).expect("decode succeeds");
	assert_eq!(decoded.metadata.as_deref(), Some(&metadata[..]));
	assert_eq!(decoded.metadata_str(), None);

	let bytes = envelope(&Value::Int(1), "résumé".as_bytes(), &EncodeOptions::default());
	assert_eq!(deserialize_slice(&bytes).expect("decode").metadata_str(), Some("résumé"));
}

#[test]
fn decode_leaves_cursor_at_trailer() {
	let mut buffer = ByteBuffer::new();
	serialize(&mut buffer, &Value::symbol("s"), b"m").expect("serialize");
	let decoded = deserialize(&mut buffer).expect("decode");
	assert_eq!(decoded.value, Value::symbol("s"));
	assert_eq!(buffer.read_pos(), decoded.header.payload_end as usize);

	let again = deserialize(&mut buffer).expect("decode rewinds");
	assert_eq!(again, decoded);
}

#[test]
fn eod_tag_decodes_as_nil() {
	let bytes = raw_envelope(&[6, 0, 2, 69, 9], 0);
	let decoded = deserialize_slice(&bytes).expect("decode");
	assert_eq!(decoded.value, Value::Array(vec![Value::Nil, Value::Nil]));
}

#[test]
fn nested_undef_survives_but_root_undef_fails() {
	let bytes = envelope(&Value::Array(vec![Value::Undef]), b"", &EncodeOptions::default());
	assert_eq!(deserialize_slice(&bytes).expect("decode").value, Value::Array(vec![Value::Undef]));

	let bytes = envelope(&Value::Undef, b"", &EncodeOptions::default());
	let err = deserialize_slice(&bytes).expect_err("root undef");
	assert!(matches!(err, WireError::InvalidType { at: 16, .. }));
}

#[test]
fn unknown_tag_stops_decoding() {
	let bytes = raw_envelope(&[6, 0, 2, 9, 42], 0);
	let err = deserialize_slice(&bytes).expect_err("unknown tag");
	assert!(matches!(err, WireError::InvalidType { at: 20, .. }));
	assert_eq!(err.offset(), Some(20));
}

#[test]
fn unsupported_key_kind_on_wire_is_invalid() {
	let bytes = raw_envelope(&[5, 0, 1, 1, 9], 0);
	let err = deserialize_slice(&bytes).expect_err("boolean key");
	assert!(matches!(err, WireError::InvalidType { at: 19, .. }));
}

#[test]
fn int_tag_must_match_profile() {
	let adv_in_fixed = raw_envelope(&[127, 5], 0);
	assert!(matches!(deserialize_slice(&adv_in_fixed), Err(WireError::InvalidType { at: 16, .. })));

	let fixed_in_adv = raw_envelope(&[2, 0, 0, 0, 0, 0, 0, 0, 5], 1);
	assert!(matches!(deserialize_slice(&fixed_in_adv), Err(WireError::InvalidType { at: 16, .. })));
}

#[test]
fn truncated_payload_is_reading_error() {
	let bytes = raw_envelope(&[7, 0, 10, b'a', b'b'], 0);
	let err = deserialize_slice(&bytes).expect_err("string runs past the buffer");
	assert!(matches!(err, WireError::ReadingError { at: 19, need: 10, rem: 5 }));
}

#[test]
fn payload_shorter_than_header_claims() {
	let bytes = raw_envelope(&[9, 9], 0);
	let err = deserialize_slice(&bytes).expect_err("one value, two bytes recorded");
	assert!(matches!(err, WireError::WrongBufferSize { at: 17, .. }));
}

#[test]
fn payload_end_must_point_at_a_marker() {
	let mut bytes = raw_envelope(&[9, 9], 0);
	bytes[4..8].copy_from_slice(&17_u32.to_be_bytes());
	let err = deserialize_slice(&bytes).expect_err("no marker at recorded offset");
	assert!(matches!(err, WireError::MissingEod { at: 17 }));
}

#[test]
fn missing_eof_after_metadata() {
	let mut bytes = envelope(&Value::Nil, b"meta", &EncodeOptions::default());
	let len = bytes.len();
	bytes[len - 1] = b'X';
	let err = deserialize_slice(&bytes).expect_err("bad final marker");
	assert!(matches!(err, WireError::MissingEof { at } if at == len - 3));

	let mut bare = envelope(&Value::Nil, b"", &EncodeOptions::default());
	bare.truncate(17);
	bare.extend_from_slice(b"EOD");
	let err = deserialize_slice(&bare).expect_err("EOD without EOF");
	assert!(matches!(err, WireError::MissingEof { at: 20 }));
}

#[test]
fn trailing_garbage_after_eof_is_rejected() {
	let mut bytes = envelope(&Value::Nil, b"", &EncodeOptions::default());
	bytes.push(0);
	let err = deserialize_slice(&bytes).expect_err("extra byte");
	assert!(matches!(err, WireError::WrongBufferSize { at: 20, .. }));
}

#[test]
fn decode_depth_limit() {
	let value = Value::Array(vec![Value::Array(vec![Value::Array(Vec::new())])]);
	let bytes = envelope(&value, b"", &EncodeOptions::default());

	let mut buffer = ByteBuffer::borrowed(&bytes);
	let err = deserialize_with(&mut buffer, &DecodeOptions { max_depth: 2 }).expect_err("too deep");
	assert!(matches!(err, WireError::DepthExceeded { at: 22, max_depth: 2 }));

	let decoded = deserialize_with(&mut buffer, &DecodeOptions { max_depth: 3 }).expect("fits");
	assert_eq!(decoded.value, value);
}

#[test]
fn max_count_map_decodes() {
	let map: Map = (0..65_535_i64).map(|n| (Value::Int(n), Value::Bool(n % 2 == 0))).collect();
	let value = Value::Map(map);
	let bytes = envelope(&value, b"", &EncodeOptions::compact());
	assert_eq!(&bytes[16..19], &[5, 0xFF, 0xFF]);

	let decoded = deserialize_slice(&bytes).expect("decode");
	let map = decoded.value.as_map().expect("map");
	assert_eq!(map.len(), 65_535);
	assert_eq!(map.get(&Value::Int(65_534)), Some(&Value::Bool(true)));
	assert!(decoded.value == value);
}
