use pretty_assertions::assert_eq;

use crate::wire::{ByteBuffer, EncodeOptions, Map, Value, WireError, serialize, serialize_with};

fn encode(value: &Value, metadata: &[u8], opt: &EncodeOptions) -> Vec<u8> {
	let mut buffer = ByteBuffer::new();
	serialize_with(&mut buffer, value, metadata, opt).expect("serialize succeeds");
	buffer.into_vec()
}

#[test]
fn nil_envelope_layout() {
	let bytes = encode(&Value::Nil, b"", &EncodeOptions::default());
	let mut expected = b"OSSP".to_vec();
	expected.extend_from_slice(&17_u32.to_be_bytes());
	expected.extend_from_slice(&0_u64.to_be_bytes());
	expected.push(9);
	expected.extend_from_slice(b"EOF");
	assert_eq!(bytes, expected);
}

#[test]
fn metadata_goes_between_markers() {
	let bytes = encode(&Value::Bool(true), b"meta", &EncodeOptions::default());
	assert_eq!(&bytes[4..8], &17_u32.to_be_bytes());
	assert_eq!(bytes[16], 1);
	assert_eq!(&bytes[17..], b"EODmetaEOF");
}

#[test]
fn fixed_int_is_tag_plus_eight_bytes() {
	let bytes = encode(&Value::Int(-3), b"", &EncodeOptions::default());
	assert_eq!(&bytes[16..25], &[2, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFD]);
}

#[test]
fn variable_int_uses_minimal_width_and_sets_flag() {
	let opt = EncodeOptions::compact();
	let bytes = encode(&Value::Int(-3), b"", &opt);
	assert_eq!(&bytes[8..16], &1_u64.to_be_bytes());
	assert_eq!(&bytes[16..18], &[127, 0xFD]);

	let bytes = encode(&Value::Int(300), b"", &opt);
	assert_eq!(&bytes[16..19], &[128, 0x01, 0x2C]);

	let bytes = encode(&Value::Int(i64::MIN), b"", &opt);
	assert_eq!(bytes[16], 134);
	assert_eq!(&bytes[17..25], &i64::MIN.to_be_bytes());
}

#[test]
fn float_is_big_endian_bits() {
	let bytes = encode(&Value::Float(-3.3), b"", &EncodeOptions::default());
	assert_eq!(bytes[16], 3);
	assert_eq!(&bytes[17..25], &(-3.3_f64).to_bits().to_be_bytes());
}

#[test]
fn strings_and_symbols_are_length_prefixed() {
	let bytes = encode(&Value::Array(vec![Value::string("hé"), Value::symbol("id")]), b"", &EncodeOptions::default());
	assert_eq!(&bytes[16..19], &[6, 0, 2]);
	assert_eq!(&bytes[19..24], &[7, 0, 3, 0x68, 0xC3]);
	assert_eq!(bytes[24], 0xA9);
	assert_eq!(&bytes[25..30], &[4, 0, 2, b'i', b'd']);
}

#[test]
fn undef_is_an_explicit_marker() {
	let bytes = encode(&Value::Array(vec![Value::Undef]), b"", &EncodeOptions::default());
	assert_eq!(&bytes[16..20], &[6, 0, 1, 8]);
}

#[test]
fn unsupported_map_keys_are_skipped_and_not_counted() {
	let map: Map = [
		(Value::string("a"), Value::Int(1)),
		(Value::Bool(true), Value::Int(2)),
		(Value::symbol("c"), Value::Int(3)),
	]
	.into_iter()
	.collect();
	let bytes = encode(&Value::Map(map), b"", &EncodeOptions::default());
	assert_eq!(&bytes[16..19], &[5, 0, 2]);
	assert_eq!(&bytes[19..23], &[7, 0, 1, b'a']);
	assert_eq!(bytes[23], 2);
	assert_eq!(&bytes[32..36], &[4, 0, 1, b'c']);
	assert_eq!(&bytes[bytes.len() - 3..], b"EOF");
	assert_eq!(bytes.len(), 36 + 9 + 3);
}

#[test]
fn overlong_string_fails_and_restores_buffer() {
	let mut buffer = ByteBuffer::new();
	buffer.append(b"keep").expect("append");
	let value = Value::Array(vec![Value::Int(1), Value::String(vec![0; 70_000])]);

	let err = serialize(&mut buffer, &value, b"").expect_err("string too long");
	assert!(matches!(err, WireError::StringTooLong { len: 70_000, max: 65_535, .. }));
	assert_eq!(buffer.data(), b"keep");
}

#[test]
fn oversized_array_is_rejected() {
	let value = Value::Array(vec![Value::Nil; 65_536]);
	let err = serialize(&mut ByteBuffer::new(), &value, b"").expect_err("too many elements");
	assert!(matches!(err, WireError::TooManyElements { at: 16, max: 65_535 }));
}

#[test]
fn max_count_array_is_accepted() {
	let value = Value::Array(vec![Value::Nil; 65_535]);
	let bytes = encode(&value, b"", &EncodeOptions::default());
	assert_eq!(&bytes[16..19], &[6, 0xFF, 0xFF]);
}

#[test]
fn depth_limit_is_enforced() {
	let mut value = Value::Int(0);
	for _ in 0..4 {
		value = Value::Array(vec![value]);
	}

	let shallow = EncodeOptions {
		max_depth: 3,
		..EncodeOptions::default()
	};
	let err = serialize_with(&mut ByteBuffer::new(), &value, b"", &shallow).expect_err("too deep");
	assert!(matches!(err, WireError::DepthExceeded { max_depth: 3, .. }));

	let exact = EncodeOptions {
		max_depth: 4,
		..EncodeOptions::default()
	};
	serialize_with(&mut ByteBuffer::new(), &value, b"", &exact).expect("depth 4 fits");
}

#[test]
fn read_only_buffer_is_rejected() {
	let bytes = [0_u8; 4];
	let mut buffer = ByteBuffer::borrowed(&bytes);
	let err = serialize(&mut buffer, &Value::Nil, b"").expect_err("read-only");
	assert!(matches!(err, WireError::ReadOnly));
	assert_eq!(buffer.data(), &bytes);
}
