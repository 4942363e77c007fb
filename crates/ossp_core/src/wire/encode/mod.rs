use tracing::{debug, trace};

use crate::wire::int::{min_width, to_be_trimmed};
use crate::wire::{ByteBuffer, EOD_MARKER, EOF_MARKER, EnvelopeHeader, IntEncoding, Map, Result, Tag, Value, WireError};

/// Largest string length or container count the 16-bit fields can carry.
pub const MAX_COUNT: usize = u16::MAX as usize;
/// Default container nesting limit for both directions.
pub const DEFAULT_MAX_DEPTH: u32 = 128;

/// Runtime switches for envelope encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Integer wire profile, recorded in the header flags.
	pub int_encoding: IntEncoding,
	/// Maximum container nesting depth.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			int_encoding: IntEncoding::Fixed,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl EncodeOptions {
	/// Preset that writes integers with the minimal variable width.
	pub fn compact() -> Self {
		Self {
			int_encoding: IntEncoding::Variable,
			..Self::default()
		}
	}
}

/// Append one envelope for `value` using default options.
pub fn serialize(buffer: &mut ByteBuffer<'_>, value: &Value, metadata: &[u8]) -> Result<()> {
	serialize_with(buffer, value, metadata, &EncodeOptions::default())
}

/// Append one envelope for `value`.
///
/// Empty `metadata` produces a bare `EOF` trailer. On error the buffer is cut
/// back to its size before the call.
pub fn serialize_with(buffer: &mut ByteBuffer<'_>, value: &Value, metadata: &[u8], opt: &EncodeOptions) -> Result<()> {
	let envelope_start = buffer.size();
	let result = write_envelope(buffer, envelope_start, value, metadata, opt);
	if result.is_err() && !buffer.is_read_only() {
		buffer.truncate(envelope_start)?;
	}
	result?;

	debug!(
		size = buffer.size() - envelope_start,
		metadata = metadata.len(),
		int_encoding = opt.int_encoding.as_str(),
		"serialized envelope"
	);
	Ok(())
}

fn write_envelope(buffer: &mut ByteBuffer<'_>, envelope_start: usize, value: &Value, metadata: &[u8], opt: &EncodeOptions) -> Result<()> {
	EnvelopeHeader::write_placeholder(buffer, opt.int_encoding.flag_bits())?;
	encode_value(buffer, value, opt, 0)?;
	EnvelopeHeader::patch_payload_end(buffer, envelope_start, buffer.size() - envelope_start)?;

	if !metadata.is_empty() {
		buffer.append(&EOD_MARKER)?;
		buffer.append(metadata)?;
	}
	buffer.append(&EOF_MARKER)
}

fn encode_value(buffer: &mut ByteBuffer<'_>, value: &Value, opt: &EncodeOptions, depth: u32) -> Result<()> {
	match value {
		Value::Nil | Value::Bool(_) | Value::Undef => buffer.append_scalar(value.tag().as_byte()),
		Value::Int(number) => encode_int(buffer, *number, opt.int_encoding),
		Value::Float(number) => encode_float(buffer, *number),
		Value::String(bytes) => encode_bytes(buffer, Tag::String, bytes),
		Value::Symbol(bytes) => encode_bytes(buffer, Tag::Symbol, bytes),
		Value::Array(items) => encode_array(buffer, items, opt, depth),
		Value::Map(map) => encode_map(buffer, map, opt, depth),
	}
}

fn encode_int(buffer: &mut ByteBuffer<'_>, number: i64, encoding: IntEncoding) -> Result<()> {
	match encoding {
		IntEncoding::Fixed => {
			buffer.append_scalar(Tag::Int.as_byte())?;
			buffer.append_scalar(number)
		}
		IntEncoding::Variable => {
			let width = min_width(number);
			let tag = Tag::adv_byte(width).unwrap_or(Tag::AdvByte8);
			buffer.append_scalar(tag.as_byte())?;
			buffer.append(&to_be_trimmed(number, width)[..width])
		}
	}
}

fn encode_float(buffer: &mut ByteBuffer<'_>, number: f64) -> Result<()> {
	buffer.append_scalar(Tag::Float.as_byte())?;
	buffer.append_scalar(number)
}

fn encode_bytes(buffer: &mut ByteBuffer<'_>, tag: Tag, bytes: &[u8]) -> Result<()> {
	let len = u16::try_from(bytes.len()).map_err(|_| WireError::StringTooLong {
		at: buffer.size(),
		len: bytes.len(),
		max: MAX_COUNT,
	})?;
	buffer.append_scalar(tag.as_byte())?;
	buffer.append_scalar(len)?;
	buffer.append(bytes)
}

fn encode_array(buffer: &mut ByteBuffer<'_>, items: &[Value], opt: &EncodeOptions, depth: u32) -> Result<()> {
	let at = buffer.size();
	check_depth(at, depth, opt)?;
	if items.len() > MAX_COUNT {
		return Err(WireError::TooManyElements { at, max: MAX_COUNT });
	}

	let count_pos = begin_container(buffer, Tag::Array)?;
	for item in items {
		encode_value(buffer, item, opt, depth + 1)?;
	}
	buffer.set_scalar_at(count_pos, items.len() as u16)
}

fn encode_map(buffer: &mut ByteBuffer<'_>, map: &Map, opt: &EncodeOptions, depth: u32) -> Result<()> {
	let at = buffer.size();
	check_depth(at, depth, opt)?;

	let count_pos = begin_container(buffer, Tag::Hash)?;
	let mut count = 0_usize;
	for (key, value) in map.iter() {
		if !encode_key(buffer, key, opt.int_encoding)? {
			trace!(kind = key.tag().as_str(), at = buffer.size(), "skipped map entry with unsupported key");
			continue;
		}
		if count == MAX_COUNT {
			return Err(WireError::TooManyElements { at, max: MAX_COUNT });
		}
		encode_value(buffer, value, opt, depth + 1)?;
		count += 1;
	}
	buffer.set_scalar_at(count_pos, count as u16)
}

/// Write a map key. Returns `false`, writing nothing, for kinds that cannot be keys.
fn encode_key(buffer: &mut ByteBuffer<'_>, key: &Value, encoding: IntEncoding) -> Result<bool> {
	match key {
		Value::String(bytes) => encode_bytes(buffer, Tag::String, bytes)?,
		Value::Symbol(bytes) => encode_bytes(buffer, Tag::Symbol, bytes)?,
		Value::Int(number) => encode_int(buffer, *number, encoding)?,
		Value::Float(number) => encode_float(buffer, *number)?,
		Value::Nil | Value::Bool(_) | Value::Array(_) | Value::Map(_) | Value::Undef => return Ok(false),
	}
	Ok(true)
}

/// Write the container tag and a zero count; returns the count's offset.
fn begin_container(buffer: &mut ByteBuffer<'_>, tag: Tag) -> Result<usize> {
	buffer.append_scalar(tag.as_byte())?;
	let count_pos = buffer.current_pos();
	buffer.append_scalar(0_u16)?;
	Ok(count_pos)
}

fn check_depth(at: usize, depth: u32, opt: &EncodeOptions) -> Result<()> {
	if depth >= opt.max_depth {
		return Err(WireError::DepthExceeded { at, max_depth: opt.max_depth });
	}
	Ok(())
}

#[cfg(test)]
mod tests;
