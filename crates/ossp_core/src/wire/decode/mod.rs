use tracing::debug;

use crate::wire::bytes::Scalar;
use crate::wire::encode::DEFAULT_MAX_DEPTH;
use crate::wire::int::from_be_sign_extended;
use crate::wire::{ByteBuffer, EOD_MARKER, EOF_MARKER, EnvelopeHeader, IntEncoding, Map, Result, Tag, Value, WireError};

/// Runtime limits for envelope decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum container nesting depth.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

/// Decoded envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Deserialized {
	/// Root value.
	pub value: Value,
	/// Bytes between the `EOD` and `EOF` markers, when present.
	pub metadata: Option<Vec<u8>>,
	/// Parsed envelope header.
	pub header: EnvelopeHeader,
}

impl Deserialized {
	/// Metadata as UTF-8, when present and valid.
	pub fn metadata_str(&self) -> Option<&str> {
		self.metadata.as_deref().and_then(|bytes| std::str::from_utf8(bytes).ok())
	}
}

/// Decode the envelope occupying `buffer` using default options.
pub fn deserialize(buffer: &mut ByteBuffer<'_>) -> Result<Deserialized> {
	deserialize_with(buffer, &DecodeOptions::default())
}

/// Decode an envelope from a borrowed byte slice.
pub fn deserialize_slice(bytes: &[u8]) -> Result<Deserialized> {
	deserialize(&mut ByteBuffer::borrowed(bytes))
}

/// Decode the envelope occupying `buffer`, which must start at offset 0.
///
/// The read cursor is rewound first and ends at the trailer start.
pub fn deserialize_with(buffer: &mut ByteBuffer<'_>, opt: &DecodeOptions) -> Result<Deserialized> {
	buffer.rewind();
	let header = EnvelopeHeader::read(buffer)?;
	let trailer_at = header.payload_end as usize;
	let metadata = read_trailer(buffer, trailer_at)?;

	let mut decoder = Decoder {
		buffer,
		int_encoding: header.int_encoding(),
		max_depth: opt.max_depth,
	};
	let value = decoder.decode_value(0)?;
	if value == Value::Undef {
		return Err(WireError::InvalidType {
			at: EnvelopeHeader::SIZE,
			detail: "root value is undefined".to_owned(),
		});
	}

	let end = decoder.buffer.read_pos();
	if end != trailer_at {
		return Err(WireError::WrongBufferSize {
			at: end,
			detail: format!("payload ends at {end}, header records {trailer_at}"),
		});
	}

	debug!(
		size = decoder.buffer.size(),
		metadata = metadata.as_ref().map_or(0, Vec::len),
		int_encoding = header.int_encoding().as_str(),
		"deserialized envelope"
	);
	Ok(Deserialized { value, metadata, header })
}

/// Validate the trailer at `trailer_at` and slice out metadata.
fn read_trailer(buffer: &ByteBuffer<'_>, trailer_at: usize) -> Result<Option<Vec<u8>>> {
	let data = buffer.data();
	let size = data.len();
	let marker_len = EOF_MARKER.len();

	if trailer_at < EnvelopeHeader::SIZE || trailer_at.saturating_add(marker_len) > size {
		return Err(WireError::WrongBufferSize {
			at: trailer_at,
			detail: format!("trailer at {trailer_at} does not fit buffer of {size} bytes"),
		});
	}

	let marker = &data[trailer_at..trailer_at + marker_len];
	if *marker == EOF_MARKER {
		if trailer_at + marker_len != size {
			return Err(WireError::WrongBufferSize {
				at: trailer_at + marker_len,
				detail: format!("{} bytes follow the EOF marker", size - trailer_at - marker_len),
			});
		}
		return Ok(None);
	}

	if *marker != EOD_MARKER {
		return Err(WireError::MissingEod { at: trailer_at });
	}

	let metadata_at = trailer_at + EOD_MARKER.len();
	if metadata_at + marker_len > size {
		return Err(WireError::MissingEof { at: metadata_at });
	}
	let eof_at = size - marker_len;
	if data[eof_at..] != EOF_MARKER {
		return Err(WireError::MissingEof { at: eof_at });
	}

	Ok(Some(data[metadata_at..eof_at].to_vec()))
}

struct Decoder<'b, 'a> {
	buffer: &'b mut ByteBuffer<'a>,
	int_encoding: IntEncoding,
	max_depth: u32,
}

impl Decoder<'_, '_> {
	fn decode_value(&mut self, depth: u32) -> Result<Value> {
		let at = self.buffer.read_pos();
		let tag = Tag::from_byte(self.read::<u8>()?);

		match tag {
			Tag::False => Ok(Value::Bool(false)),
			Tag::True => Ok(Value::Bool(true)),
			Tag::Nil | Tag::Eod => Ok(Value::Nil),
			Tag::Undef => Ok(Value::Undef),
			Tag::Float => Ok(Value::Float(self.read::<f64>()?)),
			Tag::String => Ok(Value::String(self.read_bytes()?)),
			Tag::Symbol => Ok(Value::Symbol(self.read_bytes()?)),
			Tag::Array => self.decode_array(at, depth),
			Tag::Hash => self.decode_map(at, depth),
			Tag::Int
			| Tag::AdvByte1
			| Tag::AdvByte2
			| Tag::AdvByte3
			| Tag::AdvByte4
			| Tag::AdvByte5
			| Tag::AdvByte6
			| Tag::AdvByte7
			| Tag::AdvByte8 => self.decode_int(at, tag).map(Value::Int),
			Tag::Invalid => Err(self.invalid_tag(at)),
		}
	}

	fn decode_array(&mut self, at: usize, depth: u32) -> Result<Value> {
		self.check_depth(at, depth)?;
		let count = usize::from(self.read::<u16>()?);

		let mut items = Vec::with_capacity(count.min(self.buffer.remaining()));
		for _ in 0..count {
			items.push(self.decode_value(depth + 1)?);
		}
		Ok(Value::Array(items))
	}

	fn decode_map(&mut self, at: usize, depth: u32) -> Result<Value> {
		self.check_depth(at, depth)?;
		let count = usize::from(self.read::<u16>()?);

		let mut map = Map::with_capacity(count.min(self.buffer.remaining()));
		for _ in 0..count {
			let key = self.decode_key()?;
			let value = self.decode_value(depth + 1)?;
			map.set(key, value);
		}
		Ok(Value::Map(map))
	}

	fn decode_key(&mut self) -> Result<Value> {
		let at = self.buffer.read_pos();
		let tag = Tag::from_byte(self.read::<u8>()?);

		match tag {
			Tag::String => Ok(Value::String(self.read_bytes()?)),
			Tag::Symbol => Ok(Value::Symbol(self.read_bytes()?)),
			Tag::Float => Ok(Value::Float(self.read::<f64>()?)),
			Tag::Int => self.decode_int(at, tag).map(Value::Int),
			_ if tag.adv_width().is_some() => self.decode_int(at, tag).map(Value::Int),
			Tag::Invalid => Err(self.invalid_tag(at)),
			_ => Err(WireError::InvalidType {
				at,
				detail: format!("{} cannot be a map key", tag.as_str()),
			}),
		}
	}

	fn decode_int(&mut self, at: usize, tag: Tag) -> Result<i64> {
		match (self.int_encoding, tag.adv_width()) {
			(IntEncoding::Fixed, None) => self.read::<i64>(),
			(IntEncoding::Variable, Some(width)) => {
				let bytes = self.buffer.read_exact(width).map_err(WireError::into_reading_error)?;
				Ok(from_be_sign_extended(bytes))
			}
			_ => Err(WireError::InvalidType {
				at,
				detail: format!("{} integer tag in a {} integer stream", tag.as_str(), self.int_encoding.as_str()),
			}),
		}
	}

	fn read<T: Scalar>(&mut self) -> Result<T> {
		self.buffer.read::<T>().map_err(WireError::into_reading_error)
	}

	fn read_bytes(&mut self) -> Result<Vec<u8>> {
		let len = usize::from(self.read::<u16>()?);
		self.buffer.read_exact(len).map(<[u8]>::to_vec).map_err(WireError::into_reading_error)
	}

	fn check_depth(&self, at: usize, depth: u32) -> Result<()> {
		if depth >= self.max_depth {
			return Err(WireError::DepthExceeded {
				at,
				max_depth: self.max_depth,
			});
		}
		Ok(())
	}

	fn invalid_tag(&self, at: usize) -> WireError {
		let byte = self.buffer.data().get(at).copied().unwrap_or_default();
		WireError::InvalidType {
			at,
			detail: format!("unknown tag byte {byte}"),
		}
	}
}

#[cfg(test)]
mod tests;
