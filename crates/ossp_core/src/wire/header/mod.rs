use crate::wire::{ByteBuffer, Result, WireError};

/// Leading envelope bytes.
pub const MAGIC: [u8; 4] = *b"OSSP";
/// Trailer marker introducing metadata.
pub const EOD_MARKER: [u8; 3] = *b"EOD";
/// Final trailer marker.
pub const EOF_MARKER: [u8; 3] = *b"EOF";
/// Header flag: integers use the variable-width `AdvByte*` encoding.
pub const FLAG_VARIABLE_INTS: u64 = 1;

/// Integer wire profile recorded in the envelope flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntEncoding {
	/// `Int` tag followed by 8 big-endian bytes.
	#[default]
	Fixed,
	/// `AdvByteN` tag followed by the minimal N big-endian bytes.
	Variable,
}

impl IntEncoding {
	/// Profile selected by header `flags`.
	pub fn from_flags(flags: u64) -> Self {
		if flags & FLAG_VARIABLE_INTS != 0 { Self::Variable } else { Self::Fixed }
	}

	/// Header flag bits announcing this profile.
	pub fn flag_bits(self) -> u64 {
		match self {
			Self::Fixed => 0,
			Self::Variable => FLAG_VARIABLE_INTS,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Fixed => "fixed",
			Self::Variable => "variable",
		}
	}
}

/// Fixed 16-byte prefix of every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
	/// Offset of the trailer relative to the envelope start.
	pub payload_end: u32,
	/// Format flags; see [`FLAG_VARIABLE_INTS`].
	pub flags: u64,
}

impl EnvelopeHeader {
	/// Encoded header size.
	pub const SIZE: usize = 16;
	/// Offset of the backpatched `payload_end` field.
	pub const PAYLOAD_END_OFFSET: usize = 4;

	/// Integer profile the payload was written with.
	pub fn int_encoding(self) -> IntEncoding {
		IntEncoding::from_flags(self.flags)
	}

	/// Append a header with a zero `payload_end` placeholder.
	pub fn write_placeholder(buffer: &mut ByteBuffer<'_>, flags: u64) -> Result<()> {
		buffer.append(&MAGIC)?;
		buffer.append_scalar(0_u32)?;
		buffer.append_scalar(flags)
	}

	/// Backpatch `payload_end` for an envelope that starts at `envelope_start`.
	pub fn patch_payload_end(buffer: &mut ByteBuffer<'_>, envelope_start: usize, payload_end: usize) -> Result<()> {
		let value = u32::try_from(payload_end).map_err(|_| WireError::PayloadTooLarge { at: payload_end })?;
		buffer.set_scalar_at(envelope_start + Self::PAYLOAD_END_OFFSET, value)
	}

	/// Read and validate a header at the buffer's read cursor.
	pub fn read(buffer: &mut ByteBuffer<'_>) -> Result<Self> {
		let at = buffer.read_pos();
		let mut magic = [0_u8; 4];
		if buffer.read_into(&mut magic).is_err() {
			return Err(WireError::MissingMagicNumber {
				at,
				got: buffer.data_at(at).map(<[u8]>::to_vec).unwrap_or_default(),
			});
		}
		if magic != MAGIC {
			return Err(WireError::MissingMagicNumber { at, got: magic.to_vec() });
		}

		let truncated = |buffer: &ByteBuffer<'_>| WireError::WrongBufferSize {
			at: buffer.read_pos(),
			detail: format!("header needs {} bytes, buffer has {}", Self::SIZE, buffer.size()),
		};
		let payload_end = buffer.read::<u32>().map_err(|_| truncated(buffer))?;
		let flags = buffer.read::<u64>().map_err(|_| truncated(buffer))?;

		Ok(Self { payload_end, flags })
	}
}
