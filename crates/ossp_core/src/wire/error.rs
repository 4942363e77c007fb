use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors produced by the byte buffer and the OSSP codec.
#[derive(Debug, Error)]
pub enum WireError {
	/// Filesystem IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Write attempted on a buffer constructed over read-only memory.
	#[error("buffer is read-only")]
	ReadOnly,
	/// Patch would extend past the logical end of the buffer.
	#[error("patch out of range at offset {at}: len={len}, size={size}")]
	PatchOutOfRange {
		/// Patch start offset.
		at: usize,
		/// Patch length in bytes.
		len: usize,
		/// Logical buffer size.
		size: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Storage could not be grown.
	#[error("allocation of {requested} bytes failed")]
	AllocationFailed {
		/// Requested total capacity.
		requested: usize,
	},
	/// zstd reported an error while compressing or decompressing.
	#[error("compression: {0}")]
	Compression(std::io::Error),
	/// Compressed buffer lacks the original-size prefix.
	#[error("compressed buffer too short: {size} bytes")]
	CompressedTooShort {
		/// Logical buffer size.
		size: usize,
	},
	/// Decompressed output length disagrees with the recorded size.
	#[error("decompressed size mismatch: expected {expected}, got {got}")]
	DecompressedSizeMismatch {
		/// Size recorded in the prefix.
		expected: usize,
		/// Bytes actually produced.
		got: usize,
	},
	/// Value kind cannot be encoded or decoded at this position.
	#[error("invalid type at offset {at}: {detail}")]
	InvalidType {
		/// Byte offset of the offending tag.
		at: usize,
		/// What was found.
		detail: String,
	},
	/// An underlying read failed mid-decode.
	#[error("reading error at offset {at}: need {need} bytes, remaining {rem}")]
	ReadingError {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Envelope does not start with the `OSSP` magic.
	#[error("missing magic number at offset {at} (got {got:?})")]
	MissingMagicNumber {
		/// Offset of the magic field.
		at: usize,
		/// Bytes found in place of the magic.
		got: Vec<u8>,
	},
	/// No `EOD`/`EOF` marker at the recorded trailer offset.
	#[error("missing EOD marker at offset {at}")]
	MissingEod {
		/// Recorded trailer offset.
		at: usize,
	},
	/// Metadata trailer is not closed by `EOF`.
	#[error("missing EOF marker at offset {at}")]
	MissingEof {
		/// Offset where `EOF` was expected.
		at: usize,
	},
	/// Buffer length is inconsistent with the envelope framing.
	#[error("wrong buffer size at offset {at}: {detail}")]
	WrongBufferSize {
		/// Offset where the inconsistency was detected.
		at: usize,
		/// Human-readable description.
		detail: String,
	},
	/// String or symbol exceeds the 16-bit length field.
	#[error("string of {len} bytes at offset {at} exceeds {max}")]
	StringTooLong {
		/// Offset of the value tag.
		at: usize,
		/// Byte length of the value.
		len: usize,
		/// Maximum encodable length.
		max: usize,
	},
	/// Array or map exceeds the 16-bit count field.
	#[error("container at offset {at} has more than {max} entries")]
	TooManyElements {
		/// Offset of the container tag.
		at: usize,
		/// Maximum encodable count.
		max: usize,
	},
	/// Trailer offset does not fit the 32-bit size field.
	#[error("payload ends at offset {at}, beyond the 32-bit size field")]
	PayloadTooLarge {
		/// Trailer offset.
		at: usize,
	},
	/// Value nesting exceeded the configured limit.
	#[error("nesting depth exceeded at offset {at} (max={max_depth})")]
	DepthExceeded {
		/// Offset of the container that went too deep.
		at: usize,
		/// Configured depth ceiling.
		max_depth: u32,
	},
}

impl WireError {
	/// Byte offset attached to the error, when there is one.
	pub fn offset(&self) -> Option<usize> {
		match self {
			Self::PatchOutOfRange { at, .. }
			| Self::UnexpectedEof { at, .. }
			| Self::InvalidType { at, .. }
			| Self::ReadingError { at, .. }
			| Self::MissingMagicNumber { at, .. }
			| Self::MissingEod { at }
			| Self::MissingEof { at }
			| Self::WrongBufferSize { at, .. }
			| Self::StringTooLong { at, .. }
			| Self::TooManyElements { at, .. }
			| Self::PayloadTooLarge { at }
			| Self::DepthExceeded { at, .. } => Some(*at),
			Self::Io(_)
			| Self::ReadOnly
			| Self::AllocationFailed { .. }
			| Self::Compression(_)
			| Self::CompressedTooShort { .. }
			| Self::DecompressedSizeMismatch { .. } => None,
		}
	}

	/// Map a buffer underrun into the codec-level reading error.
	pub(crate) fn into_reading_error(self) -> Self {
		match self {
			Self::UnexpectedEof { at, need, rem } => Self::ReadingError { at, need, rem },
			other => other,
		}
	}
}
