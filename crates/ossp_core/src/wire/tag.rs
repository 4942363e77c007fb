/// One-byte type marker preceding every value in the payload stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
	/// Boolean `false`.
	False = 0,
	/// Boolean `true`.
	True = 1,
	/// Fixed-width 8-byte integer.
	Int = 2,
	/// 8-byte IEEE-754 float.
	Float = 3,
	/// Length-prefixed symbol name.
	Symbol = 4,
	/// Counted key/value map.
	Hash = 5,
	/// Counted element array.
	Array = 6,
	/// Length-prefixed byte string.
	String = 7,
	/// Explicit marker for a value that had no encodable kind.
	Undef = 8,
	/// Nil.
	Nil = 9,
	/// In-stream end-of-data marker, decoded as nil.
	Eod = 69,
	/// Variable-width integer, 1 byte.
	AdvByte1 = 127,
	/// Variable-width integer, 2 bytes.
	AdvByte2 = 128,
	/// Variable-width integer, 3 bytes.
	AdvByte3 = 129,
	/// Variable-width integer, 4 bytes.
	AdvByte4 = 130,
	/// Variable-width integer, 5 bytes.
	AdvByte5 = 131,
	/// Variable-width integer, 6 bytes.
	AdvByte6 = 132,
	/// Variable-width integer, 7 bytes.
	AdvByte7 = 133,
	/// Variable-width integer, 8 bytes.
	AdvByte8 = 134,
	/// Byte that does not name any kind.
	Invalid = 255,
}

impl Tag {
	/// Classify a raw byte; unknown bytes map to [`Tag::Invalid`].
	pub fn from_byte(byte: u8) -> Self {
		match byte {
			0 => Self::False,
			1 => Self::True,
			2 => Self::Int,
			3 => Self::Float,
			4 => Self::Symbol,
			5 => Self::Hash,
			6 => Self::Array,
			7 => Self::String,
			8 => Self::Undef,
			9 => Self::Nil,
			69 => Self::Eod,
			127 => Self::AdvByte1,
			128 => Self::AdvByte2,
			129 => Self::AdvByte3,
			130 => Self::AdvByte4,
			131 => Self::AdvByte5,
			132 => Self::AdvByte6,
			133 => Self::AdvByte7,
			134 => Self::AdvByte8,
			_ => Self::Invalid,
		}
	}

	/// Raw byte value.
	pub fn as_byte(self) -> u8 {
		self as u8
	}

	/// Variable-width integer tag for `width` bytes (1..=8).
	pub fn adv_byte(width: usize) -> Option<Self> {
		match width {
			1..=8 => Some(Self::from_byte(Self::AdvByte1.as_byte() + (width as u8 - 1))),
			_ => None,
		}
	}

	/// Byte width carried by an `AdvByte*` tag.
	pub fn adv_width(self) -> Option<usize> {
		let byte = self.as_byte();
		if (Self::AdvByte1.as_byte()..=Self::AdvByte8.as_byte()).contains(&byte) {
			Some(usize::from(byte - Self::AdvByte1.as_byte()) + 1)
		} else {
			None
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::False => "false",
			Self::True => "true",
			Self::Int => "int",
			Self::Float => "float",
			Self::Symbol => "symbol",
			Self::Hash => "hash",
			Self::Array => "array",
			Self::String => "string",
			Self::Undef => "undef",
			Self::Nil => "nil",
			Self::Eod => "eod",
			Self::AdvByte1
			| Self::AdvByte2
			| Self::AdvByte3
			| Self::AdvByte4
			| Self::AdvByte5
			| Self::AdvByte6
			| Self::AdvByte7
			| Self::AdvByte8 => "adv_int",
			Self::Invalid => "invalid",
		}
	}
}
