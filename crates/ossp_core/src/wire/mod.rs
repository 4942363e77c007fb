mod buffer;
mod bytes;
mod compression;
mod decode;
mod encode;
mod error;
mod file;
mod header;
mod int;
mod tag;
mod value;

/// Growable byte buffer and its first-write reservation size.
pub use buffer::{ByteBuffer, INITIAL_CAPACITY};
/// Fixed-width big-endian scalars accepted by buffer reads and writes.
pub use bytes::Scalar;
/// Envelope decoding entry points and options.
pub use decode::{DecodeOptions, Deserialized, deserialize, deserialize_slice, deserialize_with};
/// Envelope encoding entry points, options, and limits.
pub use encode::{DEFAULT_MAX_DEPTH, EncodeOptions, MAX_COUNT, serialize, serialize_with};
/// Error and result aliases.
pub use error::{Result, WireError};
/// Envelope header layout and trailer markers.
pub use header::{EOD_MARKER, EOF_MARKER, EnvelopeHeader, FLAG_VARIABLE_INTS, IntEncoding, MAGIC};
/// One-byte type tags.
pub use tag::Tag;
/// Dynamic value model.
pub use value::{Map, Value, get_type};
