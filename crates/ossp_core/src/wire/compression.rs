use std::io::Read;

use crate::wire::{Result, WireError};

/// zstd level used for whole-buffer compression.
const COMPRESSION_LEVEL: i32 = 3;
/// Width of the big-endian original-size prefix.
const SIZE_PREFIX_LEN: usize = 4;

/// Compress `raw` into `[u32 BE original size][zstd frame]`.
pub fn compress_frame(raw: &[u8]) -> Result<Vec<u8>> {
	let original = u32::try_from(raw.len()).map_err(|_| WireError::PayloadTooLarge { at: raw.len() })?;
	let compressed = zstd::bulk::compress(raw, COMPRESSION_LEVEL).map_err(WireError::Compression)?;

	let mut out = Vec::new();
	out.try_reserve_exact(SIZE_PREFIX_LEN + compressed.len())
		.map_err(|_| WireError::AllocationFailed {
			requested: SIZE_PREFIX_LEN + compressed.len(),
		})?;
	out.extend_from_slice(&original.to_be_bytes());
	out.extend_from_slice(&compressed);
	Ok(out)
}

/// Decode a frame produced by [`compress_frame`].
///
/// Output grows with the bytes zstd actually yields, so a corrupted size
/// prefix cannot force a large allocation up front.
pub fn decompress_frame(frame: &[u8]) -> Result<Vec<u8>> {
	let Some((prefix, body)) = frame.split_first_chunk::<SIZE_PREFIX_LEN>() else {
		return Err(WireError::CompressedTooShort { size: frame.len() });
	};

	let expected = u32::from_be_bytes(*prefix) as usize;
	let mut decoder = zstd::stream::read::Decoder::new(body).map_err(WireError::Compression)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf).map_err(WireError::Compression)?;
		if read == 0 {
			break;
		}

		if out.len() + read > expected {
			return Err(WireError::DecompressedSizeMismatch {
				expected,
				got: out.len() + read,
			});
		}

		out.extend_from_slice(&buf[..read]);
	}

	if out.len() != expected {
		return Err(WireError::DecompressedSizeMismatch { expected, got: out.len() });
	}
	out.shrink_to_fit();
	Ok(out)
}
