use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use tracing::{debug, trace};

use crate::wire::bytes::Scalar;
use crate::wire::compression::{compress_frame, decompress_frame};
use crate::wire::{Result, WireError};

/// Capacity reserved by the first write into an empty buffer.
pub const INITIAL_CAPACITY: usize = 1024 * 1024;

enum Storage<'a> {
	Owned(Vec<u8>),
	Borrowed(&'a [u8]),
}

/// Growable byte region with independent append and read cursors.
///
/// Owned buffers grow on append; buffers built with [`ByteBuffer::borrowed`]
/// or [`ByteBuffer::copied`] are read-only and reject every write.
pub struct ByteBuffer<'a> {
	storage: Storage<'a>,
	current_pos: usize,
	read_pos: usize,
	read_only: bool,
}

impl ByteBuffer<'static> {
	/// Create an empty, writable, owning buffer without allocating.
	pub fn new() -> Self {
		Self::owned(Vec::new(), false)
	}

	/// Create an empty, writable buffer with `capacity` bytes reserved.
	pub fn with_capacity(capacity: usize) -> Self {
		Self::owned(Vec::with_capacity(capacity), false)
	}

	/// Copy `bytes` into an independent, read-only allocation.
	pub fn copied(bytes: &[u8]) -> Self {
		Self::owned(bytes.to_vec(), true)
	}

	fn owned(bytes: Vec<u8>, read_only: bool) -> Self {
		let current_pos = bytes.len();
		Self {
			storage: Storage::Owned(bytes),
			current_pos,
			read_pos: 0,
			read_only,
		}
	}
}

impl<'a> ByteBuffer<'a> {
	/// Wrap external memory without copying. The buffer is read-only.
	pub fn borrowed(bytes: &'a [u8]) -> Self {
		Self {
			storage: Storage::Borrowed(bytes),
			current_pos: 0,
			read_pos: 0,
			read_only: true,
		}
	}

	/// Logical content.
	pub fn data(&self) -> &[u8] {
		match &self.storage {
			Storage::Owned(bytes) => bytes,
			Storage::Borrowed(bytes) => bytes,
		}
	}

	/// Mutable logical content, or `None` for read-only buffers.
	pub fn data_mut(&mut self) -> Option<&mut [u8]> {
		if self.read_only {
			return None;
		}
		match &mut self.storage {
			Storage::Owned(bytes) => Some(bytes.as_mut_slice()),
			Storage::Borrowed(_) => None,
		}
	}

	/// View from absolute `position` to the logical end, `None` past the end.
	pub fn data_at(&self, position: usize) -> Option<&[u8]> {
		let data = self.data();
		if position >= data.len() {
			return None;
		}
		Some(&data[position..])
	}

	/// Number of logically written bytes.
	pub fn size(&self) -> usize {
		self.data().len()
	}

	/// Allocated bytes backing the buffer.
	pub fn capacity(&self) -> usize {
		match &self.storage {
			Storage::Owned(bytes) => bytes.capacity(),
			Storage::Borrowed(bytes) => bytes.len(),
		}
	}

	/// Bytes appended through this buffer's write cursor.
	pub fn current_pos(&self) -> usize {
		self.current_pos
	}

	/// Offset of the next byte [`ByteBuffer::read_exact`] will return.
	pub fn read_pos(&self) -> usize {
		self.read_pos
	}

	/// Unread bytes after the read cursor.
	pub fn remaining(&self) -> usize {
		self.size().saturating_sub(self.read_pos)
	}

	/// Whether writes are rejected.
	pub fn is_read_only(&self) -> bool {
		self.read_only
	}

	/// Whether the buffer holds no logical bytes.
	pub fn is_empty(&self) -> bool {
		self.size() == 0
	}

	/// Append raw bytes at the logical end, growing storage when needed.
	pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
		let storage = self.reserve(bytes.len())?;
		storage.extend_from_slice(bytes);
		self.current_pos += bytes.len();
		Ok(())
	}

	/// Append one scalar in big-endian byte order.
	pub fn append_scalar<T: Scalar>(&mut self, value: T) -> Result<()> {
		value.with_be_bytes(|bytes| self.append(bytes))
	}

	/// Overwrite already-written bytes starting at `position`. Never grows.
	pub fn set_at(&mut self, position: usize, bytes: &[u8]) -> Result<()> {
		if self.read_only {
			return Err(WireError::ReadOnly);
		}

		let size = self.size();
		let end = position.checked_add(bytes.len()).filter(|end| *end <= size).ok_or(WireError::PatchOutOfRange {
			at: position,
			len: bytes.len(),
			size,
		})?;

		let data = self.data_mut().ok_or(WireError::ReadOnly)?;
		data[position..end].copy_from_slice(bytes);
		Ok(())
	}

	/// Overwrite one big-endian scalar at `position`.
	pub fn set_scalar_at<T: Scalar>(&mut self, position: usize, value: T) -> Result<()> {
		value.with_be_bytes(|bytes| self.set_at(position, bytes))
	}

	/// Read exactly `n` bytes and advance the read cursor.
	///
	/// The cursor is left untouched when fewer than `n` bytes remain.
	pub fn read_exact(&mut self, n: usize) -> Result<&[u8]> {
		if n > self.remaining() {
			return Err(WireError::UnexpectedEof {
				at: self.read_pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.read_pos;
		self.read_pos += n;
		Ok(&self.data()[start..self.read_pos])
	}

	/// Fill `out` from the read cursor.
	pub fn read_into(&mut self, out: &mut [u8]) -> Result<()> {
		let bytes = self.read_exact(out.len())?;
		out.copy_from_slice(bytes);
		Ok(())
	}

	/// Read one big-endian scalar.
	pub fn read<T: Scalar>(&mut self) -> Result<T> {
		self.read_exact(T::WIDTH).map(T::from_be_slice)
	}

	/// Move the read cursor to an absolute offset no greater than the size.
	pub fn seek_read(&mut self, position: usize) -> Result<()> {
		let size = self.size();
		if position > size {
			return Err(WireError::UnexpectedEof {
				at: size,
				need: position - size,
				rem: 0,
			});
		}
		self.read_pos = position;
		Ok(())
	}

	/// Drop logical bytes past `len`. Capacity is kept.
	pub fn truncate(&mut self, len: usize) -> Result<()> {
		if self.read_only {
			return Err(WireError::ReadOnly);
		}
		let Storage::Owned(bytes) = &mut self.storage else {
			return Err(WireError::ReadOnly);
		};

		bytes.truncate(len);
		let size = bytes.len();
		self.current_pos = self.current_pos.min(size);
		self.read_pos = self.read_pos.min(size);
		Ok(())
	}

	/// Move the read cursor back to the start.
	pub fn rewind(&mut self) {
		self.read_pos = 0;
	}

	/// Replace the contents with `[original size][zstd frame]`.
	pub fn compress(&mut self) -> Result<()> {
		let before = self.size();
		let frame = compress_frame(self.data())?;
		debug!(before, after = frame.len(), "compressed buffer");
		self.replace_storage(frame);
		Ok(())
	}

	/// Reverse [`ByteBuffer::compress`]. The buffer is unchanged on failure.
	pub fn uncompress(&mut self) -> Result<()> {
		let before = self.size();
		let bytes = decompress_frame(self.data())?;
		debug!(before, after = bytes.len(), "uncompressed buffer");
		self.replace_storage(bytes);
		Ok(())
	}

	/// 64-bit FxHash over the logical bytes.
	///
	/// Deterministic for a given `rustc-hash` release and pointer width. Compare
	/// hashes produced by the same build; do not store them as a file checksum.
	pub fn hash(&self) -> u64 {
		let mut hasher = FxHasher::default();
		hasher.write(self.data());
		hasher.finish()
	}

	/// Consume the buffer, returning its logical bytes.
	pub fn into_vec(self) -> Vec<u8> {
		match self.storage {
			Storage::Owned(bytes) => bytes,
			Storage::Borrowed(bytes) => bytes.to_vec(),
		}
	}

	fn reserve(&mut self, additional: usize) -> Result<&mut Vec<u8>> {
		if self.read_only {
			return Err(WireError::ReadOnly);
		}
		let Storage::Owned(bytes) = &mut self.storage else {
			return Err(WireError::ReadOnly);
		};

		let required = bytes.len().checked_add(additional).ok_or(WireError::AllocationFailed { requested: usize::MAX })?;
		if required <= bytes.capacity() {
			return Ok(bytes);
		}

		let old_capacity = bytes.capacity();
		let target = if old_capacity == 0 {
			INITIAL_CAPACITY.max(additional)
		} else {
			old_capacity.saturating_mul(2).saturating_add(additional)
		};
		bytes
			.try_reserve_exact(target - bytes.len())
			.map_err(|_| WireError::AllocationFailed { requested: target })?;
		trace!(old_capacity, new_capacity = bytes.capacity(), "grew buffer");
		Ok(bytes)
	}

	fn replace_storage(&mut self, bytes: Vec<u8>) {
		self.current_pos = bytes.len();
		self.read_pos = 0;
		self.storage = Storage::Owned(bytes);
	}
}

impl Default for ByteBuffer<'_> {
	fn default() -> Self {
		Self {
			storage: Storage::Owned(Vec::new()),
			current_pos: 0,
			read_pos: 0,
			read_only: false,
		}
	}
}

impl Clone for ByteBuffer<'_> {
	/// Deep copy into a fresh, writable, owning buffer. The read cursor restarts at 0.
	fn clone(&self) -> Self {
		ByteBuffer::owned(self.data().to_vec(), false)
	}
}

impl From<Vec<u8>> for ByteBuffer<'static> {
	fn from(bytes: Vec<u8>) -> Self {
		Self::owned(bytes, false)
	}
}

impl fmt::Debug for ByteBuffer<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ByteBuffer")
			.field("size", &self.size())
			.field("capacity", &self.capacity())
			.field("current_pos", &self.current_pos)
			.field("read_pos", &self.read_pos)
			.field("read_only", &self.read_only)
			.field("borrowed", &matches!(self.storage, Storage::Borrowed(_)))
			.finish()
	}
}
