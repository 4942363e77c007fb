use std::fs;
use std::path::Path;

use tracing::debug;

use crate::wire::{ByteBuffer, Result};

impl ByteBuffer<'_> {
	/// Write the logical bytes to `path`, replacing any existing file.
	pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		fs::write(path, self.data())?;
		debug!(path = %path.display(), size = self.size(), "wrote buffer");
		Ok(())
	}
}

impl ByteBuffer<'static> {
	/// Read a whole file into a writable, owning buffer.
	///
	/// The write cursor sits at the end, so further appends extend the file image.
	pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path)?;
		debug!(path = %path.display(), size = bytes.len(), "read buffer");
		Ok(Self::from(bytes))
	}
}
