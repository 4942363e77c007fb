/// Fixed-width primitive stored big-endian in a [`ByteBuffer`](crate::wire::ByteBuffer).
pub trait Scalar: Copy {
	/// Encoded width in bytes.
	const WIDTH: usize;

	/// Decode from exactly [`Self::WIDTH`] big-endian bytes.
	fn from_be_slice(bytes: &[u8]) -> Self;

	/// Run `f` over the big-endian encoding of `self`.
	fn with_be_bytes<R>(self, f: impl FnOnce(&[u8]) -> R) -> R;
}

macro_rules! impl_scalar {
	($($ty:ty),* $(,)?) => {
		$(
			impl Scalar for $ty {
				const WIDTH: usize = std::mem::size_of::<$ty>();

				fn from_be_slice(bytes: &[u8]) -> Self {
					let mut buf = [0_u8; std::mem::size_of::<$ty>()];
					buf.copy_from_slice(bytes);
					<$ty>::from_be_bytes(buf)
				}

				fn with_be_bytes<R>(self, f: impl FnOnce(&[u8]) -> R) -> R {
					f(&self.to_be_bytes())
				}
			}
		)*
	};
}

impl_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
