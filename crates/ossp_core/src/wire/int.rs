/// Smallest big-endian two's-complement width (1..=8) that holds `value`
/// together with its sign bit.
pub fn min_width(value: i64) -> usize {
	let magnitude = (if value < 0 { !value } else { value }) as u64;
	let bits = 64 - magnitude.leading_zeros() as usize + 1;
	bits.div_ceil(8).max(1)
}

/// Low `width` bytes of `value`, most significant first.
pub fn to_be_trimmed(value: i64, width: usize) -> [u8; 8] {
	let full = value.to_be_bytes();
	let mut out = [0_u8; 8];
	out[..width].copy_from_slice(&full[8 - width..]);
	out
}

/// Sign-extend big-endian `bytes` (1..=8 of them) into an `i64`.
pub fn from_be_sign_extended(bytes: &[u8]) -> i64 {
	let negative = bytes.first().is_some_and(|byte| byte & 0x80 != 0);
	let mut full = if negative { [0xFF_u8; 8] } else { [0_u8; 8] };
	full[8 - bytes.len()..].copy_from_slice(bytes);
	i64::from_be_bytes(full)
}
