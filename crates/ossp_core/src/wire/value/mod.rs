use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap};
use rustc_hash::FxBuildHasher;

use crate::wire::Tag;

/// Dynamically-typed value tree carried by an OSSP envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absent value.
	Nil,
	/// Boolean.
	Bool(bool),
	/// Signed 64-bit integer.
	Int(i64),
	/// 64-bit float.
	Float(f64),
	/// Raw byte string; no encoding is assumed.
	String(Vec<u8>),
	/// Symbol name bytes.
	Symbol(Vec<u8>),
	/// Ordered elements.
	Array(Vec<Value>),
	/// Insertion-ordered entries.
	Map(Map),
	/// Host value with no encodable kind.
	Undef,
}

/// Classify a value into its wire tag.
pub fn get_type(value: &Value) -> Tag {
	value.tag()
}

impl Value {
	/// Nil constructor.
	pub fn nil() -> Self {
		Self::Nil
	}

	/// Boolean constructor.
	pub fn bool(flag: bool) -> Self {
		Self::Bool(flag)
	}

	/// Integer constructor.
	pub fn int(number: i64) -> Self {
		Self::Int(number)
	}

	/// Float constructor.
	pub fn float(number: f64) -> Self {
		Self::Float(number)
	}

	/// String from raw bytes.
	pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
		Self::String(bytes.into())
	}

	/// Symbol from its name bytes.
	pub fn symbol(name: impl Into<Vec<u8>>) -> Self {
		Self::Symbol(name.into())
	}

	/// Empty array with room for `capacity` elements.
	pub fn array(capacity: usize) -> Self {
		Self::Array(Vec::with_capacity(capacity))
	}

	/// Empty map with room for `capacity` entries.
	pub fn map(capacity: usize) -> Self {
		Self::Map(Map::with_capacity(capacity))
	}

	/// Wire tag for this value. Integers report the fixed [`Tag::Int`].
	pub fn tag(&self) -> Tag {
		match self {
			Self::Nil => Tag::Nil,
			Self::Bool(false) => Tag::False,
			Self::Bool(true) => Tag::True,
			Self::Int(_) => Tag::Int,
			Self::Float(_) => Tag::Float,
			Self::String(_) => Tag::String,
			Self::Symbol(_) => Tag::Symbol,
			Self::Array(_) => Tag::Array,
			Self::Map(_) => Tag::Hash,
			Self::Undef => Tag::Undef,
		}
	}

	/// Whether this value may be written as a map key.
	pub fn is_key_kind(&self) -> bool {
		matches!(self, Self::String(_) | Self::Symbol(_) | Self::Int(_) | Self::Float(_))
	}

	/// Append to an array; returns `false` for any other kind.
	pub fn push(&mut self, item: Value) -> bool {
		match self {
			Self::Array(items) => {
				items.push(item);
				true
			}
			_ => false,
		}
	}

	/// Insert into a map; returns `false` for any other kind.
	pub fn set(&mut self, key: Value, value: Value) -> bool {
		match self {
			Self::Map(map) => {
				map.set(key, value);
				true
			}
			_ => false,
		}
	}

	/// Integer payload.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	/// Float payload.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(value) => Some(*value),
			_ => None,
		}
	}

	/// String or symbol bytes.
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			Self::String(bytes) | Self::Symbol(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// String or symbol bytes as UTF-8, when valid.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|bytes| std::str::from_utf8(bytes).ok())
	}

	/// Array elements.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Map entries.
	pub fn as_map(&self) -> Option<&Map> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.as_bytes().to_vec())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value.into_bytes())
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::Array(items)
	}
}

impl From<Map> for Value {
	fn from(map: Map) -> Self {
		Self::Map(map)
	}
}

/// Insertion-ordered map with unique keys.
///
/// Keys are compared structurally with floats matched by bit pattern, so
/// `0.0` and `-0.0` are distinct keys and a NaN key finds itself.
#[derive(Debug, Clone, Default)]
pub struct Map {
	entries: IndexMap<MapKey, Value, FxBuildHasher>,
}

impl Map {
	/// Empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Empty map with room for `capacity` entries.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
		}
	}

	/// Insert or replace. A replaced key keeps its original position.
	pub fn set(&mut self, key: Value, value: Value) -> Option<Value> {
		self.entries.insert(MapKey(key), value)
	}

	/// Value stored under `key`.
	pub fn get(&self, key: &Value) -> Option<&Value> {
		self.entries.get(&KeyRef(key))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the map has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
		self.entries.iter().map(|(key, value)| (&key.0, value))
	}
}

impl PartialEq for Map {
	/// Same entries in the same order.
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().zip(other.iter()).all(|(left, right)| left == right)
	}
}

impl FromIterator<(Value, Value)> for Map {
	fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
		let iter = iter.into_iter();
		let mut map = Self::with_capacity(iter.size_hint().0);
		for (key, value) in iter {
			map.set(key, value);
		}
		map
	}
}

#[derive(Debug, Clone)]
struct MapKey(Value);

impl Hash for MapKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		hash_key(&self.0, state);
	}
}

impl PartialEq for MapKey {
	fn eq(&self, other: &Self) -> bool {
		key_eq(&self.0, &other.0)
	}
}

impl Eq for MapKey {}

/// Borrowed lookup form of [`MapKey`].
struct KeyRef<'a>(&'a Value);

impl Hash for KeyRef<'_> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		hash_key(self.0, state);
	}
}

impl Equivalent<MapKey> for KeyRef<'_> {
	fn equivalent(&self, key: &MapKey) -> bool {
		key_eq(self.0, &key.0)
	}
}

fn hash_key<H: Hasher>(value: &Value, state: &mut H) {
	std::mem::discriminant(value).hash(state);
	match value {
		Value::Nil | Value::Undef => {}
		Value::Bool(flag) => flag.hash(state),
		Value::Int(number) => number.hash(state),
		Value::Float(number) => number.to_bits().hash(state),
		Value::String(bytes) | Value::Symbol(bytes) => bytes.hash(state),
		Value::Array(items) => {
			items.len().hash(state);
			for item in items {
				hash_key(item, state);
			}
		}
		Value::Map(map) => {
			map.len().hash(state);
			for (key, item) in map.iter() {
				hash_key(key, state);
				hash_key(item, state);
			}
		}
	}
}

fn key_eq(left: &Value, right: &Value) -> bool {
	match (left, right) {
		(Value::Nil, Value::Nil) | (Value::Undef, Value::Undef) => true,
		(Value::Bool(a), Value::Bool(b)) => a == b,
		(Value::Int(a), Value::Int(b)) => a == b,
		(Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
		(Value::String(a), Value::String(b)) | (Value::Symbol(a), Value::Symbol(b)) => a == b,
		(Value::Array(a), Value::Array(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| key_eq(x, y)),
		(Value::Map(a), Value::Map(b)) => {
			a.len() == b.len() && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| key_eq(ka, kb) && key_eq(va, vb))
		}
		_ => false,
	}
}
