//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

use ossp::wire::{Map, Value};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Fresh file path under `<target>/ossp-scratch`, unique per process.
///
/// The directory is created; the file is not.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("ossp-scratch");
	std::fs::create_dir_all(&dir).unwrap_or_else(|err| panic!("create {}: {err}", dir.display()));
	dir.join(format!("{}-{name}", std::process::id()))
}

/// Build a [`Value`] tree from JSON text.
///
/// Panics on malformed JSON; intended for literal test inputs.
pub fn value_from_json_str(text: &str) -> Value {
	let json: serde_json::Value = serde_json::from_str(text).unwrap_or_else(|err| panic!("invalid json {text:?}: {err}"));
	value_from_json(&json)
}

/// Convert parsed JSON into a [`Value`] tree.
///
/// `null` becomes nil, whole numbers become integers, other numbers floats,
/// and object keys become string keys in sorted order.
pub fn value_from_json(json: &serde_json::Value) -> Value {
	match json {
		serde_json::Value::Null => Value::Nil,
		serde_json::Value::Bool(flag) => Value::Bool(*flag),
		serde_json::Value::Number(number) => match number.as_i64() {
			Some(int) => Value::Int(int),
			None => Value::Float(number.as_f64().unwrap_or(f64::NAN)),
		},
		serde_json::Value::String(text) => Value::string(text.as_str()),
		serde_json::Value::Array(items) => Value::Array(items.iter().map(value_from_json).collect()),
		serde_json::Value::Object(fields) => {
			let mut map = Map::with_capacity(fields.len());
			for (key, field) in fields {
				map.set(Value::string(key.as_str()), value_from_json(field));
			}
			Value::Map(map)
		}
	}
}
