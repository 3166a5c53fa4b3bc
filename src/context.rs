use serde::Serialize;
use serde_json::{Map, Value};

/// Render context passed to a [`Renderer`](crate::Renderer).
///
/// A string-keyed JSON map; views seed it with `object` / `object_list` and
/// merge resolved extra-context configuration on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
	#[serde(flatten)]
	entries: Map<String, Value>,
}

impl Context {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: Value) {
		self.entries.insert(key.into(), value);
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.entries.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Merge `other` into self; keys in `other` win.
	pub fn merge(&mut self, other: Context) {
		self.entries.extend(other.entries);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.entries)
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.entries
	}
}

impl From<Context> for Value {
	fn from(context: Context) -> Self {
		context.into_value()
	}
}

impl FromIterator<(String, Value)> for Context {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}
