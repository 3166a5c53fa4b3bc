//! Declarative configuration with lazy, request-bound values.
//!
//! A [`ConfigMap`] entry is a [`ConfigValue`]: a literal, a nested map, or a
//! computation deferred until a request is being handled. Resolution walks
//! the map recursively and replaces every deferred entry with the result of
//! invoking it against the current request, producing a plain [`Context`].
//!
//! Resolution never mutates the map and is performed once per handler
//! invocation; values may legitimately depend on per-request state, so
//! results are never cached across requests.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::exception::Result;
use crate::request::Request;

type ComputedFn = dyn Fn(&Request) -> Result<Value> + Send + Sync;

/// One configuration entry: static data, a request-bound computation, or a
/// nested bundle.
#[derive(Clone)]
pub enum ConfigValue {
	Literal(Value),
	Computed(Arc<ComputedFn>),
	Nested(ConfigMap),
}

impl ConfigValue {
	/// Wrap a deferred computation.
	pub fn computed(f: impl Fn(&Request) -> Result<Value> + Send + Sync + 'static) -> Self {
		Self::Computed(Arc::new(f))
	}

	fn resolve(&self, request: &Request) -> Result<Value> {
		match self {
			Self::Literal(value) => Ok(value.clone()),
			Self::Computed(f) => f(request),
			Self::Nested(map) => Ok(map.resolve(request)?.into_value()),
		}
	}
}

impl From<Value> for ConfigValue {
	fn from(value: Value) -> Self {
		Self::Literal(value)
	}
}

impl fmt::Debug for ConfigValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Computed(_) => f.write_str("Computed(..)"),
			Self::Nested(map) => f.debug_tuple("Nested").field(map).finish(),
		}
	}
}

/// Ordered bundle of configuration entries.
///
/// # Examples
///
/// ```
/// use model_views::{ConfigMap, ConfigValue, Request};
/// use serde_json::json;
///
/// let config = ConfigMap::new()
///     .with_value("site", json!("workshop"))
///     .with_computed("path", |request: &Request| Ok(json!(request.path())));
///
/// let request = Request::builder().uri("/widgets/").build().unwrap();
/// let resolved = config.resolve(&request).unwrap();
/// assert_eq!(resolved.get("site"), Some(&json!("workshop")));
/// assert_eq!(resolved.get("path"), Some(&json!("/widgets/")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigMap {
	entries: BTreeMap<String, ConfigValue>,
}

impl ConfigMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
		self.entries.insert(key.into(), value);
	}

	/// Builder form: add a literal entry.
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.insert(key, ConfigValue::Literal(value));
		self
	}

	/// Builder form: add a deferred entry.
	pub fn with_computed(
		mut self,
		key: impl Into<String>,
		f: impl Fn(&Request) -> Result<Value> + Send + Sync + 'static,
	) -> Self {
		self.insert(key, ConfigValue::computed(f));
		self
	}

	/// Builder form: add a nested bundle.
	pub fn with_nested(mut self, key: impl Into<String>, nested: ConfigMap) -> Self {
		self.insert(key, ConfigValue::Nested(nested));
		self
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Resolve every entry against `request` into a plain [`Context`].
	///
	/// Each deferred entry is invoked exactly once; nested bundles resolve
	/// recursively; the first computation error aborts and propagates
	/// unchanged. `self` is left untouched.
	pub fn resolve(&self, request: &Request) -> Result<Context> {
		let mut context = Context::new();
		for (key, value) in &self.entries {
			context.insert(key.clone(), value.resolve(request)?);
		}
		Ok(context)
	}
}
