//! The form-handling seam used by the create and update views.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::Context;
use crate::exception::{Error, Result};
use crate::model::Model;
use crate::request::Request;

/// Binds request data into a model instance.
///
/// `kwargs` carries the factory's `extra_form_kwargs` configuration, already
/// resolved against the current request. What the kwargs mean is up to the
/// implementation; [`JsonForm`] treats them as server-side field overrides.
pub trait Form<M: Model>: Send + Sync {
	/// Bind a new instance from the request.
	fn bind(&self, request: &Request, kwargs: &Context) -> Result<M>;

	/// Bind against an existing instance (update): request data is applied
	/// on top of the stored record so partial payloads keep remaining
	/// fields, including the primary key.
	fn bind_instance(&self, request: &Request, instance: &M, kwargs: &Context) -> Result<M>;
}

/// Default form: the request body is a JSON object, resolved kwargs are
/// merged over it, and the result deserializes into the model.
///
/// Kwargs winning over the payload is deliberate: they exist to inject
/// values the client must not control (e.g. the authenticated user's id).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonForm;

impl JsonForm {
	pub fn new() -> Self {
		Self
	}

	fn payload(&self, request: &Request) -> Result<serde_json::Map<String, Value>> {
		if request.body.is_empty() {
			return Ok(serde_json::Map::new());
		}
		match request.json::<Value>()? {
			Value::Object(map) => Ok(map),
			other => Err(Error::Validation(format!(
				"expected a JSON object body, got {}",
				json_kind(&other)
			))),
		}
	}
}

impl<M> Form<M> for JsonForm
where
	M: Model + Serialize + DeserializeOwned,
{
	fn bind(&self, request: &Request, kwargs: &Context) -> Result<M> {
		let mut payload = self.payload(request)?;
		apply_kwargs(&mut payload, kwargs);
		serde_json::from_value(Value::Object(payload)).map_err(Error::from)
	}

	fn bind_instance(&self, request: &Request, instance: &M, kwargs: &Context) -> Result<M> {
		let mut base = match serde_json::to_value(instance)? {
			Value::Object(map) => map,
			other => {
				return Err(Error::Validation(format!(
					"model must serialize to a JSON object, got {}",
					json_kind(&other)
				)));
			}
		};
		for (key, value) in self.payload(request)? {
			base.insert(key, value);
		}
		apply_kwargs(&mut base, kwargs);
		serde_json::from_value(Value::Object(base)).map_err(Error::from)
	}
}

fn apply_kwargs(payload: &mut serde_json::Map<String, Value>, kwargs: &Context) {
	payload.extend(kwargs.clone().into_map());
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
