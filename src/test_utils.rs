//! Test utilities: ready-made models, request constructors, and response
//! assertions used by the crate's own tests and available to downstream
//! test suites.

use bytes::Bytes;
use hyper::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::model::{MemoryQueryset, Model, Queryset};
use crate::request::Request;
use crate::response::Response;

/// Test model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Widget {
	pub id: Option<i64>,
	pub name: String,
	#[serde(default)]
	pub quantity: i64,
}

impl Widget {
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			quantity: 1,
		}
	}
}

impl Model for Widget {
	type PrimaryKey = i64;

	fn table_name() -> &'static str {
		"widgets"
	}

	fn primary_key(&self) -> Option<&Self::PrimaryKey> {
		self.id.as_ref()
	}

	fn set_primary_key(&mut self, value: Self::PrimaryKey) {
		self.id = Some(value);
	}
}

/// Second test model, for multi-model scenarios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
	pub id: Option<i64>,
	pub title: String,
	#[serde(default)]
	pub body: String,
}

impl Model for Article {
	type PrimaryKey = i64;

	fn table_name() -> &'static str {
		"articles"
	}

	fn primary_key(&self) -> Option<&Self::PrimaryKey> {
		self.id.as_ref()
	}

	fn set_primary_key(&mut self, value: Self::PrimaryKey) {
		self.id = Some(value);
	}
}

/// A queryset pre-seeded with one widget per name, primary keys assigned in
/// order starting at 1.
pub async fn widget_queryset(names: &[&str]) -> MemoryQueryset<Widget> {
	let queryset = MemoryQueryset::new();
	for name in names {
		queryset
			.insert(Widget::named(*name))
			.await
			.expect("memory insert cannot fail");
	}
	queryset
}

/// Create a bodyless test request.
pub fn create_request(method: Method, path: &str) -> Request {
	Request::builder()
		.method(method)
		.uri(path)
		.build()
		.expect("static test uri must parse")
}

/// Create a test request with path parameters.
pub fn create_request_with_path_params(
	method: Method,
	path: &str,
	path_params: &[(&str, &str)],
) -> Request {
	let mut builder = Request::builder().method(method).uri(path);
	for (key, value) in path_params {
		builder = builder.path_param(*key, *value);
	}
	builder.build().expect("static test uri must parse")
}

/// Create a test request with a JSON body and content type.
pub fn create_json_request(method: Method, path: &str, json_data: &serde_json::Value) -> Request {
	let mut headers = HeaderMap::new();
	headers.insert(
		hyper::header::CONTENT_TYPE,
		hyper::header::HeaderValue::from_static("application/json"),
	);
	Request::builder()
		.method(method)
		.uri(path)
		.headers(headers)
		.body(Bytes::from(
			serde_json::to_vec(json_data).expect("test json must serialize"),
		))
		.build()
		.expect("static test uri must parse")
}

/// Assert the response status code.
pub fn assert_response_status(response: &Response, expected: StatusCode) {
	assert_eq!(
		response.status, expected,
		"expected status {:?}, got {:?}",
		expected, response.status
	);
}

/// Assert the response is JSON and contains `expected_value` at `key`.
pub fn assert_json_response_contains(
	response: &Response,
	key: &str,
	expected_value: &serde_json::Value,
) {
	let json: serde_json::Value = response
		.json()
		.expect("response body should be valid JSON");
	assert_eq!(
		json.get(key),
		Some(expected_value),
		"expected key '{}' to be {:?} in {}",
		key,
		expected_value,
		json
	);
}
