use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::exception::Result;

/// HTTP response representation produced by view handlers.
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new response with the given status code.
	///
	/// # Examples
	///
	/// ```
	/// use hyper::StatusCode;
	/// use model_views::Response;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// HTTP 200 OK.
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// HTTP 201 Created.
	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	/// HTTP 204 No Content.
	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	/// HTTP 404 Not Found.
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Set the body from raw bytes or a string.
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Serialize `data` as the JSON body and set the content type.
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		self.body = Bytes::from(serde_json::to_vec(data)?);
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	/// Set an HTML body and content type.
	pub fn with_html(mut self, html: impl Into<String>) -> Self {
		self.body = Bytes::from(html.into());
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("text/html; charset=utf-8"),
		);
		self
	}

	/// Deserialize the body as JSON.
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body).map_err(crate::exception::Error::from)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_constructors() {
		assert_eq!(Response::ok().status, StatusCode::OK);
		assert_eq!(Response::created().status, StatusCode::CREATED);
		assert_eq!(Response::no_content().status, StatusCode::NO_CONTENT);
		assert_eq!(Response::not_found().status, StatusCode::NOT_FOUND);
	}

	// Results carrying a Response must be usable with unwrap_err/assert_eq
	// in tests, which needs Debug.
	#[test]
	fn test_response_is_debuggable() {
		let formatted = format!("{:?}", Response::ok());
		assert!(formatted.contains("200"));
	}

	#[test]
	fn test_with_json_sets_content_type() {
		let response = Response::ok()
			.with_json(&serde_json::json!({"ready": true}))
			.unwrap();
		let content_type = response.headers.get(hyper::header::CONTENT_TYPE).unwrap();
		assert_eq!(content_type, "application/json");
		let body: serde_json::Value = response.json().unwrap();
		assert_eq!(body["ready"], true);
	}
}
