use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;

use crate::exception::{Error, Result};

/// HTTP request representation handed to view handlers.
///
/// Query parameters are parsed from the URI once at construction time; path
/// parameters are filled in by whatever routing layer dispatched the request
/// (e.g. `{"pk": "42"}` for `widget/42/`).
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub query_params: HashMap<String, String>,
	pub path_params: HashMap<String, String>,
}

impl Request {
	/// Create a new request.
	///
	/// # Examples
	///
	/// ```
	/// use bytes::Bytes;
	/// use hyper::{HeaderMap, Method, Version};
	/// use model_views::Request;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     "/widgets/?page=2".parse().unwrap(),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/widgets/");
	/// assert_eq!(request.query_params.get("page").map(String::as_str), Some("2"));
	/// ```
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = parse_query(uri.query().unwrap_or(""));
		Self {
			method,
			uri,
			version,
			headers,
			body,
			query_params,
			path_params: HashMap::new(),
		}
	}

	/// Start building a request.
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// The request path, without the query string.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Deserialize the body as JSON.
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body).map_err(Error::from)
	}
}

/// Builder for [`Request`].
pub struct RequestBuilder {
	method: Method,
	uri: Option<std::result::Result<Uri, hyper::http::uri::InvalidUri>>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	path_params: HashMap<String, String>,
}

impl RequestBuilder {
	pub fn new() -> Self {
		Self {
			method: Method::GET,
			uri: None,
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			path_params: HashMap::new(),
		}
	}

	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl AsRef<str>) -> Self {
		self.uri = Some(uri.as_ref().parse());
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(key.into(), value.into());
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri = match self.uri {
			Some(Ok(uri)) => uri,
			Some(Err(err)) => return Err(Error::Http(format!("invalid request uri: {}", err))),
			None => return Err(Error::Http("request builder requires a uri".to_string())),
		};
		let mut request = Request::new(self.method, uri, self.version, self.headers, self.body);
		request.path_params = self.path_params;
		Ok(request)
	}
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn parse_query(query: &str) -> HashMap<String, String> {
	query
		.split('&')
		.filter(|pair| !pair.is_empty())
		.filter_map(|pair| {
			let mut parts = pair.splitn(2, '=');
			let key = parts.next()?;
			let value = parts.next().unwrap_or("");
			Some((key.to_string(), value.to_string()))
		})
		.collect()
}
