use async_trait::async_trait;
use std::sync::Arc;

use crate::exception::Result;
use crate::request::Request;
use crate::response::Response;

/// Handler trait for processing requests.
///
/// This is the invocation contract every generated view satisfies: a handler
/// is constructed once at startup, holds no per-request state, and is
/// dispatched by HTTP method from within `handle`.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation for `Arc<T>` where T: Handler, so `Arc<dyn Handler>`
/// can itself be used as a Handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}
