use async_trait::async_trait;
use hyper::Method;
use serde::Serialize;
use std::sync::Arc;

use super::{Operation, default_template, lookup_param, method_not_allowed};
use crate::config::ConfigMap;
use crate::context::Context;
use crate::exception::Result;
use crate::handler::Handler;
use crate::model::{Model, Queryset};
use crate::render::Renderer;
use crate::request::Request;
use crate::response::Response;

/// View that removes an existing record.
///
/// GET/HEAD renders a confirmation context for the record; POST or DELETE
/// removes it and answers 204.
pub struct DeleteView<M> {
	queryset: Arc<dyn Queryset<M>>,
	renderer: Arc<dyn Renderer>,
	template_name: Option<String>,
	lookup_field: String,
	extra_context: ConfigMap,
}

impl<M> DeleteView<M>
where
	M: Model + Serialize + Send + Sync + 'static,
{
	pub fn new(queryset: Arc<dyn Queryset<M>>, renderer: Arc<dyn Renderer>) -> Self {
		Self {
			queryset,
			renderer,
			template_name: None,
			lookup_field: "pk".to_string(),
			extra_context: ConfigMap::new(),
		}
	}

	/// Override the template name (default `<table>_delete.html`).
	pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
		self.template_name = Some(template_name.into());
		self
	}

	pub fn with_lookup_field(mut self, field: impl Into<String>) -> Self {
		self.lookup_field = field.into();
		self
	}

	pub fn with_extra_context(mut self, extra_context: ConfigMap) -> Self {
		self.extra_context = extra_context;
		self
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| default_template::<M>(Operation::Delete))
	}
}

#[async_trait]
impl<M> Handler for DeleteView<M>
where
	M: Model + Serialize + Send + Sync + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let lookup = lookup_param(&request, &self.lookup_field)?;
				let object = self.queryset.get(lookup).await?;
				let mut context = Context::new();
				context.insert("object", serde_json::to_value(&object)?);
				context.merge(self.extra_context.resolve(&request)?);
				self.renderer.render(&self.template_name(), &context)
			}
			Method::POST | Method::DELETE => {
				let lookup = lookup_param(&request, &self.lookup_field)?;
				self.queryset.delete(lookup).await?;
				Ok(Response::no_content())
			}
			_ => Err(method_not_allowed()),
		}
	}
}
