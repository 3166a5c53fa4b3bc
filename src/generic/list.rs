use async_trait::async_trait;
use hyper::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::{Operation, default_template, method_not_allowed};
use crate::config::ConfigMap;
use crate::context::Context;
use crate::exception::Result;
use crate::handler::Handler;
use crate::model::{Model, Queryset};
use crate::render::Renderer;
use crate::request::Request;
use crate::response::Response;

/// Read-only view over every record in a queryset.
///
/// Renders a context with `object_list` plus the resolved general and
/// list-specific extra context (list-specific entries win). An optional
/// field selection projects each serialized record down to the named keys.
pub struct ListView<M> {
	queryset: Arc<dyn Queryset<M>>,
	renderer: Arc<dyn Renderer>,
	template_name: Option<String>,
	fields: Option<Vec<String>>,
	extra_context: ConfigMap,
	list_extra_context: ConfigMap,
}

impl<M> ListView<M>
where
	M: Model + Serialize + Send + Sync + 'static,
{
	pub fn new(queryset: Arc<dyn Queryset<M>>, renderer: Arc<dyn Renderer>) -> Self {
		Self {
			queryset,
			renderer,
			template_name: None,
			fields: None,
			extra_context: ConfigMap::new(),
			list_extra_context: ConfigMap::new(),
		}
	}

	/// Override the template name (default `<table>_list.html`).
	pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
		self.template_name = Some(template_name.into());
		self
	}

	/// Restrict serialized records to the named fields.
	pub fn with_fields(mut self, fields: Vec<String>) -> Self {
		self.fields = Some(fields);
		self
	}

	pub fn with_extra_context(mut self, extra_context: ConfigMap) -> Self {
		self.extra_context = extra_context;
		self
	}

	pub fn with_list_extra_context(mut self, list_extra_context: ConfigMap) -> Self {
		self.list_extra_context = list_extra_context;
		self
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| default_template::<M>(Operation::List))
	}

	fn serialize_objects(&self, objects: &[M]) -> Result<Vec<Value>> {
		objects
			.iter()
			.map(|object| {
				let mut value = serde_json::to_value(object)?;
				if let Some(fields) = &self.fields {
					value = project(value, fields);
				}
				Ok(value)
			})
			.collect()
	}
}

/// Keep only the named keys of an object value; non-objects pass through.
fn project(value: Value, fields: &[String]) -> Value {
	match value {
		Value::Object(mut map) => {
			map.retain(|key, _| fields.iter().any(|f| f == key));
			Value::Object(map)
		}
		other => other,
	}
}

#[async_trait]
impl<M> Handler for ListView<M>
where
	M: Model + Serialize + Send + Sync + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let objects = self.queryset.all().await?;
				let mut context = Context::new();
				context.insert("object_list", Value::Array(self.serialize_objects(&objects)?));
				context.merge(self.extra_context.resolve(&request)?);
				context.merge(self.list_extra_context.resolve(&request)?);
				self.renderer.render(&self.template_name(), &context)
			}
			_ => Err(method_not_allowed()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::render::JsonRenderer;
	use crate::test_utils::{Widget, create_request, widget_queryset};
	use serde_json::json;

	#[tokio::test]
	async fn test_list_returns_all_objects() {
		let queryset = widget_queryset(&["gear", "bolt"]).await;
		let view = ListView::<Widget>::new(Arc::new(queryset), Arc::new(JsonRenderer::new()));
		let response = view
			.handle(create_request(Method::GET, "/widgets/"))
			.await
			.unwrap();
		let body: serde_json::Value = response.json().unwrap();
		assert_eq!(body["object_list"].as_array().unwrap().len(), 2);
		assert_eq!(body["object_list"][0]["name"], "gear");
	}

	#[tokio::test]
	async fn test_field_selection_projects_records() {
		let queryset = widget_queryset(&["gear"]).await;
		let view = ListView::<Widget>::new(Arc::new(queryset), Arc::new(JsonRenderer::new()))
			.with_fields(vec!["name".to_string()]);
		let response = view
			.handle(create_request(Method::GET, "/widgets/"))
			.await
			.unwrap();
		let body: serde_json::Value = response.json().unwrap();
		assert_eq!(body["object_list"][0], json!({"name": "gear"}));
	}

	#[tokio::test]
	async fn test_list_specific_context_wins_over_general() {
		let queryset = widget_queryset(&[]).await;
		let view = ListView::<Widget>::new(Arc::new(queryset), Arc::new(JsonRenderer::new()))
			.with_extra_context(
				ConfigMap::new()
					.with_value("shared", json!("general"))
					.with_value("tone", json!("general")),
			)
			.with_list_extra_context(ConfigMap::new().with_value("tone", json!("list-only")));
		let response = view
			.handle(create_request(Method::GET, "/widgets/"))
			.await
			.unwrap();
		let body: serde_json::Value = response.json().unwrap();
		assert_eq!(body["shared"], "general");
		assert_eq!(body["tone"], "list-only");
	}

	#[tokio::test]
	async fn test_post_not_allowed() {
		let queryset = widget_queryset(&[]).await;
		let view = ListView::<Widget>::new(Arc::new(queryset), Arc::new(JsonRenderer::new()));
		assert!(
			view.handle(create_request(Method::POST, "/widgets/"))
				.await
				.is_err()
		);
	}
}
