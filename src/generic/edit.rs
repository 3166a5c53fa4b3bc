//! Form-backed views: create and update.
//!
//! Both share the same shape: GET renders the form context through the
//! configured renderer, a write verb binds the form (with the extra form
//! kwargs resolved against the current request) and persists the result.

use async_trait::async_trait;
use hyper::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::{Operation, default_template, lookup_param, method_not_allowed};
use crate::config::ConfigMap;
use crate::context::Context;
use crate::exception::Result;
use crate::forms::Form;
use crate::handler::Handler;
use crate::model::{Model, Queryset};
use crate::render::Renderer;
use crate::request::Request;
use crate::response::Response;

/// View that instantiates a new record through a form.
///
/// GET/HEAD renders the empty form context (`object: null`); POST binds and
/// inserts, answering 201 with the stored record.
pub struct CreateView<M> {
	queryset: Arc<dyn Queryset<M>>,
	renderer: Arc<dyn Renderer>,
	form: Arc<dyn Form<M>>,
	template_name: Option<String>,
	extra_form_kwargs: ConfigMap,
	extra_context: ConfigMap,
}

/// View that edits an existing record through a form.
///
/// GET/HEAD renders the bound form context; POST/PUT/PATCH binds the payload
/// over the stored record and updates it.
pub struct UpdateView<M> {
	queryset: Arc<dyn Queryset<M>>,
	renderer: Arc<dyn Renderer>,
	form: Arc<dyn Form<M>>,
	template_name: Option<String>,
	lookup_field: String,
	extra_form_kwargs: ConfigMap,
	extra_context: ConfigMap,
}

impl<M> CreateView<M>
where
	M: Model + Serialize + DeserializeOwned + Send + Sync + 'static,
{
	pub fn new(
		queryset: Arc<dyn Queryset<M>>,
		renderer: Arc<dyn Renderer>,
		form: Arc<dyn Form<M>>,
	) -> Self {
		Self {
			queryset,
			renderer,
			form,
			template_name: None,
			extra_form_kwargs: ConfigMap::new(),
			extra_context: ConfigMap::new(),
		}
	}

	/// Override the template name (default `<table>_create.html`).
	pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
		self.template_name = Some(template_name.into());
		self
	}

	pub fn with_extra_form_kwargs(mut self, extra_form_kwargs: ConfigMap) -> Self {
		self.extra_form_kwargs = extra_form_kwargs;
		self
	}

	pub fn with_extra_context(mut self, extra_context: ConfigMap) -> Self {
		self.extra_context = extra_context;
		self
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| default_template::<M>(Operation::Create))
	}
}

#[async_trait]
impl<M> Handler for CreateView<M>
where
	M: Model + Serialize + DeserializeOwned + Send + Sync + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let mut context = Context::new();
				context.insert("object", Value::Null);
				context.merge(self.extra_context.resolve(&request)?);
				self.renderer.render(&self.template_name(), &context)
			}
			Method::POST => {
				let kwargs = self.extra_form_kwargs.resolve(&request)?;
				let record = self.form.bind(&request, &kwargs)?;
				let stored = self.queryset.insert(record).await?;
				Response::created().with_json(&stored)
			}
			_ => Err(method_not_allowed()),
		}
	}
}

impl<M> UpdateView<M>
where
	M: Model + Serialize + DeserializeOwned + Send + Sync + 'static,
{
	pub fn new(
		queryset: Arc<dyn Queryset<M>>,
		renderer: Arc<dyn Renderer>,
		form: Arc<dyn Form<M>>,
	) -> Self {
		Self {
			queryset,
			renderer,
			form,
			template_name: None,
			lookup_field: "pk".to_string(),
			extra_form_kwargs: ConfigMap::new(),
			extra_context: ConfigMap::new(),
		}
	}

	/// Override the template name (default `<table>_update.html`).
	pub fn with_template(mut self, template_name: impl Into<String>) -> Self {
		self.template_name = Some(template_name.into());
		self
	}

	pub fn with_lookup_field(mut self, field: impl Into<String>) -> Self {
		self.lookup_field = field.into();
		self
	}

	pub fn with_extra_form_kwargs(mut self, extra_form_kwargs: ConfigMap) -> Self {
		self.extra_form_kwargs = extra_form_kwargs;
		self
	}

	pub fn with_extra_context(mut self, extra_context: ConfigMap) -> Self {
		self.extra_context = extra_context;
		self
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| default_template::<M>(Operation::Update))
	}
}

#[async_trait]
impl<M> Handler for UpdateView<M>
where
	M: Model + Serialize + DeserializeOwned + Send + Sync + 'static,
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
			Method::POST | Method::PUT | Method::PATCH => {
				let lookup = lookup_param(&request, &self.lookup_field)?;
				let existing = self.queryset.get(lookup).await?;
				let kwargs = self.extra_form_kwargs.resolve(&request)?;
				let record = self.form.bind_instance(&request, &existing, &kwargs)?;
				let stored = self.queryset.update(record).await?;
				Response::ok().with_json(&stored)
			}
			_ => Err(method_not_allowed()),
		}
	}
}
