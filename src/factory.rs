//! The view factory: one model and one configuration bundle in, five
//! operation handlers out.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ConfigMap;
use crate::forms::{Form, JsonForm};
use crate::generic::{CreateView, DeleteView, DetailView, ListView, Operation, UpdateView};
use crate::handler::Handler;
use crate::model::{Model, Queryset};
use crate::render::{JsonRenderer, Renderer};

/// The product of a [`ViewFactory`]: one handler per [`Operation`].
///
/// Built once at startup and immutable in use; handlers share no mutable
/// state. Sets can also be assembled by hand when only some operations
/// exist for a model.
#[derive(Default)]
pub struct HandlerSet {
	handlers: BTreeMap<Operation, Arc<dyn Handler>>,
}

impl HandlerSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, operation: Operation, handler: Arc<dyn Handler>) {
		self.handlers.insert(operation, handler);
	}

	pub fn get(&self, operation: Operation) -> Option<&Arc<dyn Handler>> {
		self.handlers.get(&operation)
	}

	pub fn contains(&self, operation: Operation) -> bool {
		self.handlers.contains_key(&operation)
	}

	pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
		self.handlers.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

/// Builds the five generic CRUD handlers for a model.
///
/// Every option is optional; with none set the factory composes the default
/// seams (JSON form, JSON renderer, `pk` lookup) around the given record
/// source. Options that are configuration bundles are resolved per request
/// by the views themselves, never at build time.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use model_views::{MemoryQueryset, Operation, ViewFactory};
/// use model_views::test_utils::Widget;
///
/// let queryset = Arc::new(MemoryQueryset::<Widget>::new());
/// let views = ViewFactory::<Widget>::new(queryset).build();
/// assert_eq!(views.len(), 5);
/// assert!(views.contains(Operation::Create));
/// ```
pub struct ViewFactory<M> {
	queryset: Arc<dyn Queryset<M>>,
	renderer: Arc<dyn Renderer>,
	form: Arc<dyn Form<M>>,
	lookup_field: String,
	fields: Option<Vec<String>>,
	extra_context: ConfigMap,
	list_extra_context: ConfigMap,
	extra_form_kwargs: ConfigMap,
	templates: BTreeMap<Operation, String>,
	overrides: BTreeMap<Operation, Arc<dyn Handler>>,
}

impl<M> ViewFactory<M>
where
	M: Model + Serialize + DeserializeOwned + Send + Sync + 'static,
{
	pub fn new(queryset: Arc<dyn Queryset<M>>) -> Self {
		Self {
			queryset,
			renderer: Arc::new(JsonRenderer::new()),
			form: Arc::new(JsonForm::new()),
			lookup_field: "pk".to_string(),
			fields: None,
			extra_context: ConfigMap::new(),
			list_extra_context: ConfigMap::new(),
			extra_form_kwargs: ConfigMap::new(),
			templates: BTreeMap::new(),
			overrides: BTreeMap::new(),
		}
	}

	/// Replace the record source for every generated view (the record-set
	/// restriction override).
	pub fn with_queryset(mut self, queryset: Arc<dyn Queryset<M>>) -> Self {
		self.queryset = queryset;
		self
	}

	pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
		self.renderer = renderer;
		self
	}

	/// Replace the form used by the create and update views.
	pub fn with_form(mut self, form: Arc<dyn Form<M>>) -> Self {
		self.form = form;
		self
	}

	/// Path parameter carrying the lookup value for single-object views
	/// (default `pk`).
	pub fn with_lookup_field(mut self, field: impl Into<String>) -> Self {
		self.lookup_field = field.into();
		self
	}

	/// Restrict the list view's serialized records to the named fields.
	pub fn with_fields(mut self, fields: Vec<String>) -> Self {
		self.fields = Some(fields);
		self
	}

	/// Extra context merged into every view's render context, resolved per
	/// request.
	pub fn with_extra_context(mut self, extra_context: ConfigMap) -> Self {
		self.extra_context = extra_context;
		self
	}

	/// Extra context merged only into the list view's render context, after
	/// the general extra context.
	pub fn with_list_extra_context(mut self, list_extra_context: ConfigMap) -> Self {
		self.list_extra_context = list_extra_context;
		self
	}

	/// Extra form-construction kwargs, resolved per request before binding.
	pub fn with_extra_form_kwargs(mut self, extra_form_kwargs: ConfigMap) -> Self {
		self.extra_form_kwargs = extra_form_kwargs;
		self
	}

	/// Template override for one operation.
	pub fn with_template(mut self, operation: Operation, template_name: impl Into<String>) -> Self {
		self.templates.insert(operation, template_name.into());
		self
	}

	/// Template override shared by create and update (the form views).
	pub fn with_form_template(self, template_name: impl Into<String>) -> Self {
		let template_name = template_name.into();
		self.with_template(Operation::Create, template_name.clone())
			.with_template(Operation::Update, template_name)
	}

	/// Use a caller-supplied handler for one operation instead of the
	/// generic view (the per-operation base-behavior override).
	///
	/// The handler replaces the generic view wholesale: the factory's
	/// queryset, extra context, form and template configuration do not
	/// apply to an overridden operation.
	pub fn with_override(mut self, operation: Operation, handler: Arc<dyn Handler>) -> Self {
		self.overrides.insert(operation, handler);
		self
	}

	/// Build the handler set. Always yields exactly five handlers.
	pub fn build(mut self) -> HandlerSet {
		let mut set = HandlerSet::new();
		for operation in Operation::ALL {
			let handler = match self.overrides.remove(&operation) {
				Some(custom) => custom,
				None => self.build_view(operation),
			};
			set.insert(operation, handler);
		}
		tracing::debug!(model = M::table_name(), "built generic view handler set");
		set
	}

	fn build_view(&self, operation: Operation) -> Arc<dyn Handler> {
		let template = self.templates.get(&operation).cloned();
		match operation {
			Operation::List => {
				let mut view = ListView::new(self.queryset.clone(), self.renderer.clone())
					.with_extra_context(self.extra_context.clone())
					.with_list_extra_context(self.list_extra_context.clone());
				if let Some(fields) = self.fields.clone() {
					view = view.with_fields(fields);
				}
				if let Some(template) = template {
					view = view.with_template(template);
				}
				Arc::new(view)
			}
			Operation::Detail => {
				let mut view = DetailView::new(self.queryset.clone(), self.renderer.clone())
					.with_lookup_field(self.lookup_field.clone())
					.with_extra_context(self.extra_context.clone());
				if let Some(template) = template {
					view = view.with_template(template);
				}
				Arc::new(view)
			}
			Operation::Create => {
				let mut view = CreateView::new(
					self.queryset.clone(),
					self.renderer.clone(),
					self.form.clone(),
				)
				.with_extra_form_kwargs(self.extra_form_kwargs.clone())
				.with_extra_context(self.extra_context.clone());
				if let Some(template) = template {
					view = view.with_template(template);
				}
				Arc::new(view)
			}
			Operation::Update => {
				let mut view = UpdateView::new(
					self.queryset.clone(),
					self.renderer.clone(),
					self.form.clone(),
				)
				.with_lookup_field(self.lookup_field.clone())
				.with_extra_form_kwargs(self.extra_form_kwargs.clone())
				.with_extra_context(self.extra_context.clone());
				if let Some(template) = template {
					view = view.with_template(template);
				}
				Arc::new(view)
			}
			Operation::Delete => {
				let mut view = DeleteView::new(self.queryset.clone(), self.renderer.clone())
					.with_lookup_field(self.lookup_field.clone())
					.with_extra_context(self.extra_context.clone());
				if let Some(template) = template {
					view = view.with_template(template);
				}
				Arc::new(view)
			}
		}
	}
}
