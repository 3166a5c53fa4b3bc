//! The rendering seam: turning a render [`Context`] into a [`Response`].

use std::sync::Arc;

use crate::context::Context;
use crate::exception::Result;
use crate::response::Response;

/// Renders a view's context into a response.
///
/// `template_name` is the per-operation template the view settled on (its
/// configured override, or a `<table>_<operation>.html` default). Renderers
/// that do not use templates are free to ignore it.
pub trait Renderer: Send + Sync {
	fn render(&self, template_name: &str, context: &Context) -> Result<Response>;
}

/// Default renderer: emits the context as a JSON object, ignoring the
/// template name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
	pub fn new() -> Self {
		Self
	}
}

impl Renderer for JsonRenderer {
	fn render(&self, _template_name: &str, context: &Context) -> Result<Response> {
		Response::ok().with_json(context)
	}
}

/// Template renderer backed by Tera.
///
/// # Examples
///
/// ```
/// use model_views::{Context, Renderer, TemplateRenderer};
/// use serde_json::json;
///
/// let mut engine = tera::Tera::default();
/// engine
///     .add_raw_template("widget_detail.html", "<h1>{{ object.name }}</h1>")
///     .unwrap();
///
/// let mut context = Context::new();
/// context.insert("object", json!({"name": "gear"}));
///
/// let response = TemplateRenderer::new(engine)
///     .render("widget_detail.html", &context)
///     .unwrap();
/// assert_eq!(response.body, "<h1>gear</h1>");
/// ```
pub struct TemplateRenderer {
	engine: Arc<tera::Tera>,
}

impl TemplateRenderer {
	pub fn new(engine: tera::Tera) -> Self {
		Self {
			engine: Arc::new(engine),
		}
	}

	pub fn from_shared(engine: Arc<tera::Tera>) -> Self {
		Self { engine }
	}
}

impl Renderer for TemplateRenderer {
	fn render(&self, template_name: &str, context: &Context) -> Result<Response> {
		let tera_context = tera::Context::from_serialize(context)?;
		let html = self.engine.render(template_name, &tera_context)?;
		Ok(Response::ok().with_html(html))
	}
}
