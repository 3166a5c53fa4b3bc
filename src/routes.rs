//! Route generation for generated handler sets.
//!
//! Produces `(path, handler, name)` triples for a routing layer to consume.
//! A pattern that references an operation missing from a model's handler set
//! is skipped with a structured diagnostic (and a `tracing` warning), never
//! an error: partial handler sets are a supported configuration.

use std::sync::Arc;

use crate::factory::HandlerSet;
use crate::generic::Operation;
use crate::handler::Handler;

/// One routable entry: a URL pattern bound to a handler, optionally named.
#[derive(Clone)]
pub struct Route {
	pub path: String,
	handler: Arc<dyn Handler>,
	pub name: Option<String>,
}

impl Route {
	pub fn new(path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		Self {
			path: path.into(),
			handler,
			name: None,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn handler(&self) -> &dyn Handler {
		&*self.handler
	}

	pub fn handler_arc(&self) -> Arc<dyn Handler> {
		Arc::clone(&self.handler)
	}
}

/// Ordered operation → URL pattern templates.
///
/// The `{model}` placeholder is substituted with the lower-cased model name
/// when routes are generated.
#[derive(Clone, Debug, Default)]
pub struct RoutePatterns {
	patterns: Vec<(Operation, String)>,
}

impl RoutePatterns {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn pattern(mut self, operation: Operation, template: impl Into<String>) -> Self {
		self.patterns.push((operation, template.into()));
		self
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}

/// A requested (model, operation) pair that had no handler to bind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDiagnostic {
	pub model: String,
	pub operation: Operation,
}

/// Route generation output: the routes plus everything that was skipped.
///
/// Diagnostics are returned rather than merely logged so the caller decides
/// how to surface them (ignore, log, fail startup).
#[derive(Default)]
pub struct GeneratedRoutes {
	pub routes: Vec<Route>,
	pub diagnostics: Vec<RouteDiagnostic>,
}

/// Bind `patterns` against each model's handler set.
///
/// Output order is `sets` order crossed with pattern order. Route names are
/// `<model>_<operation>`, both lower-cased.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use model_views::{
///     MemoryQueryset, Operation, RoutePatterns, ViewFactory, generate_routes,
/// };
/// use model_views::test_utils::Widget;
///
/// let views = ViewFactory::<Widget>::new(Arc::new(MemoryQueryset::new())).build();
/// let patterns = RoutePatterns::new()
///     .pattern(Operation::List, "{model}/")
///     .pattern(Operation::Detail, "{model}/{pk}/");
///
/// let generated = generate_routes(&[("Widget", &views)], &patterns);
/// assert_eq!(generated.routes.len(), 2);
/// assert_eq!(generated.routes[0].path, "widget/");
/// assert_eq!(generated.routes[0].name.as_deref(), Some("widget_list"));
/// assert!(generated.diagnostics.is_empty());
/// ```
pub fn generate_routes(sets: &[(&str, &HandlerSet)], patterns: &RoutePatterns) -> GeneratedRoutes {
	let mut generated = GeneratedRoutes::default();
	for (model, set) in sets {
		let model_name = model.to_lowercase();
		for (operation, template) in &patterns.patterns {
			let Some(handler) = set.get(*operation) else {
				tracing::warn!(
					model = %model_name,
					operation = %operation,
					"no handler for requested route pattern, skipping"
				);
				generated.diagnostics.push(RouteDiagnostic {
					model: model_name.clone(),
					operation: *operation,
				});
				continue;
			};
			let path = template.replace("{model}", &model_name);
			let name = format!("{}_{}", model_name, operation);
			generated
				.routes
				.push(Route::new(path, handler.clone()).with_name(name));
		}
	}
	generated
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::MemoryQueryset;
	use crate::test_utils::Widget;
	use crate::{Operation, ViewFactory};

	fn widget_views() -> HandlerSet {
		ViewFactory::<Widget>::new(Arc::new(MemoryQueryset::new())).build()
	}

	#[test]
	fn test_model_name_substitution_and_naming() {
		let views = widget_views();
		let patterns = RoutePatterns::new().pattern(Operation::Detail, "{model}/{pk}/");
		let generated = generate_routes(&[("Widget", &views)], &patterns);

		assert_eq!(generated.routes.len(), 1);
		assert_eq!(generated.routes[0].path, "widget/{pk}/");
		assert_eq!(
			generated.routes[0].name.as_deref(),
			Some("widget_detail")
		);
	}

	#[test]
	fn test_missing_operation_is_skipped_with_diagnostic() {
		let mut partial = HandlerSet::new();
		let full = widget_views();
		partial.insert(Operation::List, full.get(Operation::List).unwrap().clone());

		let patterns = RoutePatterns::new()
			.pattern(Operation::List, "{model}/")
			.pattern(Operation::Delete, "{model}/{pk}/delete/");
		let generated = generate_routes(&[("Widget", &partial)], &patterns);

		assert_eq!(generated.routes.len(), 1);
		assert_eq!(
			generated.diagnostics,
			vec![RouteDiagnostic {
				model: "widget".to_string(),
				operation: Operation::Delete,
			}]
		);
	}
}
