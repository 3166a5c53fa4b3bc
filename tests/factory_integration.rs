//! View Factory Integration Tests
//!
//! Exercises the factory end to end through the generated handlers:
//! - Handler set shape (exactly five operations, stable keys)
//! - Full CRUD lifecycle (create, list, detail, update, delete)
//! - Per-request resolution of deferred extra context and form kwargs
//! - List-only extra context gating
//! - Record-set restriction via a queryset override
//! - Per-operation handler overrides
//! - Template rendering through a Tera-backed renderer

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hyper::{Method, StatusCode};
use model_views::test_utils::{
	Widget, assert_json_response_contains, assert_response_status, create_json_request,
	create_request, create_request_with_path_params, widget_queryset,
};
use model_views::{
	ConfigMap, Handler, MemoryQueryset, Operation, Queryset, Request, Response, Result,
	ScopedQueryset, TemplateRenderer, ViewFactory,
};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn factory_for(queryset: MemoryQueryset<Widget>) -> ViewFactory<Widget> {
	ViewFactory::new(Arc::new(queryset))
}

async fn dispatch(
	set: &model_views::HandlerSet,
	operation: Operation,
	request: Request,
) -> Result<Response> {
	set.get(operation)
		.expect("operation should be present")
		.handle(request)
		.await
}

// ============================================================================
// Handler set shape
// ============================================================================

#[tokio::test]
async fn test_factory_produces_five_operations() {
	let set = factory_for(MemoryQueryset::new()).build();
	assert_eq!(set.len(), 5);
	for operation in Operation::ALL {
		assert!(set.contains(operation), "missing {}", operation);
	}
}

// ============================================================================
// CRUD lifecycle
// ============================================================================

#[tokio::test]
async fn test_full_crud_lifecycle() {
	let queryset = MemoryQueryset::<Widget>::new();
	let set = factory_for(queryset.clone()).build();

	// Create
	let response = dispatch(
		&set,
		Operation::Create,
		create_json_request(Method::POST, "/widgets/", &json!({"name": "gear", "quantity": 3})),
	)
	.await
	.unwrap();
	assert_response_status(&response, StatusCode::CREATED);
	let created: Widget = response.json().unwrap();
	assert_eq!(created.id, Some(1));

	// List
	let response = dispatch(&set, Operation::List, create_request(Method::GET, "/widgets/"))
		.await
		.unwrap();
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["object_list"].as_array().unwrap().len(), 1);

	// Detail
	let response = dispatch(
		&set,
		Operation::Detail,
		create_request_with_path_params(Method::GET, "/widgets/1/", &[("pk", "1")]),
	)
	.await
	.unwrap();
	assert_json_response_contains(
		&response,
		"object",
		&json!({"id": 1, "name": "gear", "quantity": 3}),
	);

	// Update
	let mut request =
		create_json_request(Method::PUT, "/widgets/1/", &json!({"name": "sprocket"}));
	request.path_params.insert("pk".to_string(), "1".to_string());
	let response = dispatch(&set, Operation::Update, request).await.unwrap();
	assert_response_status(&response, StatusCode::OK);
	let updated: Widget = response.json().unwrap();
	assert_eq!(updated.name, "sprocket");
	assert_eq!(updated.quantity, 3);

	// Delete
	let response = dispatch(
		&set,
		Operation::Delete,
		create_request_with_path_params(Method::DELETE, "/widgets/1/", &[("pk", "1")]),
	)
	.await
	.unwrap();
	assert_response_status(&response, StatusCode::NO_CONTENT);
	assert!(queryset.all().await.unwrap().is_empty());
}

// ============================================================================
// Deferred configuration
// ============================================================================

#[tokio::test]
async fn test_detail_context_includes_deferred_greeting() {
	let queryset = widget_queryset(&["gear"]).await;
	let set = factory_for(queryset)
		.with_extra_context(ConfigMap::new().with_computed("greeting", |_| Ok(json!("hi"))))
		.build();

	let response = dispatch(
		&set,
		Operation::Detail,
		create_request_with_path_params(Method::GET, "/widgets/1/", &[("pk", "1")]),
	)
	.await
	.unwrap();
	assert_json_response_contains(&response, "greeting", &json!("hi"));
}

#[tokio::test]
async fn test_deferred_context_invoked_once_per_request() {
	let calls = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&calls);
	let queryset = widget_queryset(&["gear"]).await;
	let set = factory_for(queryset)
		.with_extra_context(ConfigMap::new().with_computed("tick", move |_| {
			Ok(json!(seen.fetch_add(1, Ordering::SeqCst)))
		}))
		.build();

	for expected in 0..3usize {
		let response = dispatch(
			&set,
			Operation::Detail,
			create_request_with_path_params(Method::GET, "/widgets/1/", &[("pk", "1")]),
		)
		.await
		.unwrap();
		// Fresh resolution each request, one invocation each.
		assert_json_response_contains(&response, "tick", &json!(expected));
	}
	assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_list_extra_context_only_reaches_list() {
	let queryset = widget_queryset(&["gear"]).await;
	let set = factory_for(queryset)
		.with_extra_context(ConfigMap::new().with_value("site", json!("workshop")))
		.with_list_extra_context(ConfigMap::new().with_value("page_title", json!("All widgets")))
		.build();

	let response = dispatch(&set, Operation::List, create_request(Method::GET, "/widgets/"))
		.await
		.unwrap();
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["site"], "workshop");
	assert_eq!(body["page_title"], "All widgets");

	let response = dispatch(
		&set,
		Operation::Detail,
		create_request_with_path_params(Method::GET, "/widgets/1/", &[("pk", "1")]),
	)
	.await
	.unwrap();
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["site"], "workshop");
	assert!(body.get("page_title").is_none());
}

#[tokio::test]
async fn test_form_kwargs_resolved_against_each_request() {
	let queryset = MemoryQueryset::<Widget>::new();
	let set = factory_for(queryset.clone())
		.with_extra_form_kwargs(ConfigMap::new().with_computed(
			"quantity",
			|request: &Request| {
				Ok(json!(
					request
						.query_params
						.get("stock")
						.and_then(|s| s.parse::<i64>().ok())
						.unwrap_or(0)
				))
			},
		))
		.build();

	let response = dispatch(
		&set,
		Operation::Create,
		create_json_request(
			Method::POST,
			"/widgets/?stock=42",
			&json!({"name": "gear", "quantity": 1}),
		),
	)
	.await
	.unwrap();
	let created: Widget = response.json().unwrap();
	// Resolved kwargs win over the client payload.
	assert_eq!(created.quantity, 42);
}

// ============================================================================
// Overrides
// ============================================================================

#[tokio::test]
async fn test_queryset_override_restricts_every_view() {
	let backing = widget_queryset(&["visible", "hidden"]).await;
	let scoped: Arc<dyn Queryset<Widget>> = Arc::new(ScopedQueryset::new(
		Arc::new(backing),
		|w: &Widget| w.name != "hidden",
	));
	let set = ViewFactory::new(scoped).build();

	let response = dispatch(&set, Operation::List, create_request(Method::GET, "/widgets/"))
		.await
		.unwrap();
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["object_list"].as_array().unwrap().len(), 1);

	// The restricted record is invisible to detail as well.
	let result = dispatch(
		&set,
		Operation::Detail,
		create_request_with_path_params(Method::GET, "/widgets/2/", &[("pk", "2")]),
	)
	.await;
	assert!(matches!(result.unwrap_err(), model_views::Error::NotFound(_)));
}

struct TeapotHandler;

#[async_trait]
impl Handler for TeapotHandler {
	async fn handle(&self, _request: Request) -> Result<Response> {
		Ok(Response::new(StatusCode::IM_A_TEAPOT))
	}
}

#[tokio::test]
async fn test_per_operation_override_replaces_generic_view() {
	let set = factory_for(MemoryQueryset::new())
		.with_extra_context(ConfigMap::new().with_value("site", json!("workshop")))
		.with_override(Operation::Delete, Arc::new(TeapotHandler))
		.build();

	// The override answers instead of the generic delete view, and the
	// factory's shared configuration does not reach it.
	let response = dispatch(
		&set,
		Operation::Delete,
		create_request(Method::DELETE, "/widgets/1/"),
	)
	.await
	.unwrap();
	assert_response_status(&response, StatusCode::IM_A_TEAPOT);
	assert!(response.body.is_empty());

	// Other operations are untouched and still see the shared context.
	assert_eq!(set.len(), 5);
	let response = dispatch(&set, Operation::List, create_request(Method::GET, "/widgets/"))
		.await
		.unwrap();
	assert_response_status(&response, StatusCode::OK);
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["site"], "workshop");
}

// ============================================================================
// Template rendering
// ============================================================================

#[tokio::test]
async fn test_template_override_renders_html() {
	let mut engine = tera::Tera::default();
	engine
		.add_raw_template("widget_page.html", "<h1>{{ object.name }} ({{ site }})</h1>")
		.unwrap();

	let queryset = widget_queryset(&["gear"]).await;
	let set = factory_for(queryset)
		.with_renderer(Arc::new(TemplateRenderer::new(engine)))
		.with_template(Operation::Detail, "widget_page.html")
		.with_extra_context(ConfigMap::new().with_value("site", json!("workshop")))
		.build();

	let response = dispatch(
		&set,
		Operation::Detail,
		create_request_with_path_params(Method::GET, "/widgets/1/", &[("pk", "1")]),
	)
	.await
	.unwrap();
	assert_eq!(response.body, "<h1>gear (workshop)</h1>");
}
