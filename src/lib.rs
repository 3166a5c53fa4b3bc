//! Generic CRUD view factory with declarative, lazily resolved configuration.
//!
//! Given a model type, a record source, and one configuration bundle, the
//! [`ViewFactory`] produces five handlers (list, detail, create, update,
//! delete) that compose this crate's seams: a [`Queryset`] for record access,
//! a [`Form`] for binding write payloads, and a [`Renderer`] for turning a
//! render [`Context`] into a [`Response`].
//!
//! Configuration values can be static JSON, nested bundles, or computations
//! deferred until a request is in flight ([`ConfigValue::Computed`]); the
//! views resolve them once per invocation, so values may depend on
//! per-request state. [`generate_routes`] optionally wires handler sets into
//! named `(path, handler)` route entries.
//!
//! ```
//! use std::sync::Arc;
//! use model_views::{ConfigMap, MemoryQueryset, Operation, Request, ViewFactory};
//! use model_views::test_utils::Widget;
//! use serde_json::json;
//!
//! let queryset = Arc::new(MemoryQueryset::<Widget>::new());
//! let views = ViewFactory::<Widget>::new(queryset)
//!     .with_extra_context(
//!         ConfigMap::new().with_computed("greeting", |_request: &Request| Ok(json!("hi"))),
//!     )
//!     .build();
//! assert_eq!(views.len(), 5);
//! assert!(views.contains(Operation::Detail));
//! ```

pub mod config;
pub mod context;
pub mod exception;
pub mod factory;
pub mod forms;
pub mod generic;
pub mod handler;
pub mod model;
pub mod render;
pub mod request;
pub mod response;
pub mod routes;
pub mod test_utils;

pub use config::{ConfigMap, ConfigValue};
pub use context::Context;
pub use exception::{Error, Result};
pub use factory::{HandlerSet, ViewFactory};
pub use forms::{Form, JsonForm};
pub use generic::{CreateView, DeleteView, DetailView, ListView, Operation, UpdateView};
pub use handler::Handler;
pub use model::{MemoryQueryset, Model, Queryset, ScopedQueryset};
pub use render::{JsonRenderer, Renderer, TemplateRenderer};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use routes::{GeneratedRoutes, Route, RouteDiagnostic, RoutePatterns, generate_routes};
