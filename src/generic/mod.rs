//! The five generic CRUD views.
//!
//! Each operation is its own handler type composed from the crate's seams
//! (queryset, form, renderer) plus the shared helpers below; there is no
//! inheritance chain, and which operation a handler performs is fixed by its
//! type at construction time.

mod delete;
mod detail;
mod edit;
mod list;

pub use delete::DeleteView;
pub use detail::DetailView;
pub use edit::{CreateView, UpdateView};
pub use list::ListView;

use std::fmt;

use crate::exception::{Error, Result};
use crate::model::Model;
use crate::request::Request;

/// The five CRUD operations a generated handler set covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
	List,
	Detail,
	Create,
	Update,
	Delete,
}

impl Operation {
	pub const ALL: [Operation; 5] = [
		Operation::List,
		Operation::Detail,
		Operation::Create,
		Operation::Update,
		Operation::Delete,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Operation::List => "list",
			Operation::Detail => "detail",
			Operation::Create => "create",
			Operation::Update => "update",
			Operation::Delete => "delete",
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Default template name for a model/operation pair, e.g. `widgets_list.html`.
pub(crate) fn default_template<M: Model>(operation: Operation) -> String {
	format!("{}_{}.html", M::table_name(), operation)
}

/// Extract the lookup value for single-object views from the path parameters.
pub(crate) fn lookup_param<'a>(request: &'a Request, field: &str) -> Result<&'a str> {
	request
		.path_params
		.get(field)
		.map(String::as_str)
		.ok_or_else(|| {
			Error::Http(format!(
				"Missing lookup field '{}' in path parameters",
				field
			))
		})
}

pub(crate) fn method_not_allowed() -> Error {
	Error::Http("Method not allowed".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Request;

	#[test]
	fn test_operation_names() {
		let names: Vec<&str> = Operation::ALL.iter().map(|op| op.as_str()).collect();
		assert_eq!(names, ["list", "detail", "create", "update", "delete"]);
		assert_eq!(Operation::Detail.to_string(), "detail");
	}

	#[test]
	fn test_lookup_param_missing() {
		let request = Request::builder().uri("/widgets/").build().unwrap();
		assert!(lookup_param(&request, "pk").is_err());
	}
}
