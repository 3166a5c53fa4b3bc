//! The data-model seam: a minimal `Model` trait plus the `Queryset`
//! record-source contract views fetch and persist through.
//!
//! Real deployments back `Queryset` with an ORM; [`MemoryQueryset`] is a
//! complete in-process implementation used by the tests and available for
//! prototyping.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::exception::{Error, Result};

/// A domain record type views can operate on.
pub trait Model: Send + Sync {
	type PrimaryKey: ToString + Send + Sync;

	fn table_name() -> &'static str;

	fn primary_key(&self) -> Option<&Self::PrimaryKey>;

	fn set_primary_key(&mut self, value: Self::PrimaryKey);
}

/// Record source and sink for a model type.
///
/// Lookups are string-keyed because they originate from URL path parameters;
/// implementations parse or compare as their storage requires. All failure
/// cases (missing record, constraint violation, backend error) are expressed
/// through [`Error`] and propagated unchanged by the views.
#[async_trait]
pub trait Queryset<M: Model>: Send + Sync {
	/// Fetch every record in this set.
	async fn all(&self) -> Result<Vec<M>>;

	/// Fetch the single record whose primary key renders as `lookup`.
	async fn get(&self, lookup: &str) -> Result<M>;

	/// Persist a new record, returning it as stored (primary key assigned).
	async fn insert(&self, record: M) -> Result<M>;

	/// Replace the stored record with the same primary key.
	async fn update(&self, record: M) -> Result<M>;

	/// Remove the record whose primary key renders as `lookup`.
	async fn delete(&self, lookup: &str) -> Result<()>;
}

struct Store<M> {
	records: Vec<M>,
	next_pk: i64,
}

/// In-memory [`Queryset`] with auto-assigned integer-derived primary keys.
///
/// # Examples
///
/// ```
/// use model_views::{MemoryQueryset, Queryset};
/// use model_views::test_utils::Widget;
///
/// # async fn demo() -> model_views::Result<()> {
/// let queryset = MemoryQueryset::<Widget>::new();
/// let stored = queryset.insert(Widget::named("gear")).await?;
/// assert!(stored.id.is_some());
/// assert_eq!(queryset.all().await?.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MemoryQueryset<M> {
	store: Arc<RwLock<Store<M>>>,
}

impl<M> MemoryQueryset<M>
where
	M: Model + Clone,
	M::PrimaryKey: From<i64>,
{
	pub fn new() -> Self {
		Self::with_records(Vec::new())
	}

	/// Seed the set with existing records. The primary-key counter starts
	/// past the highest value already rendered as an integer.
	pub fn with_records(records: Vec<M>) -> Self {
		let next_pk = records
			.iter()
			.filter_map(|r| r.primary_key())
			.filter_map(|pk| pk.to_string().parse::<i64>().ok())
			.max()
			.unwrap_or(0)
			+ 1;
		Self {
			store: Arc::new(RwLock::new(Store { records, next_pk })),
		}
	}
}

impl<M> Default for MemoryQueryset<M>
where
	M: Model + Clone,
	M::PrimaryKey: From<i64>,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<M> Clone for MemoryQueryset<M> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
		}
	}
}

#[async_trait]
impl<M> Queryset<M> for MemoryQueryset<M>
where
	M: Model + Clone + 'static,
	M::PrimaryKey: From<i64>,
{
	async fn all(&self) -> Result<Vec<M>> {
		Ok(self.store.read().records.clone())
	}

	async fn get(&self, lookup: &str) -> Result<M> {
		self.store
			.read()
			.records
			.iter()
			.find(|r| matches_pk(*r, lookup))
			.cloned()
			.ok_or_else(|| not_found::<M>(lookup))
	}

	async fn insert(&self, mut record: M) -> Result<M> {
		let mut store = self.store.write();
		if record.primary_key().is_none() {
			let pk = store.next_pk;
			store.next_pk += 1;
			record.set_primary_key(M::PrimaryKey::from(pk));
		}
		store.records.push(record.clone());
		Ok(record)
	}

	async fn update(&self, record: M) -> Result<M> {
		let lookup = record
			.primary_key()
			.map(|pk| pk.to_string())
			.ok_or_else(|| {
				Error::Validation(format!(
					"cannot update {} without a primary key",
					M::table_name()
				))
			})?;
		let mut store = self.store.write();
		let slot = store
			.records
			.iter_mut()
			.find(|r| matches_pk(*r, &lookup))
			.ok_or_else(|| not_found::<M>(&lookup))?;
		*slot = record.clone();
		Ok(record)
	}

	async fn delete(&self, lookup: &str) -> Result<()> {
		let mut store = self.store.write();
		let before = store.records.len();
		store.records.retain(|r| !matches_pk(r, lookup));
		if store.records.len() == before {
			return Err(not_found::<M>(lookup));
		}
		Ok(())
	}
}

/// Restriction of another queryset to records matching a predicate.
///
/// This is the record-set override in its simplest form: wrap the default
/// source, hand the wrapper to the factory.
pub struct ScopedQueryset<M> {
	inner: Arc<dyn Queryset<M>>,
	predicate: Arc<dyn Fn(&M) -> bool + Send + Sync>,
}

impl<M: Model + 'static> ScopedQueryset<M> {
	pub fn new(
		inner: Arc<dyn Queryset<M>>,
		predicate: impl Fn(&M) -> bool + Send + Sync + 'static,
	) -> Self {
		Self {
			inner,
			predicate: Arc::new(predicate),
		}
	}
}

#[async_trait]
impl<M: Model + 'static> Queryset<M> for ScopedQueryset<M> {
	async fn all(&self) -> Result<Vec<M>> {
		let mut records = self.inner.all().await?;
		records.retain(|r| (self.predicate)(r));
		Ok(records)
	}

	async fn get(&self, lookup: &str) -> Result<M> {
		let record = self.inner.get(lookup).await?;
		if (self.predicate)(&record) {
			Ok(record)
		} else {
			Err(not_found::<M>(lookup))
		}
	}

	async fn insert(&self, record: M) -> Result<M> {
		self.inner.insert(record).await
	}

	async fn update(&self, record: M) -> Result<M> {
		self.inner.update(record).await
	}

	async fn delete(&self, lookup: &str) -> Result<()> {
		// Deleting outside the restriction would bypass it.
		self.get(lookup).await?;
		self.inner.delete(lookup).await
	}
}

fn matches_pk<M: Model>(record: &M, lookup: &str) -> bool {
	record
		.primary_key()
		.is_some_and(|pk| pk.to_string() == lookup)
}

fn not_found<M: Model>(lookup: &str) -> Error {
	Error::NotFound(format!("{} matching '{}' not found", M::table_name(), lookup))
}
