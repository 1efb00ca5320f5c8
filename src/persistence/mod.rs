//! Generic data access.
//!
//! Domain services talk to a [`Repository`] of [`Entity`] values; the only
//! backend shipped is the process-lifetime [`InMemoryRepository`].

use crate::error::{Result, RosterError};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub mod memory;

pub use memory::InMemoryRepository;

pub type EntityId = i32;

/// Predicate used by [`Repository::find`].
pub type Filter<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// In-place modification applied by [`Repository::update_with`].
pub type Mutation<E> = Box<dyn FnOnce(&mut E) + Send>;

/// A record with a store-assigned integer identity.
pub trait Entity: Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn id(&self) -> EntityId;

    /// Called once by the store on insert. Implementations must also stamp
    /// the id onto any owned child records.
    fn assign_id(&mut self, id: EntityId);
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Store a new entity under a fresh id and return the stored copy.
    async fn insert(&self, entity: E, cancel: &CancellationToken) -> Result<E>;

    async fn get(&self, id: EntityId, cancel: &CancellationToken) -> Result<Option<E>>;

    async fn find(&self, filter: Filter<E>, cancel: &CancellationToken) -> Result<Vec<E>>;

    /// Up to `take` entities after skipping `skip`, in iteration order.
    async fn page(&self, skip: usize, take: usize, cancel: &CancellationToken) -> Result<Vec<E>>;

    /// Atomically apply `mutation` to the entity with `id`. Returns the
    /// updated entity, or `None` when there is nothing to update.
    async fn update_with(
        &self,
        id: EntityId,
        mutation: Mutation<E>,
        cancel: &CancellationToken,
    ) -> Result<Option<E>>;

    async fn remove(&self, id: EntityId, cancel: &CancellationToken) -> Result<Option<E>>;

    async fn count(&self, cancel: &CancellationToken) -> Result<usize>;

    async fn exists(&self, id: EntityId, cancel: &CancellationToken) -> Result<bool>;
}

/// Fails with [`RosterError::Cancelled`] once `cancel` has fired.
pub fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(RosterError::Cancelled)
    } else {
        Ok(())
    }
}
