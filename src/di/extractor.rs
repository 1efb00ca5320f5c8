use crate::di::Container;
use crate::error::RosterError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Axum extractor that pulls a shared service out of the DI container
///
/// # Example
/// ```rust,ignore
/// async fn list_users(
///     Inject(mediator): Inject<Mediator>,
///     Query(query): Query<ListUsersQuery>,
/// ) -> Result<Json<PaginatedDto<Vec<UserDto>>>> {
///     // ...
/// }
/// ```
pub struct Inject<T>(pub Arc<T>);

/// Implemented by router state that owns the DI container
pub trait HasContainer {
    fn get_container(&self) -> &Container;
}

impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync + HasContainer,
    T: 'static + Send + Sync,
{
    type Rejection = RosterError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        state.get_container().resolve::<T>().map(Inject)
    }
}

impl<T> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Inject(Arc::clone(&self.0))
    }
}
