use crate::di::Container;
use crate::error::Result;

/// Trait for types that can be built from the DI container
///
/// Usually derived with `#[derive(Injectable)]`: every `Arc<T>` field is
/// resolved with [`Container::resolve`] and every `Arc<dyn Trait>` field with
/// [`Container::resolve_trait`].
///
/// # Example
/// ```rust,ignore
/// use roster::Injectable;
/// use std::sync::Arc;
///
/// #[derive(Injectable)]
/// pub struct UserService {
///     repository: Arc<dyn Repository<User>>,
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container
    ///
    /// # Errors
    /// Returns an error if any required dependency is not registered.
    fn inject(container: &Container) -> Result<Self>;
}
