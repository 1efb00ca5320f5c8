use super::LifecycleError;
use async_trait::async_trait;

/// Called once the container is wired, before the server accepts requests.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl OnModuleInit for CacheWarmer {
///     async fn on_module_init(&mut self) -> Result<(), LifecycleError> {
///         self.warm().await.map_err(|e| LifecycleError::init_failed(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait OnModuleInit: Send + Sync {
    async fn on_module_init(&mut self) -> Result<(), LifecycleError>;
}
