use super::{LifecycleError, OnModuleInit, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

struct LifecycleHook<T: ?Sized> {
    service: Arc<RwLock<T>>,
    name: String,
}

/// Runs startup hooks in registration order.
///
/// ```rust,ignore
/// let mut manager = LifecycleManager::new();
/// manager.register_init(Arc::new(RwLock::new(seeder)), "UserSeeder");
/// manager.call_module_init_with_timeout(Duration::from_secs(30)).await?;
/// ```
#[derive(Default)]
pub struct LifecycleManager {
    on_init_hooks: Vec<LifecycleHook<dyn OnModuleInit>>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_init<T>(&mut self, service: Arc<RwLock<T>>, name: impl Into<String>)
    where
        T: OnModuleInit + 'static,
    {
        self.on_init_hooks.push(LifecycleHook {
            service,
            name: name.into(),
        });
    }

    /// Stops at the first failing hook.
    pub async fn call_module_init(&self) -> Result<()> {
        tracing::info!("Calling OnModuleInit hooks...");

        for hook in &self.on_init_hooks {
            tracing::debug!("Initializing: {}", hook.name);
            let mut service = hook.service.write().await;
            service.on_module_init().await.map_err(|e| {
                tracing::error!("OnModuleInit failed for {}: {}", hook.name, e);
                LifecycleError::hook_failed(&hook.name, e.to_string())
            })?;
            tracing::debug!("Initialized: {}", hook.name);
        }

        tracing::info!(
            "OnModuleInit complete ({} hooks executed)",
            self.on_init_hooks.len()
        );
        Ok(())
    }

    pub async fn call_module_init_with_timeout(&self, timeout: Duration) -> Result<()> {
        tokio::time::timeout(timeout, self.call_module_init())
            .await
            .map_err(|_| {
                LifecycleError::timeout("OnModuleInit", format!("Timeout after {:?}", timeout))
            })?
    }
}
