use super::{LifecycleManager, Result, shutdown_signal};
use crate::config::AppConfig;
use crate::controller::{self, AppState};
use crate::di::{Container, ContainerBuilder};
use crate::module::Module;
use crate::pipeline::Mediator;
use crate::users::{UserSeeder, UserService, UsersModule};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// A fully wired application: container, mediator and startup hooks done.
///
/// # Example
///
/// ```rust,ignore
/// let app = Application::builder().config(config).build().await?;
/// let listener = TcpListener::bind(app.config().bind_address()).await?;
/// app.serve(listener).await?;
/// ```
pub struct Application {
    config: AppConfig,
    container: Arc<Container>,
    shutdown: CancellationToken,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Cancelled when the application shuts down; parent of every request token.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    pub fn router(&self) -> Router {
        controller::router(AppState::new(
            Arc::clone(&self.container),
            self.shutdown.clone(),
        ))
    }

    /// Serve until Ctrl+C or SIGTERM, then cancel in-flight requests and drain.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let router = self.router();
        let shutdown = self.shutdown.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                tracing::info!("Initiating graceful shutdown...");
                shutdown.cancel();
            })
            .await
    }
}

pub struct ApplicationBuilder {
    config: AppConfig,
    container: ContainerBuilder,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            container: ContainerBuilder::new(),
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire modules and the mediator, then run startup hooks.
    pub async fn build(self) -> Result<Application> {
        let Self { config, container } = self;
        let mut container = container.register(config.clone()).build();
        UsersModule::register(&mut container)?;

        let mediator = Mediator::new();
        UsersModule::configure(&container, &mediator)?;
        container.register(mediator);

        let mut lifecycle = LifecycleManager::new();
        if config.seed_users > 0 {
            let users = container.resolve::<UserService>()?;
            let seeder = UserSeeder::new(users, config.seed_users);
            lifecycle.register_init(Arc::new(RwLock::new(seeder)), "UserSeeder");
        }
        lifecycle
            .call_module_init_with_timeout(config.init_timeout)
            .await?;

        tracing::info!("Application initialized ({} services)", container.service_count());
        Ok(Application {
            config,
            container: Arc::new(container),
            shutdown: CancellationToken::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_wires_mediator_and_seeds() {
        let app = Application::builder()
            .config(AppConfig {
                seed_users: 3,
                ..AppConfig::default()
            })
            .build()
            .await
            .unwrap();

        assert!(app.container().contains::<Mediator>());
        assert!(app.container().contains::<AppConfig>());

        let users = app.container().resolve::<UserService>().unwrap();
        let cancel = CancellationToken::new();
        assert_eq!(users.count(&cancel).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn request_tokens_follow_shutdown() {
        let app = Application::builder().build().await.unwrap();
        let state = AppState::new(Arc::clone(app.container()), app.shutdown_token().clone());
        let token = state.request_token();

        assert!(!token.is_cancelled());
        app.shutdown_token().cancel();
        assert!(token.is_cancelled());
    }
}
