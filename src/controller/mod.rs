//! HTTP surface. Handlers translate requests into mediator messages and
//! leave every failure to [`RosterError`](crate::error::RosterError)'s
//! problem-details response.

use crate::di::{Container, HasContainer};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub mod users;

/// Router state: the wired container plus the application shutdown token.
#[derive(Clone)]
pub struct AppState {
    container: Arc<Container>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(container: Arc<Container>, shutdown: CancellationToken) -> Self {
        Self {
            container,
            shutdown,
        }
    }

    /// A token for one request, cancelled when the application shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

impl HasContainer for AppState {
    fn get_container(&self) -> &Container {
        &self.container
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(users::health))
        .merge(users::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
