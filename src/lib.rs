//! # Roster
//!
//! A user directory service. Every HTTP call becomes a command or query sent
//! through a [`Mediator`](pipeline::Mediator) pipeline:
//!
//! - **Logging** wraps each request with timing.
//! - **Validation** runs every registered rule set and aggregates failures.
//! - **Handlers** work against an injected [`UserService`](users::UserService).
//! - **Problem details**: every [`RosterError`] becomes an
//!   `application/problem+json` response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster::config::{AppConfig, init_tracing};
//! use roster::lifecycle::Application;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     init_tracing(config.log_format);
//!
//!     let app = Application::builder().config(config).build().await?;
//!     let listener = tokio::net::TcpListener::bind(app.config().bind_address()).await?;
//!     app.serve(listener).await?;
//!     Ok(())
//! }
//! ```

// Lets `#[derive(Injectable)]` expand to `::roster::...` paths inside this crate too.
extern crate self as roster;

pub mod common;
pub mod config;
pub mod controller;
pub mod di;
pub mod error;
pub mod exception;
pub mod lifecycle;
pub mod module;
pub mod persistence;
pub mod pipe;
pub mod pipeline;
pub mod users;

pub use di::{Container, ContainerBuilder, HasContainer, Inject, Injectable};
pub use error::{Result, RosterError, ValidationFailure};
pub use module::Module;
pub use roster_macro::Injectable;

pub use async_trait::async_trait;
pub use axum;

/// ```
/// use roster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::common::PaginatedDto;
    pub use crate::config::{AppConfig, ConfigService, LogFormat};
    pub use crate::di::{Container, ContainerBuilder, HasContainer, Inject, Injectable};
    pub use crate::error::{Result, RosterError, ValidationFailure};
    pub use crate::exception::{ExceptionFilter, ProblemDetails, ProblemDetailsFilter};
    pub use crate::lifecycle::{
        Application, ApplicationBuilder, LifecycleError, LifecycleManager, OnModuleInit,
        shutdown_signal,
    };
    pub use crate::module::Module;
    pub use crate::persistence::{Entity, EntityId, InMemoryRepository, Repository};
    pub use crate::pipe::{Rule, RuleSet, Validator, rules};
    pub use crate::pipeline::{Mediator, Next, Pipeline, PipelineBehavior, Request, RequestHandler};
    pub use async_trait::async_trait;
    pub use roster_macro::Injectable;
    pub use std::sync::Arc;
    pub use tokio_util::sync::CancellationToken;
}
