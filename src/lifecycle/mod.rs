//! Application startup and shutdown.
//!
//! ```text
//! 1. Configuration loading
//! 2. Container creation and module registration
//! 3. Mediator pipelines
//! 4. OnModuleInit hooks (e.g. seeding)
//! 5. Server start
//! 6. Shutdown signal: request tokens cancelled, connections drained
//! ```

mod application;
mod error;
mod manager;
mod shutdown;
mod traits;

pub use application::{Application, ApplicationBuilder};
pub use error::{LifecycleError, Result};
pub use manager::LifecycleManager;
pub use shutdown::shutdown_signal;
pub use traits::OnModuleInit;
