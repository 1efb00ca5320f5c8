use crate::di::Container;
use crate::error::Result;
use crate::pipeline::Mediator;

/// A feature slice of the application.
///
/// `register` adds the module's providers and validators to the container;
/// `configure` then registers one pipeline per request type with the mediator,
/// resolving handlers from the finished container.
///
/// # Example
/// ```rust,ignore
/// let mut container = Container::new();
/// UsersModule::register(&mut container)?;
/// let mediator = Mediator::new();
/// UsersModule::configure(&container, &mediator)?;
/// ```
pub trait Module {
    fn register(container: &mut Container) -> Result<()>;

    fn configure(container: &Container, mediator: &Mediator) -> Result<()>;
}
