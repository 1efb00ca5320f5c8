use crate::di::Container;

/// Builder for constructing a dependency injection container
///
/// Holds the services that exist before any module is wired, such as the
/// application config.
///
/// # Example
/// ```rust,ignore
/// let mut container = ContainerBuilder::new().register(config).build();
/// UsersModule::register(&mut container)?;
/// ```
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a service instance
    pub fn register<T: 'static + Send + Sync>(mut self, instance: T) -> Self {
        self.container.register(instance);
        self
    }

    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
