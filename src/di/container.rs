use crate::error::{Result, RosterError};
use crate::pipe::Validator;
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

type Shared = Arc<dyn Any + Send + Sync>;

/// Turns a stored implementation into an `Arc<Arc<dyn Trait>>` erased as `Any`.
type CasterFn = Arc<dyn Fn(Shared) -> Option<Shared> + Send + Sync>;

/// Thread-safe dependency injection container.
///
/// Holds one shared instance per concrete type, trait bindings that map a
/// `dyn Trait` onto a registered implementation, and for every request type
/// the ordered list of validators that guard it.
#[derive(Clone, Default)]
pub struct Container {
    services: DashMap<TypeId, Shared>,
    bindings: DashMap<TypeId, (TypeId, CasterFn)>,
    validators: DashMap<TypeId, Vec<Shared>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.register_arc(Arc::new(instance))
    }

    /// Registers an instance that is already shared elsewhere.
    pub fn register_arc<T: 'static + Send + Sync>(&mut self, instance: Arc<T>) -> &mut Self {
        self.services.insert(TypeId::of::<T>(), instance);
        self
    }

    /// Binds `dyn Trait` to the registered `Impl`, so `resolve_trait::<dyn Trait>()`
    /// hands out the implementation through `cast`.
    pub fn bind<Trait, Impl, F>(&mut self, cast: F) -> &mut Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let caster: CasterFn = Arc::new(move |instance: Shared| {
            let concrete = instance.downcast::<Impl>().ok()?;
            let trait_obj: Arc<Trait> = cast(concrete);
            Some(Arc::new(trait_obj) as Shared)
        });
        self.bindings
            .insert(TypeId::of::<Trait>(), (TypeId::of::<Impl>(), caster));
        self
    }

    /// Appends a validator to the list guarding request type `R`.
    pub fn register_validator<R, V>(&mut self, validator: V) -> &mut Self
    where
        R: Send + Sync + 'static,
        V: Validator<R>,
    {
        let validator: Arc<dyn Validator<R>> = Arc::new(validator);
        self.validators
            .entry(TypeId::of::<R>())
            .or_default()
            .push(Arc::new(validator));
        self
    }

    /// Every validator registered for `R`, in registration order.
    pub fn validators<R: Send + Sync + 'static>(&self) -> Vec<Arc<dyn Validator<R>>> {
        self.validators
            .get(&TypeId::of::<R>())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.downcast_ref::<Arc<dyn Validator<R>>>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let instance = self
            .services
            .get(&TypeId::of::<T>())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RosterError::DependencyNotFound {
                type_name: type_name::<T>().to_string(),
            })?;

        instance
            .downcast::<T>()
            .map_err(|_| RosterError::DowncastFailed {
                type_name: type_name::<T>().to_string(),
            })
    }

    pub fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let (impl_id, caster) = self
            .bindings
            .get(&TypeId::of::<T>())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RosterError::DependencyNotFound {
                type_name: format!("No binding found for trait '{}'", type_name::<T>()),
            })?;

        let instance = self
            .services
            .get(&impl_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RosterError::DependencyNotFound {
                type_name: format!(
                    "Implementation for trait '{}' not registered",
                    type_name::<T>()
                ),
            })?;

        let wrapper = caster(instance)
            .and_then(|cast| cast.downcast::<Arc<T>>().ok())
            .ok_or_else(|| RosterError::DowncastFailed {
                type_name: type_name::<T>().to_string(),
            })?;
        Ok(wrapper.as_ref().clone())
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.services.contains_key(&type_id) || self.bindings.contains_key(&type_id)
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    struct Settings {
        page_size: u32,
    }

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct EnglishGreeter {
        name: String,
    }

    impl Greeter for EnglishGreeter {
        fn greet(&self) -> String {
            format!("Hello, {}", self.name)
        }
    }

    struct Ping;

    struct AlwaysFails(&'static str);

    #[async_trait]
    impl Validator<Ping> for AlwaysFails {
        async fn validate(
            &self,
            _request: &Ping,
            _cancel: &CancellationToken,
        ) -> Result<Vec<ValidationFailure>> {
            Ok(vec![ValidationFailure::new("Ping", self.0)])
        }
    }

    #[test]
    fn register_and_resolve() {
        let mut container = Container::new();
        container.register(Settings { page_size: 10 });
        let settings = container.resolve::<Settings>().unwrap();
        assert_eq!(settings.page_size, 10);
        assert!(container.contains::<Settings>());
    }

    #[test]
    fn resolve_missing_service_reports_type_name() {
        let container = Container::new();
        match container.resolve::<Settings>() {
            Err(RosterError::DependencyNotFound { type_name }) => {
                assert!(type_name.ends_with("Settings"));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn bind_and_resolve_trait() {
        let mut container = Container::new();
        container.register(EnglishGreeter {
            name: "Ada".to_string(),
        });
        container.bind::<dyn Greeter, EnglishGreeter, _>(|g| g as Arc<dyn Greeter>);
        let greeter = container.resolve_trait::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "Hello, Ada");
    }

    #[test]
    fn binding_without_implementation_fails() {
        let mut container = Container::new();
        container.bind::<dyn Greeter, EnglishGreeter, _>(|g| g as Arc<dyn Greeter>);
        assert!(matches!(
            container.resolve_trait::<dyn Greeter>(),
            Err(RosterError::DependencyNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn validators_keep_registration_order() {
        let mut container = Container::new();
        container
            .register_validator::<Ping, _>(AlwaysFails("first"))
            .register_validator::<Ping, _>(AlwaysFails("second"));

        let validators = container.validators::<Ping>();
        assert_eq!(validators.len(), 2);

        let cancel = CancellationToken::new();
        let mut messages = Vec::new();
        for validator in validators {
            for failure in validator.validate(&Ping, &cancel).await.unwrap() {
                messages.push(failure.message);
            }
        }
        assert_eq!(messages, ["first", "second"]);
        assert!(container.validators::<Settings>().is_empty());
    }
}
