//! The user directory: records, use cases and their wiring.

use crate::di::{Container, Injectable};
use crate::error::Result;
use crate::module::Module;
use crate::persistence::{InMemoryRepository, Repository};
use crate::pipeline::Mediator;
use std::sync::Arc;

pub mod commands;
pub mod domain;
pub mod dto;
pub mod queries;
pub mod seed;
pub mod service;

pub use commands::{
    CreateUserCommand, CreateUserHandler, DeleteUserCommand, DeleteUserHandler,
    UpdateUserCommand, UpdateUserHandler,
};
pub use domain::{ContactDetail, UpdateOutcome, User};
pub use dto::UserDto;
pub use queries::{
    FindUsersHandler, FindUsersQuery, GetUserHandler, GetUserQuery, ListUsersHandler,
    ListUsersQuery,
};
pub use seed::UserSeeder;
pub use service::UserService;

pub struct UsersModule;

impl Module for UsersModule {
    fn register(container: &mut Container) -> Result<()> {
        container
            .register(InMemoryRepository::<User>::new())
            .bind::<dyn Repository<User>, InMemoryRepository<User>, _>(|repository| {
                repository as Arc<dyn Repository<User>>
            });

        let users = Arc::new(UserService::inject(container)?);
        container
            .register_arc(Arc::clone(&users))
            .register_validator::<CreateUserCommand, _>(commands::create_user_rules())
            .register_validator::<UpdateUserCommand, _>(commands::update_user_rules(users))
            .register_validator::<ListUsersQuery, _>(queries::list_users_rules())
            .register_validator::<FindUsersQuery, _>(queries::find_users_rules());
        Ok(())
    }

    fn configure(container: &Container, mediator: &Mediator) -> Result<()> {
        mediator
            .register(CreateUserHandler::inject(container)?, container)
            .register(UpdateUserHandler::inject(container)?, container)
            .register(DeleteUserHandler::inject(container)?, container)
            .register(ListUsersHandler::inject(container)?, container)
            .register(GetUserHandler::inject(container)?, container)
            .register(FindUsersHandler::inject(container)?, container);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use tokio_util::sync::CancellationToken;

    fn wired() -> (Container, Mediator) {
        let mut container = Container::new();
        UsersModule::register(&mut container).unwrap();
        let mediator = Mediator::new();
        UsersModule::configure(&container, &mediator).unwrap();
        (container, mediator)
    }

    #[test]
    fn registers_every_use_case() {
        let (container, mediator) = wired();
        assert!(container.contains::<UserService>());
        assert!(container.contains::<dyn Repository<User>>());
        assert!(mediator.handles::<CreateUserCommand>());
        assert!(mediator.handles::<UpdateUserCommand>());
        assert!(mediator.handles::<DeleteUserCommand>());
        assert!(mediator.handles::<ListUsersQuery>());
        assert!(mediator.handles::<GetUserQuery>());
        assert!(mediator.handles::<FindUsersQuery>());
    }

    #[tokio::test]
    async fn create_then_update_through_the_mediator() {
        let (_container, mediator) = wired();
        let cancel = CancellationToken::new();

        let created = mediator
            .send(
                CreateUserCommand {
                    given_names: "Ada".into(),
                    last_name: "Lovelace".into(),
                    email_address: "ada@example.com".into(),
                    mobile_number: "0400000001".into(),
                },
                &cancel,
            )
            .await
            .unwrap();

        let updated = mediator
            .send(
                UpdateUserCommand {
                    id: created.user_id,
                    given_names: "A".into(),
                    last_name: "B".into(),
                    email_address: "a@b.com".into(),
                    mobile_number: "123".into(),
                },
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(updated.email_address, "a@b.com");

        let fetched = mediator
            .send(GetUserQuery { id: created.user_id }, &cancel)
            .await
            .unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn invalid_update_never_reaches_the_store() {
        let (container, mediator) = wired();
        let cancel = CancellationToken::new();

        let err = mediator
            .send(
                UpdateUserCommand {
                    id: 1,
                    ..Default::default()
                },
                &cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Validation(ref failures) if failures.len() == 5));

        let users = container.resolve::<UserService>().unwrap();
        assert_eq!(users.count(&cancel).await.unwrap(), 0);
    }
}
