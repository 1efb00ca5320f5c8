use crate::Injectable;
use crate::error::{Result, RosterError};
use crate::persistence::EntityId;
use crate::pipe::{RuleSet, rules};
use crate::pipeline::{Request, RequestHandler};
use crate::users::{UpdateOutcome, User, UserDto, UserService};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserCommand {
    pub given_names: String,
    pub last_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

impl Request for CreateUserCommand {
    type Response = UserDto;
}

pub fn create_user_rules() -> RuleSet<CreateUserCommand> {
    RuleSet::new()
        .rule(rules::not_empty("GivenNames", |c: &CreateUserCommand| {
            c.given_names.as_str()
        }))
        .rule(rules::not_empty("LastName", |c: &CreateUserCommand| {
            c.last_name.as_str()
        }))
        .rule(rules::not_empty("EmailAddress", |c: &CreateUserCommand| {
            c.email_address.as_str()
        }))
        .rule(rules::not_empty("MobileNumber", |c: &CreateUserCommand| {
            c.mobile_number.as_str()
        }))
}

#[derive(Injectable)]
pub struct CreateUserHandler {
    users: Arc<UserService>,
}

#[async_trait]
impl RequestHandler<CreateUserCommand> for CreateUserHandler {
    async fn handle(
        &self,
        command: CreateUserCommand,
        cancel: &CancellationToken,
    ) -> Result<UserDto> {
        let user = User::new(
            command.given_names,
            command.last_name,
            command.email_address,
            command.mobile_number,
        );
        let stored = self.users.add(user, cancel).await?;
        Ok(stored.into())
    }
}

/// Replaces every field of an existing user. Over HTTP the id comes from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserCommand {
    pub id: EntityId,
    pub given_names: String,
    pub last_name: String,
    pub email_address: String,
    pub mobile_number: String,
}

impl Request for UpdateUserCommand {
    type Response = UserDto;
}

/// Field rules plus an existence check against the store.
pub fn update_user_rules(users: Arc<UserService>) -> RuleSet<UpdateUserCommand> {
    RuleSet::new()
        .rule(rules::not_empty("GivenNames", |c: &UpdateUserCommand| {
            c.given_names.as_str()
        }))
        .rule(rules::not_empty("LastName", |c: &UpdateUserCommand| {
            c.last_name.as_str()
        }))
        .rule(rules::not_empty("EmailAddress", |c: &UpdateUserCommand| {
            c.email_address.as_str()
        }))
        .rule(rules::not_empty("MobileNumber", |c: &UpdateUserCommand| {
            c.mobile_number.as_str()
        }))
        .rule(rules::not_default("Id", |c: &UpdateUserCommand| c.id))
        .rule(rules::must_async(
            "Id",
            "User not exists",
            |c: &UpdateUserCommand| c.id,
            move |id: EntityId, cancel: CancellationToken| {
                let users = users.clone();
                async move { users.exists_by_id(id, &cancel).await }
            },
        ))
}

#[derive(Injectable)]
pub struct UpdateUserHandler {
    users: Arc<UserService>,
}

#[async_trait]
impl RequestHandler<UpdateUserCommand> for UpdateUserHandler {
    async fn handle(
        &self,
        command: UpdateUserCommand,
        cancel: &CancellationToken,
    ) -> Result<UserDto> {
        let id = command.id;
        let user = User::new(
            command.given_names,
            command.last_name,
            command.email_address,
            command.mobile_number,
        )
        .with_id(id);

        // The existence rule ran earlier, but the user may have been deleted since.
        match self.users.update(user, cancel).await? {
            UpdateOutcome::Updated(user) => Ok(user.into()),
            UpdateOutcome::NotFound => Err(RosterError::not_found("User", id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteUserCommand {
    pub id: EntityId,
}

impl Request for DeleteUserCommand {
    type Response = Option<UserDto>;
}

#[derive(Injectable)]
pub struct DeleteUserHandler {
    users: Arc<UserService>,
}

#[async_trait]
impl RequestHandler<DeleteUserCommand> for DeleteUserHandler {
    async fn handle(
        &self,
        command: DeleteUserCommand,
        cancel: &CancellationToken,
    ) -> Result<Option<UserDto>> {
        let removed = self.users.delete(command.id, cancel).await?;
        Ok(removed.map(UserDto::from))
    }
}
