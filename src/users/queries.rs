use crate::Injectable;
use crate::common::PaginatedDto;
use crate::error::{Result, RosterError};
use crate::persistence::EntityId;
use crate::pipe::{RuleSet, rules};
use crate::pipeline::{Request, RequestHandler};
use crate::users::dto::to_dtos;
use crate::users::{UserDto, UserService};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_ITEMS_PER_PAGE: i32 = 10;

fn default_items_per_page() -> i32 {
    DEFAULT_ITEMS_PER_PAGE
}

/// One page of users. Pages are numbered from 1; the default page number
/// of 0 is rejected by validation so callers must ask for a page explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default)]
    pub page_number: i32,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: i32,
}

impl ListUsersQuery {
    pub fn new(page_number: i32, items_per_page: i32) -> Self {
        Self {
            page_number,
            items_per_page,
        }
    }
}

impl Request for ListUsersQuery {
    type Response = PaginatedDto<Vec<UserDto>>;
}

pub fn list_users_rules() -> RuleSet<ListUsersQuery> {
    RuleSet::new()
        .rule(
            rules::greater_than("PageNumber", |q: &ListUsersQuery| q.page_number, 0)
                .with_message("PageNumber must be greater than 0"),
        )
        .rule(rules::greater_than(
            "ItemsPerPage",
            |q: &ListUsersQuery| q.items_per_page,
            0,
        ))
}

#[derive(Injectable)]
pub struct ListUsersHandler {
    users: Arc<UserService>,
}

#[async_trait]
impl RequestHandler<ListUsersQuery> for ListUsersHandler {
    async fn handle(
        &self,
        query: ListUsersQuery,
        cancel: &CancellationToken,
    ) -> Result<PaginatedDto<Vec<UserDto>>> {
        let page_number = positive("PageNumber", query.page_number)?;
        let items_per_page = positive("ItemsPerPage", query.items_per_page)?;

        let users = self
            .users
            .get_paginated(page_number, items_per_page, cancel)
            .await?;
        let total = self.users.count(cancel).await?;

        Ok(PaginatedDto::new(
            to_dtos(users),
            page_number,
            items_per_page,
            total,
        ))
    }
}

fn positive(property: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| RosterError::BadRequest(format!("{property} must be greater than 0")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GetUserQuery {
    pub id: EntityId,
}

impl Request for GetUserQuery {
    type Response = UserDto;
}

#[derive(Injectable)]
pub struct GetUserHandler {
    users: Arc<UserService>,
}

#[async_trait]
impl RequestHandler<GetUserQuery> for GetUserHandler {
    async fn handle(&self, query: GetUserQuery, cancel: &CancellationToken) -> Result<UserDto> {
        self.users
            .get(query.id, cancel)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| RosterError::not_found("User", query.id))
    }
}

/// Users matching either name exactly. Blank filters count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUsersQuery {
    pub given_names: Option<String>,
    pub last_name: Option<String>,
}

impl FindUsersQuery {
    fn given_names(&self) -> Option<&str> {
        non_blank(self.given_names.as_deref())
    }

    fn last_name(&self) -> Option<&str> {
        non_blank(self.last_name.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Request for FindUsersQuery {
    type Response = Vec<UserDto>;
}

pub fn find_users_rules() -> RuleSet<FindUsersQuery> {
    RuleSet::new().rule(rules::must(
        "GivenNames",
        "Either GivenNames or LastName must be supplied",
        |q: &FindUsersQuery| q.given_names().is_some() || q.last_name().is_some(),
    ))
}

#[derive(Injectable)]
pub struct FindUsersHandler {
    users: Arc<UserService>,
}

#[async_trait]
impl RequestHandler<FindUsersQuery> for FindUsersHandler {
    async fn handle(
        &self,
        query: FindUsersQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<UserDto>> {
        let users = self
            .users
            .find(query.given_names(), query.last_name(), cancel)
            .await?;
        Ok(to_dtos(users))
    }
}
