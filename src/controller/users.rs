use crate::common::PaginatedDto;
use crate::controller::AppState;
use crate::di::Inject;
use crate::error::{Result, RosterError};
use crate::persistence::EntityId;
use crate::pipeline::Mediator;
use crate::users::{
    CreateUserCommand, DeleteUserCommand, FindUsersQuery, GetUserQuery, ListUsersQuery,
    UpdateUserCommand, UserDto,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type QueryParams<T> = std::result::Result<Query<T>, QueryRejection>;
type IdParam = std::result::Result<Path<EntityId>, PathRejection>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/search", get(find_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_users(
    State(state): State<AppState>,
    Inject(mediator): Inject<Mediator>,
    query: QueryParams<ListUsersQuery>,
) -> Result<Json<PaginatedDto<Vec<UserDto>>>> {
    let Query(query) = query.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    let page = mediator.send(query, &state.request_token()).await?;
    Ok(Json(page))
}

async fn find_users(
    State(state): State<AppState>,
    Inject(mediator): Inject<Mediator>,
    query: QueryParams<FindUsersQuery>,
) -> Result<Json<Vec<UserDto>>> {
    let Query(query) = query.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    let users = mediator.send(query, &state.request_token()).await?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    Inject(mediator): Inject<Mediator>,
    id: IdParam,
) -> Result<Json<UserDto>> {
    let Path(id) = id.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    let user = mediator
        .send(GetUserQuery { id }, &state.request_token())
        .await?;
    Ok(Json(user))
}

async fn create_user(
    State(state): State<AppState>,
    Inject(mediator): Inject<Mediator>,
    body: JsonBody<CreateUserCommand>,
) -> Result<(StatusCode, Json<UserDto>)> {
    let Json(command) = body.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    let user = mediator.send(command, &state.request_token()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// The path id wins over any id in the body.
async fn update_user(
    State(state): State<AppState>,
    Inject(mediator): Inject<Mediator>,
    id: IdParam,
    body: JsonBody<UpdateUserCommand>,
) -> Result<Json<UserDto>> {
    let Path(id) = id.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    let Json(mut command) = body.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    command.id = id;
    let user = mediator.send(command, &state.request_token()).await?;
    Ok(Json(user))
}

/// 200 with the removed user, or 204 when there was nothing to remove.
async fn delete_user(
    State(state): State<AppState>,
    Inject(mediator): Inject<Mediator>,
    id: IdParam,
) -> Result<Response> {
    let Path(id) = id.map_err(|e| RosterError::BadRequest(e.body_text()))?;
    let removed = mediator
        .send(DeleteUserCommand { id }, &state.request_token())
        .await?;
    Ok(match removed {
        Some(user) => Json(user).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
