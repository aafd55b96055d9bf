use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{CreateUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(UserResponse, CreateUser),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// List all users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All users in creation order", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.get_all_users().await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user_by_id(id).await?;
    Ok(Json(user))
}

/// Replace a user's username, email and age
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "User ID")),
    request_body = CreateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
