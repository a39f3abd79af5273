use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::{
    resolve_caller, AuthenticatedUser,
};
use crate::modules::auth::application::domain::entities::{Role, User};
use crate::modules::auth::application::ports::outgoing::UserPatch;
use crate::modules::auth::application::use_cases::manage_users::{
    AdminCreateUserInput, ManageUsersError,
};
use crate::shared::api::ApiResponse;
use crate::shared::pagination::PageRequest;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[schema(example = "user")]
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UsersPageResponse {
    pub items: Vec<UserResponse>,
    pub total: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Defaults to `user`
    pub role: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Username substring
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

fn map_manage_users_error(err: ManageUsersError) -> HttpResponse {
    match &err {
        ManageUsersError::Forbidden => {
            ApiResponse::forbidden("FORBIDDEN", "Admin privileges required")
        }
        ManageUsersError::NotFound => ApiResponse::not_found("USER_NOT_FOUND", "User not found"),
        ManageUsersError::InvalidUsername(msg) => {
            ApiResponse::bad_request("INVALID_USERNAME", msg)
        }
        ManageUsersError::InvalidEmail(msg) => ApiResponse::bad_request("INVALID_EMAIL", msg),
        ManageUsersError::Conflict => {
            ApiResponse::conflict("USER_ALREADY_EXISTS", "Username or email already taken")
        }
        other => {
            error!(error = %other, "User administration failed");
            ApiResponse::internal_error()
        }
    }
}

fn parse_role(value: &Option<String>) -> Result<Option<Role>, HttpResponse> {
    match value {
        None => Ok(None),
        Some(raw) => match Role::parse(raw) {
            Some(role) => Ok(Some(role)),
            None => {
                warn!(role = %raw, "Unknown role in request");
                Err(ApiResponse::bad_request("INVALID_ROLE", "Unknown role"))
            }
        },
    }
}

/// List users (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
    )
)]
#[get("/api/v1/users")]
pub async fn list_users_handler(
    auth: AuthenticatedUser,
    query: web::Query<ListUsersQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let page = PageRequest::new(query.limit, query.offset);
    match data
        .manage_users_use_case
        .list(&caller, query.search.as_deref(), page)
        .await
    {
        Ok(page) => ApiResponse::success(UsersPageResponse {
            items: page.items.into_iter().map(UserResponse::from).collect(),
            total: page.total,
        }),
        Err(e) => map_manage_users_error(e),
    }
}

/// Create a user directly (admin)
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse),
    )
)]
#[post("/api/v1/users")]
pub async fn create_user_handler(
    auth: AuthenticatedUser,
    req: web::Json<CreateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let role = match parse_role(&req.role) {
        Ok(role) => role.unwrap_or_default(),
        Err(resp) => return resp,
    };

    let input = AdminCreateUserInput {
        username: req.username.clone(),
        email: req.email.clone(),
        role,
        bio: req.bio.clone(),
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
    };

    match data.manage_users_use_case.create(&caller, input).await {
        Ok(user) => ApiResponse::created(UserResponse::from(user)),
        Err(e) => map_manage_users_error(e),
    }
}

/// Fetch a user by username (admin)
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "users",
    responses(
        (status = 200, description = "User record"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
    )
)]
#[get("/api/v1/users/{username}")]
pub async fn get_user_handler(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data
        .manage_users_use_case
        .get(&caller, &path.into_inner())
        .await
    {
        Ok(user) => ApiResponse::success(UserResponse::from(user)),
        Err(e) => map_manage_users_error(e),
    }
}

/// Patch a user, including their role (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{username}",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated record"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
    )
)]
#[patch("/api/v1/users/{username}")]
pub async fn update_user_handler(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let role = match parse_role(&req.role) {
        Ok(role) => role,
        Err(resp) => return resp,
    };

    let patch = UserPatch {
        username: req.username.clone(),
        email: req.email.clone(),
        role,
        bio: req.bio.clone(),
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
    };

    match data
        .manage_users_use_case
        .update(&caller, &path.into_inner(), patch)
        .await
    {
        Ok(user) => ApiResponse::success(UserResponse::from(user)),
        Err(e) => map_manage_users_error(e),
    }
}

/// Delete a user (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{username}",
    tag = "users",
    responses(
        (status = 204, description = "User removed"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
    )
)]
#[delete("/api/v1/users/{username}")]
pub async fn delete_user_handler(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data
        .manage_users_use_case
        .delete(&caller, &path.into_inner())
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_manage_users_error(e),
    }
}
