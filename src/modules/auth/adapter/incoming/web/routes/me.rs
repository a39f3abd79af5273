use actix_web::{get, patch, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::AuthenticatedUser;
use crate::modules::auth::adapter::incoming::web::routes::users::UserResponse;
use crate::modules::auth::application::use_cases::own_profile::{
    OwnProfileError, OwnProfilePatch,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Self-service profile update. There is no role field here: a user can
/// never change their own role.
#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn map_own_profile_error(err: OwnProfileError) -> HttpResponse {
    match &err {
        OwnProfileError::NotFound => {
            ApiResponse::unauthorized("UNKNOWN_USER", "Token subject no longer exists")
        }
        OwnProfileError::InvalidUsername(msg) => ApiResponse::bad_request("INVALID_USERNAME", msg),
        OwnProfileError::InvalidEmail(msg) => ApiResponse::bad_request("INVALID_EMAIL", msg),
        OwnProfileError::Conflict => {
            ApiResponse::conflict("USER_ALREADY_EXISTS", "Username or email already taken")
        }
        other => {
            error!(error = %other, "Own-profile operation failed");
            ApiResponse::internal_error()
        }
    }
}

/// Fetch the caller's own record
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Caller's record"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
#[get("/api/v1/users/me")]
pub async fn own_profile_handler(
    auth: AuthenticatedUser,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.own_profile_use_case.get(auth.user_id).await {
        Ok(user) => ApiResponse::success(UserResponse::from(user)),
        Err(e) => map_own_profile_error(e),
    }
}

/// Update the caller's own record (role untouched)
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated record"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
#[patch("/api/v1/users/me")]
pub async fn update_own_profile_handler(
    auth: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let patch = OwnProfilePatch {
        username: req.username.clone(),
        email: req.email.clone(),
        bio: req.bio.clone(),
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
    };

    match data.own_profile_use_case.update(auth.user_id, patch).await {
        Ok(user) => ApiResponse::success(UserResponse::from(user)),
        Err(e) => map_own_profile_error(e),
    }
}
