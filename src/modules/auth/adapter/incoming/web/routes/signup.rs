use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::auth::application::use_cases::signup::{SignupError, SignupInput};
use crate::shared::api::ApiResponse;
use crate::AppState;

/// Request body for signup
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Username (identifier pattern, `me` is reserved)
    #[schema(example = "alice")]
    pub username: String,

    /// Email address the confirmation code is sent to
    #[schema(example = "alice@example.com")]
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct SignupResponse {
    #[schema(example = "alice")]
    pub username: String,

    #[schema(example = "alice@example.com")]
    pub email: String,
}

fn map_signup_error(err: SignupError, req: &SignupRequest) -> HttpResponse {
    match &err {
        SignupError::InvalidUsername(msg) => {
            warn!(username = %req.username, error = %err, "Invalid signup input");
            ApiResponse::bad_request("INVALID_USERNAME", msg)
        }

        SignupError::InvalidEmail(msg) => {
            warn!(username = %req.username, error = %err, "Invalid signup input");
            ApiResponse::bad_request("INVALID_EMAIL", msg)
        }

        SignupError::Conflict => {
            warn!(
                username = %req.username,
                email = %req.email,
                "Signup conflict"
            );
            // The username and email collisions are deliberately conflated.
            ApiResponse::conflict("USERNAME_OR_EMAIL_TAKEN", "Invalid username or email")
        }

        other => {
            error!(username = %req.username, error = %other, "Unhandled signup error");
            ApiResponse::internal_error()
        }
    }
}

/// Register (or re-register) a user
///
/// Creates the account if the (username, email) pair is new, and emails a
/// confirmation code either way. Repeating the call with the same pair
/// re-issues a code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (
            status = 200,
            description = "User pending confirmation",
            body = inline(SuccessResponse<SignupResponse>),
            example = json!({
                "success": true,
                "data": { "username": "alice", "email": "alice@example.com" }
            })
        ),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email taken by another account", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[post("/api/v1/auth/signup")]
pub async fn signup_handler(
    req: web::Json<SignupRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!(username = %req.username, email = %req.email, "Signup attempt");

    let result = data
        .signup_use_case
        .execute(SignupInput {
            username: req.username.clone(),
            email: req.email.clone(),
        })
        .await;

    match result {
        Ok(out) => {
            info!(username = %out.username, "Signup accepted, confirmation code dispatched");
            ApiResponse::success(SignupResponse {
                username: out.username,
                email: out.email,
            })
        }
        Err(e) => map_signup_error(e, &req),
    }
}
