use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::api::schemas::{ErrorResponse, SuccessResponse};
use crate::modules::auth::application::use_cases::issue_token::{
    IssueTokenError, IssueTokenInput,
};
use crate::shared::api::ApiResponse;
use crate::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct IssueTokenRequest {
    #[schema(example = "alice")]
    pub username: String,

    /// Code received by email after signup
    pub confirmation_code: String,
}

#[derive(Serialize, ToSchema)]
pub struct IssueTokenResponse {
    /// Bearer token for the Authorization header
    pub token: String,
}

fn map_issue_token_error(err: IssueTokenError, username: &str) -> HttpResponse {
    match &err {
        IssueTokenError::UserNotFound => {
            warn!(username = %username, "Token requested for unknown user");
            ApiResponse::not_found("USER_NOT_FOUND", "User not found")
        }

        IssueTokenError::InvalidCode => {
            warn!(username = %username, "Invalid confirmation code");
            ApiResponse::bad_request("INVALID_CONFIRMATION_CODE", "Invalid confirmation code")
        }

        other => {
            error!(username = %username, error = %other, "Token issuance failed");
            ApiResponse::internal_error()
        }
    }
}

/// Exchange a confirmation code for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "auth",
    request_body = IssueTokenRequest,
    responses(
        (status = 200, description = "Token minted", body = inline(SuccessResponse<IssueTokenResponse>)),
        (status = 400, description = "Invalid confirmation code", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
    )
)]
#[post("/api/v1/auth/token")]
pub async fn issue_token_handler(
    req: web::Json<IssueTokenRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let result = data
        .issue_token_use_case
        .execute(IssueTokenInput {
            username: req.username.clone(),
            confirmation_code: req.confirmation_code.clone(),
        })
        .await;

    match result {
        Ok(token) => {
            info!(username = %req.username, "Bearer token issued");
            ApiResponse::success(IssueTokenResponse { token })
        }
        Err(e) => map_issue_token_error(e, &req.username),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::application::use_cases::issue_token::IIssueTokenUseCase;
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct MockIssueToken {
        accept_code: &'static str,
    }

    #[async_trait]
    impl IIssueTokenUseCase for MockIssueToken {
        async fn execute(&self, input: IssueTokenInput) -> Result<String, IssueTokenError> {
            if input.username != "alice" {
                return Err(IssueTokenError::UserNotFound);
            }
            if input.confirmation_code != self.accept_code {
                return Err(IssueTokenError::InvalidCode);
            }
            Ok("signed.bearer.token".to_string())
        }
    }

    fn app_state() -> actix_web::web::Data<crate::AppState> {
        TestAppStateBuilder::default()
            .with_issue_token(Arc::new(MockIssueToken { accept_code: "C" }))
            .build()
    }

    fn request(username: &str, code: &str) -> IssueTokenRequest {
        IssueTokenRequest {
            username: username.to_string(),
            confirmation_code: code.to_string(),
        }
    }

    #[actix_web::test]
    async fn valid_code_yields_token() {
        let app =
            test::init_service(App::new().app_data(app_state()).service(issue_token_handler))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_json(request("alice", "C"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["token"], "signed.bearer.token");
    }

    #[actix_web::test]
    async fn wrong_code_is_400_without_token() {
        let app =
            test::init_service(App::new().app_data(app_state()).service(issue_token_handler))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_json(request("alice", "wrong"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_CONFIRMATION_CODE");
        assert!(body.get("data").is_none());
    }

    #[actix_web::test]
    async fn unknown_user_is_404() {
        let app =
            test::init_service(App::new().app_data(app_state()).service(issue_token_handler))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/token")
            .set_json(request("ghost", "C"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
