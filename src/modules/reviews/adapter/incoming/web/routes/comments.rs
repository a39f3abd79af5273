use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::{
    resolve_caller, AuthenticatedUser,
};
use crate::modules::reviews::application::domain::entities::Comment;
use crate::modules::reviews::application::ports::outgoing::CommentPatch;
use crate::modules::reviews::application::use_cases::comments::CommentError;
use crate::shared::api::{ApiResponse, PageQuery};
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    /// Author's username; always server-assigned
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author: comment.author_username,
            pub_date: comment.pub_date,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CommentsPageResponse {
    pub items: Vec<CommentResponse>,
    pub total: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

fn map_comment_error(err: CommentError) -> HttpResponse {
    match &err {
        CommentError::Unauthenticated => {
            ApiResponse::unauthorized("NOT_AUTHENTICATED", "Authentication required")
        }
        CommentError::Forbidden => ApiResponse::forbidden(
            "FORBIDDEN",
            "Only the author, a moderator or an admin may do this",
        ),
        CommentError::InvalidText(msg) => ApiResponse::bad_request("INVALID_TEXT", msg),
        CommentError::ReviewNotFound => {
            ApiResponse::not_found("REVIEW_NOT_FOUND", "Review not found")
        }
        CommentError::CommentNotFound => {
            ApiResponse::not_found("COMMENT_NOT_FOUND", "Comment not found")
        }
        other => {
            error!(error = %other, "Comment operation failed");
            ApiResponse::internal_error()
        }
    }
}

/// List a review's comments (public)
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments",
    tag = "comments",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of comments in publication order"),
        (status = 404, description = "Unknown title or review", body = ErrorResponse),
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/{review_id}/comments")]
pub async fn list_comments_handler(
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (title_id, review_id) = path.into_inner();
    match data
        .comment_use_case
        .list(title_id, review_id, query.to_page())
        .await
    {
        Ok(page) => ApiResponse::success(CommentsPageResponse {
            items: page.items.into_iter().map(CommentResponse::from).collect(),
            total: page.total,
        }),
        Err(e) => map_comment_error(e),
    }
}

/// Fetch one comment through its review (public)
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
    tag = "comments",
    responses(
        (status = 200, description = "Comment"),
        (status = 404, description = "Unknown title, review or comment", body = ErrorResponse),
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}")]
pub async fn get_comment_handler(
    path: web::Path<(Uuid, Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (title_id, review_id, comment_id) = path.into_inner();
    match data
        .comment_use_case
        .get(title_id, review_id, comment_id)
        .await
    {
        Ok(comment) => ApiResponse::success(CommentResponse::from(comment)),
        Err(e) => map_comment_error(e),
    }
}

/// Comment on a review (authenticated)
#[utoipa::path(
    post,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments",
    tag = "comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created"),
        (status = 400, description = "Text out of bounds", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Unknown title or review", body = ErrorResponse),
    )
)]
#[post("/api/v1/titles/{title_id}/reviews/{review_id}/comments")]
pub async fn create_comment_handler(
    auth: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CreateCommentRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let (title_id, review_id) = path.into_inner();
    match data
        .comment_use_case
        .create(Some(&caller), title_id, review_id, req.text.clone())
        .await
    {
        Ok(created) => ApiResponse::created(CommentResponse::from(created)),
        Err(e) => map_comment_error(e),
    }
}

/// Patch a comment (author, moderator or admin)
#[utoipa::path(
    patch,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
    tag = "comments",
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Updated comment"),
        (status = 403, description = "Not the author nor elevated", body = ErrorResponse),
        (status = 404, description = "Unknown title, review or comment", body = ErrorResponse),
    )
)]
#[patch("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}")]
pub async fn update_comment_handler(
    auth: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    req: web::Json<UpdateCommentRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let (title_id, review_id, comment_id) = path.into_inner();
    let patch = CommentPatch {
        text: req.text.clone(),
    };

    match data
        .comment_use_case
        .update(Some(&caller), title_id, review_id, comment_id, patch)
        .await
    {
        Ok(updated) => ApiResponse::success(CommentResponse::from(updated)),
        Err(e) => map_comment_error(e),
    }
}

/// Delete a comment (author, moderator or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
    tag = "comments",
    responses(
        (status = 204, description = "Comment removed"),
        (status = 403, description = "Not the author nor elevated", body = ErrorResponse),
        (status = 404, description = "Unknown title, review or comment", body = ErrorResponse),
    )
)]
#[delete("/api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}")]
pub async fn delete_comment_handler(
    auth: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let (title_id, review_id, comment_id) = path.into_inner();
    match data
        .comment_use_case
        .delete(Some(&caller), title_id, review_id, comment_id)
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_comment_error(e),
    }
}
