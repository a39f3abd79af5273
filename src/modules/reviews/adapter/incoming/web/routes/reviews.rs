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
use crate::modules::reviews::application::domain::entities::Review;
use crate::modules::reviews::application::ports::outgoing::ReviewPatch;
use crate::modules::reviews::application::use_cases::reviews::{
    CreateReviewInput, ReviewError,
};
use crate::shared::api::{ApiResponse, PageQuery};
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub text: String,
    /// Author's username; always server-assigned
    pub author: String,
    #[schema(example = 8)]
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            text: review.text,
            author: review.author_username,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReviewsPageResponse {
    pub items: Vec<ReviewResponse>,
    pub total: u64,
}

/// Any author or title in the body is ignored; both come from the request
/// context.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub text: String,
    #[schema(example = 8)]
    pub score: i32,
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

fn map_review_error(err: ReviewError) -> HttpResponse {
    match &err {
        ReviewError::Unauthenticated => {
            ApiResponse::unauthorized("NOT_AUTHENTICATED", "Authentication required")
        }
        ReviewError::Forbidden => ApiResponse::forbidden(
            "FORBIDDEN",
            "Only the author, a moderator or an admin may do this",
        ),
        ReviewError::InvalidScore(msg) => ApiResponse::bad_request("INVALID_SCORE", msg),
        ReviewError::InvalidText(msg) => ApiResponse::bad_request("INVALID_TEXT", msg),
        ReviewError::Duplicate => ApiResponse::conflict(
            "REVIEW_EXISTS",
            "A review by this author already exists for this title",
        ),
        ReviewError::TitleNotFound => {
            ApiResponse::not_found("TITLE_NOT_FOUND", "Title not found")
        }
        ReviewError::ReviewNotFound => {
            ApiResponse::not_found("REVIEW_NOT_FOUND", "Review not found")
        }
        other => {
            error!(error = %other, "Review operation failed");
            ApiResponse::internal_error()
        }
    }
}

/// List a title's reviews (public)
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews",
    tag = "reviews",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of reviews, oldest first"),
        (status = 404, description = "Unknown title", body = ErrorResponse),
    )
)]
#[get("/api/v1/titles/{title_id}/reviews")]
pub async fn list_reviews_handler(
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data
        .review_use_case
        .list(path.into_inner(), query.to_page())
        .await
    {
        Ok(page) => ApiResponse::success(ReviewsPageResponse {
            items: page.items.into_iter().map(ReviewResponse::from).collect(),
            total: page.total,
        }),
        Err(e) => map_review_error(e),
    }
}

/// Fetch one review through its title (public)
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}",
    tag = "reviews",
    responses(
        (status = 200, description = "Review"),
        (status = 404, description = "Unknown title or review", body = ErrorResponse),
    )
)]
#[get("/api/v1/titles/{title_id}/reviews/{review_id}")]
pub async fn get_review_handler(
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let (title_id, review_id) = path.into_inner();
    match data.review_use_case.get(title_id, review_id).await {
        Ok(review) => ApiResponse::success(ReviewResponse::from(review)),
        Err(e) => map_review_error(e),
    }
}

/// Review a title (authenticated; one review per author per title)
#[utoipa::path(
    post,
    path = "/api/v1/titles/{title_id}/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created"),
        (status = 400, description = "Score or text out of bounds", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Unknown title", body = ErrorResponse),
        (
            status = 409,
            description = "Author already reviewed this title",
            body = ErrorResponse,
            example = json!({
                "success": false,
                "error": {
                    "code": "REVIEW_EXISTS",
                    "message": "A review by this author already exists for this title"
                }
            })
        ),
    )
)]
#[post("/api/v1/titles/{title_id}/reviews")]
pub async fn create_review_handler(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateReviewRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let input = CreateReviewInput {
        text: req.text.clone(),
        score: req.score,
    };

    match data
        .review_use_case
        .create(Some(&caller), path.into_inner(), input)
        .await
    {
        Ok(created) => ApiResponse::created(ReviewResponse::from(created)),
        Err(e) => map_review_error(e),
    }
}

/// Patch a review (author, moderator or admin)
#[utoipa::path(
    patch,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}",
    tag = "reviews",
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Updated review"),
        (status = 403, description = "Not the author nor elevated", body = ErrorResponse),
        (status = 404, description = "Unknown title or review", body = ErrorResponse),
    )
)]
#[patch("/api/v1/titles/{title_id}/reviews/{review_id}")]
pub async fn update_review_handler(
    auth: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<UpdateReviewRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let (title_id, review_id) = path.into_inner();
    let patch = ReviewPatch {
        text: req.text.clone(),
        score: req.score,
    };

    match data
        .review_use_case
        .update(Some(&caller), title_id, review_id, patch)
        .await
    {
        Ok(updated) => ApiResponse::success(ReviewResponse::from(updated)),
        Err(e) => map_review_error(e),
    }
}

/// Delete a review and its comments (author, moderator or admin)
#[utoipa::path(
    delete,
    path = "/api/v1/titles/{title_id}/reviews/{review_id}",
    tag = "reviews",
    responses(
        (status = 204, description = "Review and its comments removed"),
        (status = 403, description = "Not the author nor elevated", body = ErrorResponse),
        (status = 404, description = "Unknown title or review", body = ErrorResponse),
    )
)]
#[delete("/api/v1/titles/{title_id}/reviews/{review_id}")]
pub async fn delete_review_handler(
    auth: AuthenticatedUser,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let (title_id, review_id) = path.into_inner();
    match data
        .review_use_case
        .delete(Some(&caller), title_id, review_id)
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_review_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::application::domain::entities::{Role, User};
    use crate::modules::reviews::application::use_cases::reviews::IReviewsUseCase;
    use crate::shared::pagination::{Page, PageRequest};
    use crate::tests::support::app_state_builder::TestAppStateBuilder;
    use crate::tests::support::{single_user_query, StubTokenProvider};
    use actix_web::{test, App};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    /// One title; remembers authors who already reviewed it.
    struct MockReviews {
        title_id: Uuid,
        reviewed_by: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl IReviewsUseCase for MockReviews {
        async fn list(
            &self,
            _title_id: Uuid,
            _page: PageRequest,
        ) -> Result<Page<Review>, ReviewError> {
            unimplemented!()
        }

        async fn get(&self, _title_id: Uuid, _review_id: Uuid) -> Result<Review, ReviewError> {
            unimplemented!()
        }

        async fn create(
            &self,
            caller: Option<&User>,
            title_id: Uuid,
            input: CreateReviewInput,
        ) -> Result<Review, ReviewError> {
            let caller = caller.ok_or(ReviewError::Unauthenticated)?;
            if title_id != self.title_id {
                return Err(ReviewError::TitleNotFound);
            }
            let mut reviewed = self.reviewed_by.lock().unwrap();
            if reviewed.contains(&caller.id) {
                return Err(ReviewError::Duplicate);
            }
            reviewed.push(caller.id);
            Ok(Review {
                id: Uuid::new_v4(),
                title_id,
                author_id: caller.id,
                author_username: caller.username.clone(),
                text: input.text,
                score: input.score,
                pub_date: Utc::now(),
            })
        }

        async fn update(
            &self,
            _caller: Option<&User>,
            _title_id: Uuid,
            _review_id: Uuid,
            _patch: ReviewPatch,
        ) -> Result<Review, ReviewError> {
            unimplemented!()
        }

        async fn delete(
            &self,
            _caller: Option<&User>,
            _title_id: Uuid,
            _review_id: Uuid,
        ) -> Result<(), ReviewError> {
            unimplemented!()
        }
    }

    fn alice() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            bio: None,
            first_name: None,
            last_name: None,
            is_superuser: false,
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn second_review_by_same_author_is_409() {
        let user = alice();
        let user_id = user.id;
        let title_id = Uuid::new_v4();

        let state = TestAppStateBuilder::default()
            .with_reviews(Arc::new(MockReviews {
                title_id,
                reviewed_by: Mutex::new(Vec::new()),
            }))
            .with_user_query(single_user_query(user))
            .build();

        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(StubTokenProvider::app_data())
                .service(create_review_handler),
        )
        .await;

        let uri = format!("/api/v1/titles/{}/reviews", title_id);
        let body = CreateReviewRequest {
            text: "A masterpiece".to_string(),
            score: 9,
        };

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", user_id)))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", user_id)))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "REVIEW_EXISTS");
    }

    #[actix_web::test]
    async fn anonymous_review_is_401() {
        let title_id = Uuid::new_v4();

        let state = TestAppStateBuilder::default()
            .with_reviews(Arc::new(MockReviews {
                title_id,
                reviewed_by: Mutex::new(Vec::new()),
            }))
            .build();

        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(StubTokenProvider::app_data())
                .service(create_review_handler),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/titles/{}/reviews", title_id))
            .set_json(CreateReviewRequest {
                text: "drive-by".to_string(),
                score: 1,
            })
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn review_on_unknown_title_is_404() {
        let user = alice();
        let user_id = user.id;

        let state = TestAppStateBuilder::default()
            .with_reviews(Arc::new(MockReviews {
                title_id: Uuid::new_v4(),
                reviewed_by: Mutex::new(Vec::new()),
            }))
            .with_user_query(single_user_query(user))
            .build();

        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(StubTokenProvider::app_data())
                .service(create_review_handler),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/titles/{}/reviews", Uuid::new_v4()))
            .insert_header(("Authorization", format!("Bearer {}", user_id)))
            .set_json(CreateReviewRequest {
                text: "ghost".to_string(),
                score: 5,
            })
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
