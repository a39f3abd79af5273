use crate::api::schemas::{ErrorDetail, ErrorResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::modules::auth::adapter::incoming::web::routes::{
    CreateUserRequest, IssueTokenRequest, IssueTokenResponse, SignupRequest, SignupResponse,
    UpdateProfileRequest, UpdateUserRequest, UserResponse,
};
use crate::modules::catalog::adapter::incoming::web::routes::{
    ClassifierRequest, ClassifierResponse, CreateTitleRequest, TitleResponse, UpdateTitleRequest,
};
use crate::modules::reviews::adapter::incoming::web::routes::{
    CommentResponse, CreateCommentRequest, CreateReviewRequest, ReviewResponse,
    UpdateCommentRequest, UpdateReviewRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ratings API",
        version = "1.0.0",
        description = "Content-rating API: titles, reviews, comments and role-gated administration"
    ),
    paths(
        // Auth
        crate::modules::auth::adapter::incoming::web::routes::signup::signup_handler,
        crate::modules::auth::adapter::incoming::web::routes::token::issue_token_handler,

        // Users
        crate::modules::auth::adapter::incoming::web::routes::users::list_users_handler,
        crate::modules::auth::adapter::incoming::web::routes::users::create_user_handler,
        crate::modules::auth::adapter::incoming::web::routes::users::get_user_handler,
        crate::modules::auth::adapter::incoming::web::routes::users::update_user_handler,
        crate::modules::auth::adapter::incoming::web::routes::users::delete_user_handler,
        crate::modules::auth::adapter::incoming::web::routes::me::own_profile_handler,
        crate::modules::auth::adapter::incoming::web::routes::me::update_own_profile_handler,

        // Catalog
        crate::modules::catalog::adapter::incoming::web::routes::categories::list_categories_handler,
        crate::modules::catalog::adapter::incoming::web::routes::categories::create_category_handler,
        crate::modules::catalog::adapter::incoming::web::routes::categories::delete_category_handler,
        crate::modules::catalog::adapter::incoming::web::routes::genres::list_genres_handler,
        crate::modules::catalog::adapter::incoming::web::routes::genres::create_genre_handler,
        crate::modules::catalog::adapter::incoming::web::routes::genres::delete_genre_handler,
        crate::modules::catalog::adapter::incoming::web::routes::titles::list_titles_handler,
        crate::modules::catalog::adapter::incoming::web::routes::titles::get_title_handler,
        crate::modules::catalog::adapter::incoming::web::routes::titles::create_title_handler,
        crate::modules::catalog::adapter::incoming::web::routes::titles::update_title_handler,
        crate::modules::catalog::adapter::incoming::web::routes::titles::delete_title_handler,

        // Reviews & comments
        crate::modules::reviews::adapter::incoming::web::routes::reviews::list_reviews_handler,
        crate::modules::reviews::adapter::incoming::web::routes::reviews::get_review_handler,
        crate::modules::reviews::adapter::incoming::web::routes::reviews::create_review_handler,
        crate::modules::reviews::adapter::incoming::web::routes::reviews::update_review_handler,
        crate::modules::reviews::adapter::incoming::web::routes::reviews::delete_review_handler,
        crate::modules::reviews::adapter::incoming::web::routes::comments::list_comments_handler,
        crate::modules::reviews::adapter::incoming::web::routes::comments::get_comment_handler,
        crate::modules::reviews::adapter::incoming::web::routes::comments::create_comment_handler,
        crate::modules::reviews::adapter::incoming::web::routes::comments::update_comment_handler,
        crate::modules::reviews::adapter::incoming::web::routes::comments::delete_comment_handler,
    ),
    components(schemas(
        ErrorResponse,
        ErrorDetail,
        SignupRequest,
        SignupResponse,
        IssueTokenRequest,
        IssueTokenResponse,
        CreateUserRequest,
        UpdateUserRequest,
        UpdateProfileRequest,
        UserResponse,
        ClassifierRequest,
        ClassifierResponse,
        CreateTitleRequest,
        UpdateTitleRequest,
        TitleResponse,
        CreateReviewRequest,
        UpdateReviewRequest,
        ReviewResponse,
        CreateCommentRequest,
        UpdateCommentRequest,
        CommentResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Signup and token issuance"),
        (name = "users", description = "Account administration and own profile"),
        (name = "catalog", description = "Categories, genres and titles"),
        (name = "reviews", description = "Reviews scoped under titles"),
        (name = "comments", description = "Comments scoped under reviews"),
    )
)]
pub struct ApiDoc;

pub struct BearerAuth;

impl utoipa::Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
