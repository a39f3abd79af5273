use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::{
    resolve_caller, AuthenticatedUser,
};
use crate::modules::catalog::adapter::incoming::web::routes::categories::ClassifierResponse;
use crate::modules::catalog::application::domain::entities::Title;
use crate::modules::catalog::application::ports::outgoing::{NewTitle, TitleFilter, TitlePatch};
use crate::modules::catalog::application::use_cases::titles::TitleError;
use crate::shared::api::ApiResponse;
use crate::shared::pagination::PageRequest;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct TitleResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(example = 1972)]
    pub year: i32,
    /// Mean review score; null until the first review lands
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<ClassifierResponse>,
    pub category: Option<ClassifierResponse>,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            rating: title.rating,
            description: title.description,
            genre: title
                .genres
                .into_iter()
                .map(ClassifierResponse::from)
                .collect(),
            category: title.category.map(ClassifierResponse::from),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TitlesPageResponse {
    pub items: Vec<TitleResponse>,
    pub total: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateTitleRequest {
    #[schema(example = "Solaris")]
    pub name: String,
    #[schema(example = 1972)]
    pub year: i32,
    pub description: Option<String>,
    /// Slug of an existing category
    pub category: Option<String>,
    /// Slugs of existing genres
    #[serde(default)]
    pub genre: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTitlesQuery {
    /// Category slug
    pub category: Option<String>,
    /// Genre slug
    pub genre: Option<String>,
    /// Name substring, case-insensitive
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

fn map_title_error(err: TitleError) -> HttpResponse {
    match &err {
        TitleError::Unauthenticated => {
            ApiResponse::unauthorized("NOT_AUTHENTICATED", "Authentication required")
        }
        TitleError::Forbidden => ApiResponse::forbidden("FORBIDDEN", "Admin privileges required"),
        TitleError::InvalidName(msg) => ApiResponse::bad_request("INVALID_NAME", msg),
        TitleError::InvalidYear(msg) => ApiResponse::bad_request("INVALID_YEAR", msg),
        TitleError::NotFound => ApiResponse::not_found("TITLE_NOT_FOUND", "Title not found"),
        TitleError::UnknownCategory(slug) => ApiResponse::not_found(
            "CATEGORY_NOT_FOUND",
            &format!("Unknown category slug: {}", slug),
        ),
        TitleError::UnknownGenre(slug) => {
            ApiResponse::not_found("GENRE_NOT_FOUND", &format!("Unknown genre slug: {}", slug))
        }
        other => {
            error!(error = %other, "Title operation failed");
            ApiResponse::internal_error()
        }
    }
}

/// List titles with filters (public)
#[utoipa::path(
    get,
    path = "/api/v1/titles",
    tag = "catalog",
    params(ListTitlesQuery),
    responses((status = 200, description = "Page of titles with computed ratings"))
)]
#[get("/api/v1/titles")]
pub async fn list_titles_handler(
    query: web::Query<ListTitlesQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let filter = TitleFilter {
        category_slug: query.category.clone(),
        genre_slug: query.genre.clone(),
        name: query.name.clone(),
        year: query.year,
    };
    let page = PageRequest::new(query.limit, query.offset);

    match data.title_use_case.list(filter, page).await {
        Ok(page) => ApiResponse::success(TitlesPageResponse {
            items: page.items.into_iter().map(TitleResponse::from).collect(),
            total: page.total,
        }),
        Err(e) => map_title_error(e),
    }
}

/// Fetch one title (public)
#[utoipa::path(
    get,
    path = "/api/v1/titles/{title_id}",
    tag = "catalog",
    responses(
        (status = 200, description = "Title with computed rating"),
        (status = 404, description = "Unknown title", body = ErrorResponse),
    )
)]
#[get("/api/v1/titles/{title_id}")]
pub async fn get_title_handler(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.title_use_case.get(path.into_inner()).await {
        Ok(title) => ApiResponse::success(TitleResponse::from(title)),
        Err(e) => map_title_error(e),
    }
}

/// Create a title (admin)
#[utoipa::path(
    post,
    path = "/api/v1/titles",
    tag = "catalog",
    request_body = CreateTitleRequest,
    responses(
        (status = 201, description = "Title created"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown category or genre slug", body = ErrorResponse),
    )
)]
#[post("/api/v1/titles")]
pub async fn create_title_handler(
    auth: AuthenticatedUser,
    req: web::Json<CreateTitleRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let input = NewTitle {
        name: req.name.clone(),
        year: req.year,
        description: req.description.clone(),
        category_slug: req.category.clone(),
        genre_slugs: req.genre.clone(),
    };

    match data.title_use_case.create(Some(&caller), input).await {
        Ok(created) => ApiResponse::created(TitleResponse::from(created)),
        Err(e) => map_title_error(e),
    }
}

/// Patch a title (admin)
#[utoipa::path(
    patch,
    path = "/api/v1/titles/{title_id}",
    tag = "catalog",
    request_body = UpdateTitleRequest,
    responses(
        (status = 200, description = "Updated title"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown title", body = ErrorResponse),
    )
)]
#[patch("/api/v1/titles/{title_id}")]
pub async fn update_title_handler(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateTitleRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let patch = TitlePatch {
        name: req.name.clone(),
        year: req.year,
        description: req.description.clone(),
        category_slug: req.category.clone(),
        genre_slugs: req.genre.clone(),
    };

    match data
        .title_use_case
        .update(Some(&caller), path.into_inner(), patch)
        .await
    {
        Ok(updated) => ApiResponse::success(TitleResponse::from(updated)),
        Err(e) => map_title_error(e),
    }
}

/// Delete a title and everything written about it (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/titles/{title_id}",
    tag = "catalog",
    responses(
        (status = 204, description = "Title, its reviews and their comments removed"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown title", body = ErrorResponse),
    )
)]
#[delete("/api/v1/titles/{title_id}")]
pub async fn delete_title_handler(
    auth: AuthenticatedUser,
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data
        .title_use_case
        .delete(Some(&caller), path.into_inner())
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_title_error(e),
    }
}
