use actix_web::{delete, get, post, web, Responder};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::{
    resolve_caller, AuthenticatedUser,
};
use crate::modules::catalog::adapter::incoming::web::routes::categories::{
    map_classifier_error, ClassifierPageResponse, ClassifierRequest, ClassifierResponse,
};
use crate::modules::catalog::application::ports::outgoing::NewClassifier;
use crate::shared::api::ApiResponse;
use crate::shared::pagination::PageRequest;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListGenresQuery {
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// List genres (public)
#[utoipa::path(
    get,
    path = "/api/v1/genres",
    tag = "catalog",
    params(ListGenresQuery),
    responses((status = 200, description = "Page of genres"))
)]
#[get("/api/v1/genres")]
pub async fn list_genres_handler(
    query: web::Query<ListGenresQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let page = PageRequest::new(query.limit, query.offset);
    match data
        .genre_use_case
        .list(query.search.as_deref(), page)
        .await
    {
        Ok(page) => ApiResponse::success(ClassifierPageResponse {
            items: page
                .items
                .into_iter()
                .map(ClassifierResponse::from)
                .collect(),
            total: page.total,
        }),
        Err(e) => map_classifier_error(e, "GENRE"),
    }
}

/// Create a genre (admin)
#[utoipa::path(
    post,
    path = "/api/v1/genres",
    tag = "catalog",
    request_body = ClassifierRequest,
    responses(
        (status = 201, description = "Genre created"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Name or slug taken", body = ErrorResponse),
    )
)]
#[post("/api/v1/genres")]
pub async fn create_genre_handler(
    auth: AuthenticatedUser,
    req: web::Json<ClassifierRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let input = NewClassifier {
        name: req.name.clone(),
        slug: req.slug.clone(),
    };

    match data.genre_use_case.create(Some(&caller), input).await {
        Ok(created) => ApiResponse::created(ClassifierResponse::from(created)),
        Err(e) => map_classifier_error(e, "GENRE"),
    }
}

/// Delete a genre (admin)
///
/// Join rows keep their title side; titles are never touched.
#[utoipa::path(
    delete,
    path = "/api/v1/genres/{slug}",
    tag = "catalog",
    responses(
        (status = 204, description = "Genre removed"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown slug", body = ErrorResponse),
    )
)]
#[delete("/api/v1/genres/{slug}")]
pub async fn delete_genre_handler(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data
        .genre_use_case
        .delete(Some(&caller), &path.into_inner())
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_classifier_error(e, "GENRE"),
    }
}
