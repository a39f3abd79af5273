use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::api::schemas::ErrorResponse;
use crate::modules::auth::adapter::incoming::web::extractors::{
    resolve_caller, AuthenticatedUser,
};
use crate::modules::catalog::application::domain::entities::Classifier;
use crate::modules::catalog::application::ports::outgoing::NewClassifier;
use crate::modules::catalog::application::use_cases::classifiers::ClassifierError;
use crate::shared::api::ApiResponse;
use crate::shared::pagination::PageRequest;
use crate::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ClassifierRequest {
    #[schema(example = "Films")]
    pub name: String,

    #[schema(example = "films")]
    pub slug: String,
}

#[derive(Serialize, ToSchema)]
pub struct ClassifierResponse {
    pub name: String,
    pub slug: String,
}

impl From<Classifier> for ClassifierResponse {
    fn from(c: Classifier) -> Self {
        Self {
            name: c.name,
            slug: c.slug,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ClassifierPageResponse {
    pub items: Vec<ClassifierResponse>,
    pub total: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListClassifiersQuery {
    /// Name substring
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub(super) fn map_classifier_error(err: ClassifierError, resource: &str) -> HttpResponse {
    match &err {
        ClassifierError::Unauthenticated => {
            ApiResponse::unauthorized("NOT_AUTHENTICATED", "Authentication required")
        }
        ClassifierError::Forbidden => {
            ApiResponse::forbidden("FORBIDDEN", "Admin privileges required")
        }
        ClassifierError::InvalidName(msg) => ApiResponse::bad_request("INVALID_NAME", msg),
        ClassifierError::InvalidSlug(msg) => ApiResponse::bad_request("INVALID_SLUG", msg),
        ClassifierError::Conflict => ApiResponse::conflict(
            &format!("{}_ALREADY_EXISTS", resource),
            "Name or slug already exists",
        ),
        ClassifierError::NotFound => {
            ApiResponse::not_found(&format!("{}_NOT_FOUND", resource), "Not found")
        }
        other => {
            error!(error = %other, "Classifier operation failed");
            ApiResponse::internal_error()
        }
    }
}

/// List categories (public)
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "catalog",
    params(ListClassifiersQuery),
    responses((status = 200, description = "Page of categories"))
)]
#[get("/api/v1/categories")]
pub async fn list_categories_handler(
    query: web::Query<ListClassifiersQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let page = PageRequest::new(query.limit, query.offset);
    match data
        .category_use_case
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
        Err(e) => map_classifier_error(e, "CATEGORY"),
    }
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "catalog",
    request_body = ClassifierRequest,
    responses(
        (status = 201, description = "Category created"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Name or slug taken", body = ErrorResponse),
    )
)]
#[post("/api/v1/categories")]
pub async fn create_category_handler(
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

    match data.category_use_case.create(Some(&caller), input).await {
        Ok(created) => ApiResponse::created(ClassifierResponse::from(created)),
        Err(e) => map_classifier_error(e, "CATEGORY"),
    }
}

/// Delete a category (admin)
///
/// Titles referencing it survive with a null category.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{slug}",
    tag = "catalog",
    responses(
        (status = 204, description = "Category removed"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown slug", body = ErrorResponse),
    )
)]
#[delete("/api/v1/categories/{slug}")]
pub async fn delete_category_handler(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> impl Responder {
    let caller = match resolve_caller(&data, auth.user_id).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match data
        .category_use_case
        .delete(Some(&caller), &path.into_inner())
        .await
    {
        Ok(()) => ApiResponse::no_content(),
        Err(e) => map_classifier_error(e, "CATEGORY"),
    }
}
