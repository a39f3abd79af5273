use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::reviews::application::domain::entities::Review;
use crate::shared::pagination::{Page, PageRequest};

/// Author and title always come from the request context, never from the
/// request body.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub score: Option<i32>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReviewRepositoryError {
    /// The (author, title) uniqueness constraint fired. This is the
    /// authoritative duplicate check: the insert and the constraint are one
    /// atomic step, so two concurrent creates cannot both succeed.
    #[error("Review already exists for this author and title")]
    DuplicateReview,

    #[error("Title not found")]
    TitleNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Reviews of one title, oldest first.
    async fn list(
        &self,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Review>, ReviewRepositoryError>;

    /// A review addressed through its title; a mismatched pair is absent.
    async fn find_scoped(
        &self,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    async fn create(&self, new: NewReview) -> Result<Review, ReviewRepositoryError>;

    async fn update(
        &self,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, ReviewRepositoryError>;

    /// Removes the review and, through the schema, its comments.
    async fn delete(&self, review_id: Uuid) -> Result<(), ReviewRepositoryError>;
}
