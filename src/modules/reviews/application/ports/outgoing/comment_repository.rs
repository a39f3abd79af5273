use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::reviews::application::domain::entities::Comment;
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub text: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommentRepositoryError {
    #[error("Review not found")]
    ReviewNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of one review, in publication order.
    async fn list(
        &self,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentRepositoryError>;

    async fn find_scoped(
        &self,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    async fn create(&self, new: NewComment) -> Result<Comment, CommentRepositoryError>;

    async fn update(
        &self,
        comment_id: Uuid,
        patch: CommentPatch,
    ) -> Result<Comment, CommentRepositoryError>;

    async fn delete(&self, comment_id: Uuid) -> Result<(), CommentRepositoryError>;
}
