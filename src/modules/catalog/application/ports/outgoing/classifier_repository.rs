use async_trait::async_trait;

use crate::modules::catalog::application::domain::entities::Classifier;
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct NewClassifier {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierRepositoryError {
    #[error("Name or slug already exists")]
    AlreadyExists,

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Shared surface of the category and genre stores. Both are addressed by
/// slug; what deletion does to referencing titles is a property of the
/// schema (set-null), never of the caller.
#[async_trait]
pub trait ClassifierRepository: Send + Sync {
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Classifier>, ClassifierRepositoryError>;

    async fn find_by_slug(&self, slug: &str)
        -> Result<Option<Classifier>, ClassifierRepositoryError>;

    async fn create(&self, new: NewClassifier) -> Result<Classifier, ClassifierRepositoryError>;

    async fn delete_by_slug(&self, slug: &str) -> Result<(), ClassifierRepositoryError>;
}
