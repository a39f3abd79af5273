use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::catalog::application::domain::entities::Title;
use crate::shared::pagination::{Page, PageRequest};

/// `findByFilters` surface of the title store. All filters are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub category_slug: Option<String>,
    pub genre_slug: Option<String>,
    /// Case-insensitive substring on the name.
    pub name: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_slug: Option<String>,
    pub genre_slugs: Vec<String>,
}

/// Partial update; `genre_slugs` replaces the whole genre set when present.
#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_slug: Option<String>,
    pub genre_slugs: Option<Vec<String>>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TitleRepositoryError {
    #[error("Title not found")]
    NotFound,

    #[error("Unknown category slug: {0}")]
    UnknownCategory(String),

    #[error("Unknown genre slug: {0}")]
    UnknownGenre(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait TitleRepository: Send + Sync {
    async fn find_by_id(&self, title_id: Uuid) -> Result<Option<Title>, TitleRepositoryError>;

    async fn list(
        &self,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, TitleRepositoryError>;

    async fn create(&self, new: NewTitle) -> Result<Title, TitleRepositoryError>;

    async fn update(&self, title_id: Uuid, patch: TitlePatch)
        -> Result<Title, TitleRepositoryError>;

    /// Removes the title and, through the schema, its reviews and their
    /// comments.
    async fn delete(&self, title_id: Uuid) -> Result<(), TitleRepositoryError>;
}
