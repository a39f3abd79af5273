use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::access::{MethodClass, Policy};
use crate::modules::auth::application::domain::entities::User;
use crate::modules::catalog::application::ports::outgoing::{
    TitleRepository, TitleRepositoryError,
};
use crate::modules::reviews::application::domain::entities::{
    validate_review_text, validate_score, Review,
};
use crate::modules::reviews::application::ports::outgoing::{
    NewReview, ReviewPatch, ReviewRepository, ReviewRepositoryError,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct CreateReviewInput {
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ReviewError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Caller may not modify this review")]
    Forbidden,

    #[error("{0}")]
    InvalidScore(String),

    #[error("{0}")]
    InvalidText(String),

    #[error("Review already exists for this author and title")]
    Duplicate,

    #[error("Title not found")]
    TitleNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<ReviewRepositoryError> for ReviewError {
    fn from(e: ReviewRepositoryError) -> Self {
        match e {
            ReviewRepositoryError::DuplicateReview => ReviewError::Duplicate,
            ReviewRepositoryError::TitleNotFound => ReviewError::TitleNotFound,
            ReviewRepositoryError::ReviewNotFound => ReviewError::ReviewNotFound,
            ReviewRepositoryError::DatabaseError(msg) => ReviewError::RepositoryError(msg),
        }
    }
}

impl From<TitleRepositoryError> for ReviewError {
    fn from(e: TitleRepositoryError) -> Self {
        match e {
            TitleRepositoryError::NotFound => ReviewError::TitleNotFound,
            other => ReviewError::RepositoryError(other.to_string()),
        }
    }
}

/// Reviews are scoped under a title: every operation resolves the title
/// first and a review is only visible through its own title.
#[async_trait]
pub trait IReviewsUseCase: Send + Sync {
    async fn list(&self, title_id: Uuid, page: PageRequest)
        -> Result<Page<Review>, ReviewError>;

    async fn get(&self, title_id: Uuid, review_id: Uuid) -> Result<Review, ReviewError>;

    async fn create(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        input: CreateReviewInput,
    ) -> Result<Review, ReviewError>;

    async fn update(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, ReviewError>;

    async fn delete(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<(), ReviewError>;
}

pub struct ReviewsUseCase<R>
where
    R: ReviewRepository,
{
    reviews: R,
    titles: Arc<dyn TitleRepository>,
}

impl<R> ReviewsUseCase<R>
where
    R: ReviewRepository,
{
    pub fn new(reviews: R, titles: Arc<dyn TitleRepository>) -> Self {
        Self { reviews, titles }
    }

    fn authorize(
        caller: Option<&User>,
        method: MethodClass,
        owner: Option<Uuid>,
    ) -> Result<(), ReviewError> {
        if Policy::AuthorOrModerator.allows(caller, method, owner) {
            Ok(())
        } else if caller.is_none() {
            Err(ReviewError::Unauthenticated)
        } else {
            Err(ReviewError::Forbidden)
        }
    }

    async fn require_title(&self, title_id: Uuid) -> Result<(), ReviewError> {
        self.titles
            .find_by_id(title_id)
            .await?
            .ok_or(ReviewError::TitleNotFound)?;
        Ok(())
    }

    async fn require_scoped(
        &self,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<Review, ReviewError> {
        self.reviews
            .find_scoped(title_id, review_id)
            .await?
            .ok_or(ReviewError::ReviewNotFound)
    }
}

#[async_trait]
impl<R> IReviewsUseCase for ReviewsUseCase<R>
where
    R: ReviewRepository,
{
    async fn list(
        &self,
        title_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Review>, ReviewError> {
        self.require_title(title_id).await?;
        Ok(self.reviews.list(title_id, page).await?)
    }

    async fn get(&self, title_id: Uuid, review_id: Uuid) -> Result<Review, ReviewError> {
        self.require_title(title_id).await?;
        self.require_scoped(title_id, review_id).await
    }

    async fn create(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        input: CreateReviewInput,
    ) -> Result<Review, ReviewError> {
        let author = match caller {
            Some(user) => user,
            None => return Err(ReviewError::Unauthenticated),
        };

        validate_score(input.score).map_err(ReviewError::InvalidScore)?;
        validate_review_text(&input.text).map_err(ReviewError::InvalidText)?;

        self.require_title(title_id).await?;

        // The unique (author, title) index makes this insert the atomic
        // duplicate check; a concurrent second create comes back Duplicate.
        Ok(self
            .reviews
            .create(NewReview {
                title_id,
                author_id: author.id,
                text: input.text,
                score: input.score,
            })
            .await?)
    }

    async fn update(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, ReviewError> {
        self.require_title(title_id).await?;
        let review = self.require_scoped(title_id, review_id).await?;

        Self::authorize(caller, MethodClass::Unsafe, Some(review.author_id))?;

        if let Some(score) = patch.score {
            validate_score(score).map_err(ReviewError::InvalidScore)?;
        }
        if let Some(text) = &patch.text {
            validate_review_text(text).map_err(ReviewError::InvalidText)?;
        }

        Ok(self.reviews.update(review_id, patch).await?)
    }

    async fn delete(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
    ) -> Result<(), ReviewError> {
        self.require_title(title_id).await?;
        let review = self.require_scoped(title_id, review_id).await?;

        Self::authorize(caller, MethodClass::Unsafe, Some(review.author_id))?;

        Ok(self.reviews.delete(review_id).await?)
    }
}
