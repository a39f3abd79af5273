use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::access::{MethodClass, Policy};
use crate::modules::auth::application::domain::entities::User;
use crate::modules::reviews::application::domain::entities::{validate_comment_text, Comment};
use crate::modules::reviews::application::ports::outgoing::{
    CommentPatch, CommentRepository, CommentRepositoryError, NewComment, ReviewRepository,
    ReviewRepositoryError,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone, thiserror::Error)]
pub enum CommentError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Caller may not modify this comment")]
    Forbidden,

    #[error("{0}")]
    InvalidText(String),

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<CommentRepositoryError> for CommentError {
    fn from(e: CommentRepositoryError) -> Self {
        match e {
            CommentRepositoryError::ReviewNotFound => CommentError::ReviewNotFound,
            CommentRepositoryError::CommentNotFound => CommentError::CommentNotFound,
            CommentRepositoryError::DatabaseError(msg) => CommentError::RepositoryError(msg),
        }
    }
}

impl From<ReviewRepositoryError> for CommentError {
    fn from(e: ReviewRepositoryError) -> Self {
        match e {
            ReviewRepositoryError::ReviewNotFound | ReviewRepositoryError::TitleNotFound => {
                CommentError::ReviewNotFound
            }
            other => CommentError::RepositoryError(other.to_string()),
        }
    }
}

/// Comments hang off a review which itself hangs off a title; both parent
/// ids are part of every address.
#[async_trait]
pub trait ICommentsUseCase: Send + Sync {
    async fn list(
        &self,
        title_id: Uuid,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentError>;

    async fn get(
        &self,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, CommentError>;

    async fn create(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        text: String,
    ) -> Result<Comment, CommentError>;

    async fn update(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
        patch: CommentPatch,
    ) -> Result<Comment, CommentError>;

    async fn delete(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), CommentError>;
}

pub struct CommentsUseCase<C>
where
    C: CommentRepository,
{
    comments: C,
    reviews: Arc<dyn ReviewRepository>,
}

impl<C> CommentsUseCase<C>
where
    C: CommentRepository,
{
    pub fn new(comments: C, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { comments, reviews }
    }

    fn authorize(
        caller: Option<&User>,
        method: MethodClass,
        owner: Option<Uuid>,
    ) -> Result<(), CommentError> {
        if Policy::AuthorOrModerator.allows(caller, method, owner) {
            Ok(())
        } else if caller.is_none() {
            Err(CommentError::Unauthenticated)
        } else {
            Err(CommentError::Forbidden)
        }
    }

    async fn require_review(&self, title_id: Uuid, review_id: Uuid) -> Result<(), CommentError> {
        self.reviews
            .find_scoped(title_id, review_id)
            .await?
            .ok_or(CommentError::ReviewNotFound)?;
        Ok(())
    }

    async fn require_scoped(
        &self,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, CommentError> {
        self.comments
            .find_scoped(review_id, comment_id)
            .await?
            .ok_or(CommentError::CommentNotFound)
    }
}

#[async_trait]
impl<C> ICommentsUseCase for CommentsUseCase<C>
where
    C: CommentRepository,
{
    async fn list(
        &self,
        title_id: Uuid,
        review_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentError> {
        self.require_review(title_id, review_id).await?;
        Ok(self.comments.list(review_id, page).await?)
    }

    async fn get(
        &self,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, CommentError> {
        self.require_review(title_id, review_id).await?;
        self.require_scoped(review_id, comment_id).await
    }

    async fn create(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        text: String,
    ) -> Result<Comment, CommentError> {
        let author = match caller {
            Some(user) => user,
            None => return Err(CommentError::Unauthenticated),
        };

        validate_comment_text(&text).map_err(CommentError::InvalidText)?;

        self.require_review(title_id, review_id).await?;

        Ok(self
            .comments
            .create(NewComment {
                review_id,
                author_id: author.id,
                text,
            })
            .await?)
    }

    async fn update(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
        patch: CommentPatch,
    ) -> Result<Comment, CommentError> {
        self.require_review(title_id, review_id).await?;
        let comment = self.require_scoped(review_id, comment_id).await?;

        Self::authorize(caller, MethodClass::Unsafe, Some(comment.author_id))?;

        if let Some(text) = &patch.text {
            validate_comment_text(text).map_err(CommentError::InvalidText)?;
        }

        Ok(self.comments.update(comment_id, patch).await?)
    }

    async fn delete(
        &self,
        caller: Option<&User>,
        title_id: Uuid,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), CommentError> {
        self.require_review(title_id, review_id).await?;
        let comment = self.require_scoped(review_id, comment_id).await?;

        Self::authorize(caller, MethodClass::Unsafe, Some(comment.author_id))?;

        Ok(self.comments.delete(comment_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::application::domain::entities::Role;
    use crate::modules::reviews::application::domain::entities::Review;
    use crate::modules::reviews::application::ports::outgoing::{NewReview, ReviewPatch};
    use chrono::Utc;
    use std::sync::Mutex;

    fn user(name: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            role,
            bio: None,
            first_name: None,
            last_name: None,
            is_superuser: false,
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    /// Review store that knows exactly one (title, review) pair.
    struct OneReview {
        title_id: Uuid,
        review_id: Uuid,
    }

    #[async_trait]
    impl ReviewRepository for OneReview {
        async fn list(
            &self,
            _title_id: Uuid,
            _page: PageRequest,
        ) -> Result<Page<Review>, ReviewRepositoryError> {
            unimplemented!()
        }

        async fn find_scoped(
            &self,
            title_id: Uuid,
            review_id: Uuid,
        ) -> Result<Option<Review>, ReviewRepositoryError> {
            Ok(
                (title_id == self.title_id && review_id == self.review_id).then(|| Review {
                    id: self.review_id,
                    title_id: self.title_id,
                    author_id: Uuid::new_v4(),
                    author_username: "author".to_string(),
                    text: "the review".to_string(),
                    score: 7,
                    pub_date: Utc::now(),
                }),
            )
        }

        async fn create(&self, _new: NewReview) -> Result<Review, ReviewRepositoryError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _review_id: Uuid,
            _patch: ReviewPatch,
        ) -> Result<Review, ReviewRepositoryError> {
            unimplemented!()
        }

        async fn delete(&self, _review_id: Uuid) -> Result<(), ReviewRepositoryError> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct InMemoryComments {
        comments: Mutex<Vec<Comment>>,
    }

    #[async_trait]
    impl CommentRepository for &InMemoryComments {
        async fn list(
            &self,
            review_id: Uuid,
            _page: PageRequest,
        ) -> Result<Page<Comment>, CommentRepositoryError> {
            let items: Vec<Comment> = self
                .comments
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.review_id == review_id)
                .cloned()
                .collect();
            let total = items.len() as u64;
            Ok(Page { items, total })
        }

        async fn find_scoped(
            &self,
            review_id: Uuid,
            comment_id: Uuid,
        ) -> Result<Option<Comment>, CommentRepositoryError> {
            Ok(self
                .comments
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == comment_id && c.review_id == review_id)
                .cloned())
        }

        async fn create(&self, new: NewComment) -> Result<Comment, CommentRepositoryError> {
            let created = Comment {
                id: Uuid::new_v4(),
                review_id: new.review_id,
                author_id: new.author_id,
                author_username: "author".to_string(),
                text: new.text,
                pub_date: Utc::now(),
            };
            self.comments.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            comment_id: Uuid,
            patch: CommentPatch,
        ) -> Result<Comment, CommentRepositoryError> {
            let mut comments = self.comments.lock().unwrap();
            let comment = comments
                .iter_mut()
                .find(|c| c.id == comment_id)
                .ok_or(CommentRepositoryError::CommentNotFound)?;
            if let Some(text) = patch.text {
                comment.text = text;
            }
            Ok(comment.clone())
        }

        async fn delete(&self, comment_id: Uuid) -> Result<(), CommentRepositoryError> {
            let mut comments = self.comments.lock().unwrap();
            let before = comments.len();
            comments.retain(|c| c.id != comment_id);
            if comments.len() == before {
                return Err(CommentRepositoryError::CommentNotFound);
            }
            Ok(())
        }
    }

    fn setup(store: &InMemoryComments) -> (CommentsUseCase<&InMemoryComments>, Uuid, Uuid) {
        let title_id = Uuid::new_v4();
        let review_id = Uuid::new_v4();
        let uc = CommentsUseCase::new(
            store,
            Arc::new(OneReview {
                title_id,
                review_id,
            }),
        );
        (uc, title_id, review_id)
    }

    #[tokio::test]
    async fn authenticated_user_comments_on_review() {
        let store = InMemoryComments::default();
        let (uc, title_id, review_id) = setup(&store);
        let caller = user("alice", Role::User);

        let comment = uc
            .create(Some(&caller), title_id, review_id, "Agreed".to_string())
            .await
            .unwrap();

        assert_eq!(comment.author_id, caller.id);
        assert_eq!(comment.review_id, review_id);

        let page = uc
            .list(title_id, review_id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn anonymous_cannot_comment() {
        let store = InMemoryComments::default();
        let (uc, title_id, review_id) = setup(&store);

        let result = uc
            .create(None, title_id, review_id, "Agreed".to_string())
            .await;
        assert!(matches!(result, Err(CommentError::Unauthenticated)));
    }

    #[tokio::test]
    async fn comment_on_missing_review_is_not_found() {
        let store = InMemoryComments::default();
        let (uc, title_id, _review_id) = setup(&store);
        let caller = user("alice", Role::User);

        let result = uc
            .create(Some(&caller), title_id, Uuid::new_v4(), "hi".to_string())
            .await;
        assert!(matches!(result, Err(CommentError::ReviewNotFound)));
    }

    #[tokio::test]
    async fn review_must_belong_to_the_title_in_the_path() {
        let store = InMemoryComments::default();
        let (uc, _title_id, review_id) = setup(&store);
        let caller = user("alice", Role::User);

        // Right review id, wrong title id.
        let result = uc
            .create(Some(&caller), Uuid::new_v4(), review_id, "hi".to_string())
            .await;
        assert!(matches!(result, Err(CommentError::ReviewNotFound)));
    }

    #[tokio::test]
    async fn over_long_comment_is_rejected() {
        let store = InMemoryComments::default();
        let (uc, title_id, review_id) = setup(&store);
        let caller = user("alice", Role::User);

        let result = uc
            .create(Some(&caller), title_id, review_id, "x".repeat(1001))
            .await;
        assert!(matches!(result, Err(CommentError::InvalidText(_))));
    }

    #[tokio::test]
    async fn only_author_or_elevated_roles_can_edit() {
        let store = InMemoryComments::default();
        let (uc, title_id, review_id) = setup(&store);
        let author = user("alice", Role::User);
        let stranger = user("bob", Role::User);
        let moderator = user("mod", Role::Moderator);

        let comment = uc
            .create(Some(&author), title_id, review_id, "Agreed".to_string())
            .await
            .unwrap();

        let result = uc
            .update(
                Some(&stranger),
                title_id,
                review_id,
                comment.id,
                CommentPatch {
                    text: Some("hijacked".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::Forbidden)));

        let updated = uc
            .update(
                Some(&author),
                title_id,
                review_id,
                comment.id,
                CommentPatch {
                    text: Some("edited".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "edited");

        uc.delete(Some(&moderator), title_id, review_id, comment.id)
            .await
            .unwrap();
    }
}
