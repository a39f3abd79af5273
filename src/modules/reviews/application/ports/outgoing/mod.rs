pub mod comment_repository;
pub mod review_repository;

pub use comment_repository::{CommentPatch, CommentRepository, CommentRepositoryError, NewComment};
pub use review_repository::{NewReview, ReviewPatch, ReviewRepository, ReviewRepositoryError};
