pub mod comments;
pub mod reviews;

pub use comments::{
    create_comment_handler, delete_comment_handler, get_comment_handler, list_comments_handler,
    update_comment_handler, CommentResponse, CreateCommentRequest, UpdateCommentRequest,
};
pub use reviews::{
    create_review_handler, delete_review_handler, get_review_handler, list_reviews_handler,
    update_review_handler, CreateReviewRequest, ReviewResponse, UpdateReviewRequest,
};
