use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const MAX_REVIEW_TEXT_LEN: usize = 1500;
pub const MAX_COMMENT_TEXT_LEN: usize = 1000;
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 10;

/// A user's single review of a title. At most one exists per
/// (author, title) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub title_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

/// Scores are inclusive on both ends.
pub fn validate_score(score: i32) -> Result<(), String> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        ));
    }
    Ok(())
}

pub fn validate_review_text(text: &str) -> Result<(), String> {
    if text.is_empty() || text.len() > MAX_REVIEW_TEXT_LEN {
        return Err(format!(
            "Review text must be between 1 and {} characters",
            MAX_REVIEW_TEXT_LEN
        ));
    }
    Ok(())
}

pub fn validate_comment_text(text: &str) -> Result<(), String> {
    if text.is_empty() || text.len() > MAX_COMMENT_TEXT_LEN {
        return Err(format!(
            "Comment text must be between 1 and {} characters",
            MAX_COMMENT_TEXT_LEN
        ));
    }
    Ok(())
}
