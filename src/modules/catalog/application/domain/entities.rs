use chrono::{Datelike, Utc};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

pub const MAX_CLASSIFIER_NAME_LEN: usize = 200;
pub const MAX_SLUG_LEN: usize = 50;
pub const MAX_TITLE_NAME_LEN: usize = 256;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Category and Genre share this shape; they only differ in how titles
/// reference them.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Read model of a title: references resolved, rating computed from the
/// review scores at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<Classifier>,
    pub genres: Vec<Classifier>,
    pub rating: Option<f64>,
}

pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(format!(
            "Slug must be between 1 and {} characters",
            MAX_SLUG_LEN
        ));
    }
    if !SLUG_RE.is_match(slug) {
        return Err("Slug contains invalid characters".to_string());
    }
    Ok(())
}

pub fn validate_classifier_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > MAX_CLASSIFIER_NAME_LEN {
        return Err(format!(
            "Name must be between 1 and {} characters",
            MAX_CLASSIFIER_NAME_LEN
        ));
    }
    Ok(())
}

pub fn validate_title_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > MAX_TITLE_NAME_LEN {
        return Err(format!(
            "Name must be between 1 and {} characters",
            MAX_TITLE_NAME_LEN
        ));
    }
    Ok(())
}

/// A title's year must be positive and must not lie in the future.
pub fn validate_year(year: i32) -> Result<(), String> {
    let current_year = Utc::now().year();
    if year <= 0 || year > current_year {
        return Err(format!("{} is not a valid year", year));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_url_safe_charset() {
        for slug in ["films", "sci-fi", "top_10", "A-1"] {
            assert!(validate_slug(slug).is_ok(), "expected ok: {}", slug);
        }
    }

    #[test]
    fn slug_rejects_malformed() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("naïve").is_err());
        assert!(validate_slug(&"s".repeat(51)).is_err());
        assert!(validate_slug(&"s".repeat(50)).is_ok());
    }

    #[test]
    fn classifier_name_bounds() {
        assert!(validate_classifier_name("Films").is_ok());
        assert!(validate_classifier_name("").is_err());
        assert!(validate_classifier_name(&"n".repeat(200)).is_ok());
        assert!(validate_classifier_name(&"n".repeat(201)).is_err());
    }

    #[test]
    fn title_name_bounds() {
        assert!(validate_title_name("Solaris").is_ok());
        assert!(validate_title_name(&"n".repeat(256)).is_ok());
        assert!(validate_title_name(&"n".repeat(257)).is_err());
        assert!(validate_title_name("").is_err());
    }

    #[test]
    fn year_must_be_positive() {
        assert!(validate_year(0).is_err());
        assert!(validate_year(-44).is_err());
        assert!(validate_year(1).is_ok());
    }

    #[test]
    fn year_must_not_be_in_the_future() {
        assert!(validate_year(3000).is_err());
        assert!(validate_year(2020).is_ok());
        assert!(validate_year(Utc::now().year()).is_ok());
        assert!(validate_year(Utc::now().year() + 1).is_err());
    }
}
