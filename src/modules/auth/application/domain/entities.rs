use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// Reserved by the `users/me` endpoint.
pub const RESERVED_USERNAME: &str = "me";

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NAME_LEN: usize = 150;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+\-]+$").expect("valid username regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "moderator" => Some(Role::Moderator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    // Account-store flags, managed outside the role field.
    pub is_superuser: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser || self.is_staff
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn is_plain_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Username rule: identifier pattern, bounded length, and never the literal
/// reserved by the current-user endpoint.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username == RESERVED_USERNAME {
        return Err(format!("Username '{}' is reserved", RESERVED_USERNAME));
    }
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(format!(
            "Username must be between 1 and {} characters",
            MAX_USERNAME_LEN
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username contains invalid characters".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(format!(
            "Email must be between 1 and {} characters",
            MAX_EMAIL_LEN
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}
