use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::{
    validate_email, validate_username, User,
};
use crate::modules::auth::application::ports::outgoing::{
    UserPatch, UserQuery, UserQueryError, UserRepository, UserRepositoryError,
};

/// What a user may change about themselves. The role field is absent on
/// purpose: self-service updates can never escalate.
#[derive(Debug, Clone, Default)]
pub struct OwnProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OwnProfileError {
    #[error("User not found")]
    NotFound,

    #[error("{0}")]
    InvalidUsername(String),

    #[error("{0}")]
    InvalidEmail(String),

    #[error("Username or email already taken")]
    Conflict,

    #[error("Repository error: {0}")]
    RepositoryError(UserRepositoryError),

    #[error("Query error: {0}")]
    QueryError(#[from] UserQueryError),
}

impl From<UserRepositoryError> for OwnProfileError {
    fn from(e: UserRepositoryError) -> Self {
        match e {
            UserRepositoryError::UserAlreadyExists => OwnProfileError::Conflict,
            UserRepositoryError::UserNotFound => OwnProfileError::NotFound,
            other => OwnProfileError::RepositoryError(other),
        }
    }
}

#[async_trait]
pub trait IOwnProfileUseCase: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<User, OwnProfileError>;

    async fn update(&self, user_id: Uuid, patch: OwnProfilePatch)
        -> Result<User, OwnProfileError>;
}

pub struct OwnProfileUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    query: Q,
    repository: R,
}

impl<Q, R> OwnProfileUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    pub fn new(query: Q, repository: R) -> Self {
        Self { query, repository }
    }
}

#[async_trait]
impl<Q, R> IOwnProfileUseCase for OwnProfileUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    async fn get(&self, user_id: Uuid) -> Result<User, OwnProfileError> {
        self.query
            .find_by_id(user_id)
            .await?
            .ok_or(OwnProfileError::NotFound)
    }

    async fn update(
        &self,
        user_id: Uuid,
        patch: OwnProfilePatch,
    ) -> Result<User, OwnProfileError> {
        if let Some(username) = &patch.username {
            validate_username(username).map_err(OwnProfileError::InvalidUsername)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email).map_err(OwnProfileError::InvalidEmail)?;
        }

        let repo_patch = UserPatch {
            username: patch.username,
            email: patch.email,
            role: None,
            bio: patch.bio,
            first_name: patch.first_name,
            last_name: patch.last_name,
        };
        Ok(self.repository.update_user(user_id, repo_patch).await?)
    }
}
