use async_trait::async_trait;

use crate::modules::access::{MethodClass, Policy};
use crate::modules::auth::application::domain::entities::{
    validate_email, validate_username, Role, User,
};
use crate::modules::auth::application::ports::outgoing::{
    NewUser, UserPatch, UserQuery, UserQueryError, UserRepository, UserRepositoryError,
};
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, Clone)]
pub struct AdminCreateUserInput {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ManageUsersError {
    #[error("Caller is not allowed to administer users")]
    Forbidden,

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

impl From<UserRepositoryError> for ManageUsersError {
    fn from(e: UserRepositoryError) -> Self {
        match e {
            UserRepositoryError::UserAlreadyExists => ManageUsersError::Conflict,
            UserRepositoryError::UserNotFound => ManageUsersError::NotFound,
            other => ManageUsersError::RepositoryError(other),
        }
    }
}

/// User-account administration. Every operation is AdminOnly.
#[async_trait]
pub trait IManageUsersUseCase: Send + Sync {
    async fn list(
        &self,
        caller: &User,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, ManageUsersError>;

    async fn get(&self, caller: &User, username: &str) -> Result<User, ManageUsersError>;

    async fn create(
        &self,
        caller: &User,
        input: AdminCreateUserInput,
    ) -> Result<User, ManageUsersError>;

    async fn update(
        &self,
        caller: &User,
        username: &str,
        patch: UserPatch,
    ) -> Result<User, ManageUsersError>;

    async fn delete(&self, caller: &User, username: &str) -> Result<(), ManageUsersError>;
}

pub struct ManageUsersUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    query: Q,
    repository: R,
}

impl<Q, R> ManageUsersUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    pub fn new(query: Q, repository: R) -> Self {
        Self { query, repository }
    }

    fn authorize(caller: &User, method: MethodClass) -> Result<(), ManageUsersError> {
        if Policy::AdminOnly.allows(Some(caller), method, None) {
            Ok(())
        } else {
            Err(ManageUsersError::Forbidden)
        }
    }

    fn validate_patch(patch: &UserPatch) -> Result<(), ManageUsersError> {
        if let Some(username) = &patch.username {
            validate_username(username).map_err(ManageUsersError::InvalidUsername)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email).map_err(ManageUsersError::InvalidEmail)?;
        }
        Ok(())
    }

    async fn require_by_username(&self, username: &str) -> Result<User, ManageUsersError> {
        self.query
            .find_by_username(username)
            .await?
            .ok_or(ManageUsersError::NotFound)
    }
}

#[async_trait]
impl<Q, R> IManageUsersUseCase for ManageUsersUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    async fn list(
        &self,
        caller: &User,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, ManageUsersError> {
        Self::authorize(caller, MethodClass::Safe)?;
        Ok(self.query.list(search, page).await?)
    }

    async fn get(&self, caller: &User, username: &str) -> Result<User, ManageUsersError> {
        Self::authorize(caller, MethodClass::Safe)?;
        self.require_by_username(username).await
    }

    async fn create(
        &self,
        caller: &User,
        input: AdminCreateUserInput,
    ) -> Result<User, ManageUsersError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        validate_username(&input.username).map_err(ManageUsersError::InvalidUsername)?;
        validate_email(&input.email).map_err(ManageUsersError::InvalidEmail)?;

        let new = NewUser {
            username: input.username,
            email: input.email,
            role: input.role,
            bio: input.bio,
            first_name: input.first_name,
            last_name: input.last_name,
        };
        Ok(self.repository.create_user(new).await?)
    }

    async fn update(
        &self,
        caller: &User,
        username: &str,
        patch: UserPatch,
    ) -> Result<User, ManageUsersError> {
        Self::authorize(caller, MethodClass::Unsafe)?;
        Self::validate_patch(&patch)?;

        let target = self.require_by_username(username).await?;
        Ok(self.repository.update_user(target.id, patch).await?)
    }

    async fn delete(&self, caller: &User, username: &str) -> Result<(), ManageUsersError> {
        Self::authorize(caller, MethodClass::Unsafe)?;

        let target = self.require_by_username(username).await?;
        Ok(self.repository.delete_user(target.id).await?)
    }
}
