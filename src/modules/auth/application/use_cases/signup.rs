use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::modules::auth::application::domain::entities::{
    validate_email, validate_username, User,
};
use crate::modules::auth::application::ports::outgoing::{
    ConfirmationCodes, NewUser, UserQuery, UserQueryError, UserRepository, UserRepositoryError,
};
use crate::modules::email::application::ports::outgoing::EmailSender;

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct SignupOutput {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SignupError {
    #[error("{0}")]
    InvalidUsername(String),

    #[error("{0}")]
    InvalidEmail(String),

    /// The username or the email is already taken by another account. The
    /// two cases are deliberately indistinguishable to the caller.
    #[error("Invalid username or email")]
    Conflict,

    #[error("Repository error: {0}")]
    RepositoryError(#[from] UserRepositoryError),

    #[error("Query error: {0}")]
    QueryError(#[from] UserQueryError),
}

#[async_trait]
pub trait ISignupUseCase: Send + Sync {
    async fn execute(&self, input: SignupInput) -> Result<SignupOutput, SignupError>;
}

pub struct SignupUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    query: Q,
    repository: R,
    codes: Arc<dyn ConfirmationCodes>,
    mailer: Arc<dyn EmailSender>,
}

impl<Q, R> SignupUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    pub fn new(
        query: Q,
        repository: R,
        codes: Arc<dyn ConfirmationCodes>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            query,
            repository,
            codes,
            mailer,
        }
    }

    /// Locate the record matching this exact (username, email) pair, or
    /// create one. Any partial collision is a conflict.
    async fn get_or_create(&self, input: &SignupInput) -> Result<User, SignupError> {
        let by_username = self.query.find_by_username(&input.username).await?;
        let by_email = self.query.find_by_email(&input.email).await?;

        match (by_username, by_email) {
            (Some(u), Some(e)) if u.id == e.id => Ok(u),
            (None, None) => {
                let new = NewUser::signup(input.username.clone(), input.email.clone());
                match self.repository.create_user(new).await {
                    Ok(user) => Ok(user),
                    // Lost a concurrent insert race on one of the unique
                    // columns; same conflated answer as the pre-check.
                    Err(UserRepositoryError::UserAlreadyExists) => Err(SignupError::Conflict),
                    Err(e) => Err(e.into()),
                }
            }
            _ => Err(SignupError::Conflict),
        }
    }
}

#[async_trait]
impl<Q, R> ISignupUseCase for SignupUseCase<Q, R>
where
    Q: UserQuery,
    R: UserRepository,
{
    async fn execute(&self, input: SignupInput) -> Result<SignupOutput, SignupError> {
        validate_username(&input.username).map_err(SignupError::InvalidUsername)?;
        validate_email(&input.email).map_err(SignupError::InvalidEmail)?;

        let user = self.get_or_create(&input).await?;

        let code = self.codes.issue(&user);
        let body = format!("Confirmation code: {}", code);

        // Best effort: the account exists either way, and re-running signup
        // with the same pair issues a fresh code.
        if let Err(e) = self
            .mailer
            .send_email(&user.email, "Registration", &body)
            .await
        {
            warn!(
                username = %user.username,
                email = %user.email,
                error = %e,
                "Confirmation email dispatch failed"
            );
        }

        Ok(SignupOutput {
            username: user.username,
            email: user.email,
        })
    }
}
