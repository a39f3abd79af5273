use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::modules::auth::application::ports::outgoing::{
    ConfirmationCodes, TokenError, TokenProvider, UserQuery, UserQueryError,
};

#[derive(Debug, Clone)]
pub struct IssueTokenInput {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IssueTokenError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid confirmation code")]
    InvalidCode,

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),

    #[error("Query error: {0}")]
    QueryError(#[from] UserQueryError),
}

#[async_trait]
pub trait IIssueTokenUseCase: Send + Sync {
    /// Returns the opaque bearer token on success. Nothing is minted on
    /// failure.
    async fn execute(&self, input: IssueTokenInput) -> Result<String, IssueTokenError>;
}

pub struct IssueTokenUseCase<Q>
where
    Q: UserQuery,
{
    query: Q,
    codes: Arc<dyn ConfirmationCodes>,
    tokens: Arc<dyn TokenProvider>,
}

impl<Q> IssueTokenUseCase<Q>
where
    Q: UserQuery,
{
    pub fn new(query: Q, codes: Arc<dyn ConfirmationCodes>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            query,
            codes,
            tokens,
        }
    }
}

#[async_trait]
impl<Q> IIssueTokenUseCase for IssueTokenUseCase<Q>
where
    Q: UserQuery,
{
    async fn execute(&self, input: IssueTokenInput) -> Result<String, IssueTokenError> {
        let user = self
            .query
            .find_by_username(&input.username)
            .await?
            .ok_or(IssueTokenError::UserNotFound)?;

        if !self.codes.verify(&user, &input.confirmation_code) {
            return Err(IssueTokenError::InvalidCode);
        }

        debug!(user_id = %user.id, "Confirmation code accepted, minting token");
        Ok(self.tokens.generate_access_token(user.id)?)
    }
}
