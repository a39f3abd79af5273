pub mod app_state_builder;

pub use app_state_builder::TestAppStateBuilder;

use actix_web::web;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::User;
use crate::modules::auth::application::ports::outgoing::{
    TokenClaims, TokenError, TokenProvider, UserQuery, UserQueryError,
};
use crate::shared::pagination::{Page, PageRequest};

/// Token provider for handler tests: the bearer token IS the user id.
pub struct StubTokenProvider;

impl StubTokenProvider {
    pub fn app_data() -> web::Data<Arc<dyn TokenProvider>> {
        web::Data::new(Arc::new(StubTokenProvider) as Arc<dyn TokenProvider>)
    }
}

impl TokenProvider for StubTokenProvider {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        Ok(user_id.to_string())
    }

    fn verify_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let sub = Uuid::parse_str(token).map_err(|_| TokenError::MalformedToken)?;
        Ok(TokenClaims {
            sub,
            exp: i64::MAX,
            iat: 0,
            nbf: 0,
        })
    }
}

struct SingleUserQuery {
    user: User,
}

#[async_trait]
impl UserQuery for SingleUserQuery {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        Ok((self.user.id == user_id).then(|| self.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserQueryError> {
        Ok((self.user.username == username).then(|| self.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserQueryError> {
        Ok((self.user.email == email).then(|| self.user.clone()))
    }

    async fn list(
        &self,
        _search: Option<&str>,
        _page: PageRequest,
    ) -> Result<Page<User>, UserQueryError> {
        Ok(Page {
            items: vec![self.user.clone()],
            total: 1,
        })
    }
}

/// Caller-resolution backend knowing exactly one user.
pub fn single_user_query(user: User) -> Arc<dyn UserQuery> {
    Arc::new(SingleUserQuery { user })
}
