pub mod code_issuer;
pub mod token_provider;
pub mod user_query;
pub mod user_repository;

pub use code_issuer::ConfirmationCodes;
pub use token_provider::{TokenClaims, TokenError, TokenProvider};
pub use user_query::{UserQuery, UserQueryError};
pub use user_repository::{NewUser, UserPatch, UserRepository, UserRepositoryError};
