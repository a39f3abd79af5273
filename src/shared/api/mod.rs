pub mod json_config;
pub mod query;
pub mod response;

pub use query::PageQuery;
pub use response::{ApiError, ApiResponse};
