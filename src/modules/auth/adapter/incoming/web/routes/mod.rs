pub mod me;
pub mod signup;
pub mod token;
pub mod users;

pub use me::{update_own_profile_handler, own_profile_handler, UpdateProfileRequest};
pub use signup::{signup_handler, SignupRequest, SignupResponse};
pub use token::{issue_token_handler, IssueTokenRequest, IssueTokenResponse};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler, CreateUserRequest, UpdateUserRequest, UserResponse, UsersPageResponse,
};
