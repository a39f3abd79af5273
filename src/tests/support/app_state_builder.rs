use actix_web::web;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::auth::application::domain::entities::User;
use crate::modules::auth::application::ports::outgoing::{UserPatch, UserQuery, UserQueryError};
use crate::modules::auth::application::use_cases::issue_token::{
    IIssueTokenUseCase, IssueTokenError, IssueTokenInput,
};
use crate::modules::auth::application::use_cases::manage_users::{
    AdminCreateUserInput, IManageUsersUseCase, ManageUsersError,
};
use crate::modules::auth::application::use_cases::own_profile::{
    IOwnProfileUseCase, OwnProfileError, OwnProfilePatch,
};
use crate::modules::auth::application::use_cases::signup::{
    ISignupUseCase, SignupError, SignupInput, SignupOutput,
};
use crate::modules::catalog::application::domain::entities::{Classifier, Title};
use crate::modules::catalog::application::ports::outgoing::{
    NewClassifier, NewTitle, TitleFilter, TitlePatch,
};
use crate::modules::catalog::application::use_cases::classifiers::{
    ClassifierError, IClassifierUseCase,
};
use crate::modules::catalog::application::use_cases::titles::{ITitleUseCase, TitleError};
use crate::modules::reviews::application::domain::entities::{Comment, Review};
use crate::modules::reviews::application::ports::outgoing::{CommentPatch, ReviewPatch};
use crate::modules::reviews::application::use_cases::comments::{CommentError, ICommentsUseCase};
use crate::modules::reviews::application::use_cases::reviews::{
    CreateReviewInput, IReviewsUseCase, ReviewError,
};
use crate::shared::pagination::{Page, PageRequest};
use crate::AppState;

// ============================================================================
// Placeholder implementations: a test touching an unconfigured use case
// fails loudly instead of silently succeeding.
// ============================================================================

struct UnusedSignup;

#[async_trait]
impl ISignupUseCase for UnusedSignup {
    async fn execute(&self, _: SignupInput) -> Result<SignupOutput, SignupError> {
        panic!("signup use case not configured for this test")
    }
}

struct UnusedIssueToken;

#[async_trait]
impl IIssueTokenUseCase for UnusedIssueToken {
    async fn execute(&self, _: IssueTokenInput) -> Result<String, IssueTokenError> {
        panic!("issue-token use case not configured for this test")
    }
}

struct UnusedManageUsers;

#[async_trait]
impl IManageUsersUseCase for UnusedManageUsers {
    async fn list(
        &self,
        _: &User,
        _: Option<&str>,
        _: PageRequest,
    ) -> Result<Page<User>, ManageUsersError> {
        panic!("manage-users use case not configured for this test")
    }

    async fn get(&self, _: &User, _: &str) -> Result<User, ManageUsersError> {
        panic!("manage-users use case not configured for this test")
    }

    async fn create(&self, _: &User, _: AdminCreateUserInput) -> Result<User, ManageUsersError> {
        panic!("manage-users use case not configured for this test")
    }

    async fn update(&self, _: &User, _: &str, _: UserPatch) -> Result<User, ManageUsersError> {
        panic!("manage-users use case not configured for this test")
    }

    async fn delete(&self, _: &User, _: &str) -> Result<(), ManageUsersError> {
        panic!("manage-users use case not configured for this test")
    }
}

struct UnusedOwnProfile;

#[async_trait]
impl IOwnProfileUseCase for UnusedOwnProfile {
    async fn get(&self, _: Uuid) -> Result<User, OwnProfileError> {
        panic!("own-profile use case not configured for this test")
    }

    async fn update(&self, _: Uuid, _: OwnProfilePatch) -> Result<User, OwnProfileError> {
        panic!("own-profile use case not configured for this test")
    }
}

struct UnusedClassifiers;

#[async_trait]
impl IClassifierUseCase for UnusedClassifiers {
    async fn list(
        &self,
        _: Option<&str>,
        _: PageRequest,
    ) -> Result<Page<Classifier>, ClassifierError> {
        panic!("classifier use case not configured for this test")
    }

    async fn create(
        &self,
        _: Option<&User>,
        _: NewClassifier,
    ) -> Result<Classifier, ClassifierError> {
        panic!("classifier use case not configured for this test")
    }

    async fn delete(&self, _: Option<&User>, _: &str) -> Result<(), ClassifierError> {
        panic!("classifier use case not configured for this test")
    }
}

struct UnusedTitles;

#[async_trait]
impl ITitleUseCase for UnusedTitles {
    async fn list(&self, _: TitleFilter, _: PageRequest) -> Result<Page<Title>, TitleError> {
        panic!("title use case not configured for this test")
    }

    async fn get(&self, _: Uuid) -> Result<Title, TitleError> {
        panic!("title use case not configured for this test")
    }

    async fn create(&self, _: Option<&User>, _: NewTitle) -> Result<Title, TitleError> {
        panic!("title use case not configured for this test")
    }

    async fn update(
        &self,
        _: Option<&User>,
        _: Uuid,
        _: TitlePatch,
    ) -> Result<Title, TitleError> {
        panic!("title use case not configured for this test")
    }

    async fn delete(&self, _: Option<&User>, _: Uuid) -> Result<(), TitleError> {
        panic!("title use case not configured for this test")
    }
}

struct UnusedReviews;

#[async_trait]
impl IReviewsUseCase for UnusedReviews {
    async fn list(&self, _: Uuid, _: PageRequest) -> Result<Page<Review>, ReviewError> {
        panic!("reviews use case not configured for this test")
    }

    async fn get(&self, _: Uuid, _: Uuid) -> Result<Review, ReviewError> {
        panic!("reviews use case not configured for this test")
    }

    async fn create(
        &self,
        _: Option<&User>,
        _: Uuid,
        _: CreateReviewInput,
    ) -> Result<Review, ReviewError> {
        panic!("reviews use case not configured for this test")
    }

    async fn update(
        &self,
        _: Option<&User>,
        _: Uuid,
        _: Uuid,
        _: ReviewPatch,
    ) -> Result<Review, ReviewError> {
        panic!("reviews use case not configured for this test")
    }

    async fn delete(&self, _: Option<&User>, _: Uuid, _: Uuid) -> Result<(), ReviewError> {
        panic!("reviews use case not configured for this test")
    }
}

struct UnusedComments;

#[async_trait]
impl ICommentsUseCase for UnusedComments {
    async fn list(
        &self,
        _: Uuid,
        _: Uuid,
        _: PageRequest,
    ) -> Result<Page<Comment>, CommentError> {
        panic!("comments use case not configured for this test")
    }

    async fn get(&self, _: Uuid, _: Uuid, _: Uuid) -> Result<Comment, CommentError> {
        panic!("comments use case not configured for this test")
    }

    async fn create(
        &self,
        _: Option<&User>,
        _: Uuid,
        _: Uuid,
        _: String,
    ) -> Result<Comment, CommentError> {
        panic!("comments use case not configured for this test")
    }

    async fn update(
        &self,
        _: Option<&User>,
        _: Uuid,
        _: Uuid,
        _: Uuid,
        _: CommentPatch,
    ) -> Result<Comment, CommentError> {
        panic!("comments use case not configured for this test")
    }

    async fn delete(
        &self,
        _: Option<&User>,
        _: Uuid,
        _: Uuid,
        _: Uuid,
    ) -> Result<(), CommentError> {
        panic!("comments use case not configured for this test")
    }
}

struct UnusedUserQuery;

#[async_trait]
impl UserQuery for UnusedUserQuery {
    async fn find_by_id(&self, _: Uuid) -> Result<Option<User>, UserQueryError> {
        panic!("user query not configured for this test")
    }

    async fn find_by_username(&self, _: &str) -> Result<Option<User>, UserQueryError> {
        panic!("user query not configured for this test")
    }

    async fn find_by_email(&self, _: &str) -> Result<Option<User>, UserQueryError> {
        panic!("user query not configured for this test")
    }

    async fn list(
        &self,
        _: Option<&str>,
        _: PageRequest,
    ) -> Result<Page<User>, UserQueryError> {
        panic!("user query not configured for this test")
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Default)]
pub struct TestAppStateBuilder {
    signup: Option<Arc<dyn ISignupUseCase>>,
    issue_token: Option<Arc<dyn IIssueTokenUseCase>>,
    manage_users: Option<Arc<dyn IManageUsersUseCase>>,
    own_profile: Option<Arc<dyn IOwnProfileUseCase>>,
    categories: Option<Arc<dyn IClassifierUseCase>>,
    genres: Option<Arc<dyn IClassifierUseCase>>,
    titles: Option<Arc<dyn ITitleUseCase>>,
    reviews: Option<Arc<dyn IReviewsUseCase>>,
    comments: Option<Arc<dyn ICommentsUseCase>>,
    user_query: Option<Arc<dyn UserQuery>>,
}

impl TestAppStateBuilder {
    pub fn with_signup(mut self, uc: Arc<dyn ISignupUseCase>) -> Self {
        self.signup = Some(uc);
        self
    }

    pub fn with_issue_token(mut self, uc: Arc<dyn IIssueTokenUseCase>) -> Self {
        self.issue_token = Some(uc);
        self
    }

    pub fn with_manage_users(mut self, uc: Arc<dyn IManageUsersUseCase>) -> Self {
        self.manage_users = Some(uc);
        self
    }

    pub fn with_own_profile(mut self, uc: Arc<dyn IOwnProfileUseCase>) -> Self {
        self.own_profile = Some(uc);
        self
    }

    pub fn with_categories(mut self, uc: Arc<dyn IClassifierUseCase>) -> Self {
        self.categories = Some(uc);
        self
    }

    pub fn with_genres(mut self, uc: Arc<dyn IClassifierUseCase>) -> Self {
        self.genres = Some(uc);
        self
    }

    pub fn with_titles(mut self, uc: Arc<dyn ITitleUseCase>) -> Self {
        self.titles = Some(uc);
        self
    }

    pub fn with_reviews(mut self, uc: Arc<dyn IReviewsUseCase>) -> Self {
        self.reviews = Some(uc);
        self
    }

    pub fn with_comments(mut self, uc: Arc<dyn ICommentsUseCase>) -> Self {
        self.comments = Some(uc);
        self
    }

    pub fn with_user_query(mut self, query: Arc<dyn UserQuery>) -> Self {
        self.user_query = Some(query);
        self
    }

    pub fn build(self) -> web::Data<AppState> {
        web::Data::new(AppState {
            signup_use_case: self.signup.unwrap_or_else(|| Arc::new(UnusedSignup)),
            issue_token_use_case: self
                .issue_token
                .unwrap_or_else(|| Arc::new(UnusedIssueToken)),
            manage_users_use_case: self
                .manage_users
                .unwrap_or_else(|| Arc::new(UnusedManageUsers)),
            own_profile_use_case: self
                .own_profile
                .unwrap_or_else(|| Arc::new(UnusedOwnProfile)),
            category_use_case: self
                .categories
                .unwrap_or_else(|| Arc::new(UnusedClassifiers)),
            genre_use_case: self.genres.unwrap_or_else(|| Arc::new(UnusedClassifiers)),
            title_use_case: self.titles.unwrap_or_else(|| Arc::new(UnusedTitles)),
            review_use_case: self.reviews.unwrap_or_else(|| Arc::new(UnusedReviews)),
            comment_use_case: self.comments.unwrap_or_else(|| Arc::new(UnusedComments)),
            user_query: self.user_query.unwrap_or_else(|| Arc::new(UnusedUserQuery)),
        })
    }
}
