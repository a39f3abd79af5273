pub mod api;
pub mod config;
pub mod health;
pub mod modules;
pub mod shared;

pub use modules::access;
pub use modules::auth;
pub use modules::catalog;
pub use modules::email;
pub use modules::reviews;

use crate::auth::adapter::outgoing::confirmation_codes::StatelessCodeGenerator;
use crate::auth::adapter::outgoing::jwt::{JwtConfig, JwtTokenService};
use crate::auth::adapter::outgoing::user_query_postgres::UserQueryPostgres;
use crate::auth::adapter::outgoing::user_repository_postgres::UserRepositoryPostgres;
use crate::auth::application::ports::outgoing::{ConfirmationCodes, TokenProvider, UserQuery};
use crate::auth::application::use_cases::{
    issue_token::{IIssueTokenUseCase, IssueTokenUseCase},
    manage_users::{IManageUsersUseCase, ManageUsersUseCase},
    own_profile::{IOwnProfileUseCase, OwnProfileUseCase},
    signup::{ISignupUseCase, SignupUseCase},
};

use crate::catalog::adapter::outgoing::classifier_repository_postgres::{
    CategoryRepositoryPostgres, GenreRepositoryPostgres,
};
use crate::catalog::adapter::outgoing::title_repository_postgres::TitleRepositoryPostgres;
use crate::catalog::application::use_cases::classifiers::{ClassifierUseCase, IClassifierUseCase};
use crate::catalog::application::use_cases::titles::{ITitleUseCase, TitleUseCase};

use crate::email::adapter::outgoing::smtp_sender::SmtpEmailSender;
use crate::email::application::ports::outgoing::EmailSender;

use crate::reviews::adapter::outgoing::comment_repository_postgres::CommentRepositoryPostgres;
use crate::reviews::adapter::outgoing::review_repository_postgres::ReviewRepositoryPostgres;
use crate::reviews::application::use_cases::comments::{CommentsUseCase, ICommentsUseCase};
use crate::reviews::application::use_cases::reviews::{IReviewsUseCase, ReviewsUseCase};

use crate::config::AppConfig;
use crate::shared::api::json_config::custom_json_config;

use actix_web::{web, App, HttpServer};
use sea_orm::{ConnectOptions, Database};
use std::sync::Arc;
use std::time::Duration;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub signup_use_case: Arc<dyn ISignupUseCase>,
    pub issue_token_use_case: Arc<dyn IIssueTokenUseCase>,
    pub manage_users_use_case: Arc<dyn IManageUsersUseCase>,
    pub own_profile_use_case: Arc<dyn IOwnProfileUseCase>,
    pub category_use_case: Arc<dyn IClassifierUseCase>,
    pub genre_use_case: Arc<dyn IClassifierUseCase>,
    pub title_use_case: Arc<dyn ITitleUseCase>,
    pub review_use_case: Arc<dyn IReviewsUseCase>,
    pub comment_use_case: Arc<dyn ICommentsUseCase>,
    // Caller records are loaded per request so role changes bite immediately.
    pub user_query: Arc<dyn UserQuery>,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    let config = AppConfig::from_env();

    let server_url = config.server_url();
    println!("Server run on: {}", server_url);

    // Database connection
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    let db_arc = Arc::new(conn);

    // Outgoing adapters
    let smtp_sender = SmtpEmailSender::from_config(&config.smtp, &config.admin_email)
        .expect("Failed to build SMTP transport");
    let mailer_arc: Arc<dyn EmailSender> = Arc::new(smtp_sender);

    let jwt_service = JwtTokenService::new(JwtConfig::from_env());
    let codes_arc: Arc<dyn ConfirmationCodes> = Arc::new(StatelessCodeGenerator::new(
        config.confirmation_secret.clone(),
        config.confirmation_code_expiry,
    ));

    let user_repo = UserRepositoryPostgres::new(Arc::clone(&db_arc));
    let user_query = UserQueryPostgres::new(Arc::clone(&db_arc));
    let category_repo = CategoryRepositoryPostgres::new(Arc::clone(&db_arc));
    let genre_repo = GenreRepositoryPostgres::new(Arc::clone(&db_arc));
    let title_repo = TitleRepositoryPostgres::new(Arc::clone(&db_arc));
    let review_repo = ReviewRepositoryPostgres::new(Arc::clone(&db_arc));
    let comment_repo = CommentRepositoryPostgres::new(Arc::clone(&db_arc));

    // Use cases
    let signup_use_case = SignupUseCase::new(
        user_query.clone(),
        user_repo.clone(),
        Arc::clone(&codes_arc),
        Arc::clone(&mailer_arc),
    );
    let issue_token_use_case = IssueTokenUseCase::new(
        user_query.clone(),
        Arc::clone(&codes_arc),
        Arc::new(jwt_service.clone()),
    );
    let manage_users_use_case = ManageUsersUseCase::new(user_query.clone(), user_repo.clone());
    let own_profile_use_case = OwnProfileUseCase::new(user_query.clone(), user_repo);

    let category_use_case = ClassifierUseCase::new(category_repo);
    let genre_use_case = ClassifierUseCase::new(genre_repo);
    let title_use_case = TitleUseCase::new(title_repo.clone());
    let review_use_case = ReviewsUseCase::new(review_repo.clone(), Arc::new(title_repo));
    let comment_use_case = CommentsUseCase::new(comment_repo, Arc::new(review_repo));

    let state = AppState {
        signup_use_case: Arc::new(signup_use_case),
        issue_token_use_case: Arc::new(issue_token_use_case),
        manage_users_use_case: Arc::new(manage_users_use_case),
        own_profile_use_case: Arc::new(own_profile_use_case),
        category_use_case: Arc::new(category_use_case),
        genre_use_case: Arc::new(genre_use_case),
        title_use_case: Arc::new(title_use_case),
        review_use_case: Arc::new(review_use_case),
        comment_use_case: Arc::new(comment_use_case),
        user_query: Arc::new(user_query),
    };

    let token_provider_arc: Arc<dyn TokenProvider> = Arc::new(jwt_service);
    let db_for_server = Arc::clone(&db_arc);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(Arc::clone(&token_provider_arc)))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .app_data(custom_json_config())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
            )
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // Auth
    cfg.service(crate::auth::adapter::incoming::web::routes::signup_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::issue_token_handler);
    // Users ("me" must be registered before "{username}")
    cfg.service(crate::auth::adapter::incoming::web::routes::own_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::update_own_profile_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::list_users_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::create_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::get_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::update_user_handler);
    cfg.service(crate::auth::adapter::incoming::web::routes::delete_user_handler);
    // Catalog
    cfg.service(crate::catalog::adapter::incoming::web::routes::list_categories_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::create_category_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::delete_category_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::list_genres_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::create_genre_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::delete_genre_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::list_titles_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::get_title_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::create_title_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::update_title_handler);
    cfg.service(crate::catalog::adapter::incoming::web::routes::delete_title_handler);
    // Reviews
    cfg.service(crate::reviews::adapter::incoming::web::routes::list_reviews_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::get_review_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::create_review_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::update_review_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::delete_review_handler);
    // Comments
    cfg.service(crate::reviews::adapter::incoming::web::routes::list_comments_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::get_comment_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::create_comment_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::update_comment_handler);
    cfg.service(crate::reviews::adapter::incoming::web::routes::delete_comment_handler);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
