use std::env;

/// Process-wide configuration, built once at startup and handed to the
/// components that need it. Nothing reads the environment after this.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: String,
    pub database_url: String,
    pub smtp: SmtpConfig,
    pub admin_email: String,
    pub confirmation_secret: String,
    pub confirmation_code_expiry: i64, // seconds
}

#[derive(Debug, Clone)]
pub enum SmtpConfig {
    /// Authenticated relay for real deployments.
    Relay {
        server: String,
        username: String,
        password: String,
    },
    /// Plain localhost transport (Mailpit and friends).
    Local { host: String, port: u16 },
}

impl AppConfig {
    fn parse_seconds(key: &str, default: &str) -> i64 {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("Invalid {} value", key))
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let run_env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

        // Try .env.{environment} first, then fall back to .env
        let env_file = format!(".env.{}", run_env);
        if dotenvy::from_filename(&env_file).is_err() {
            dotenvy::dotenv().ok();
        }

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
        let host = env::var("HOST").expect("HOST is not set in .env file");
        let port = env::var("PORT").expect("PORT is not set in .env file");
        let admin_email = env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL is not set in .env file");

        let smtp = if run_env == "test" {
            let host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port: u16 = env::var("SMTP_PORT")
                .unwrap_or_else(|_| "1025".to_string())
                .parse()
                .expect("Invalid SMTP_PORT");
            SmtpConfig::Local { host, port }
        } else {
            SmtpConfig::Relay {
                server: env::var("SMTP_SERVER").expect("SMTP_SERVER not set"),
                username: env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set"),
                password: env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set"),
            }
        };

        let confirmation_secret =
            env::var("CONFIRMATION_SECRET").expect("CONFIRMATION_SECRET must be set");
        if confirmation_secret.len() < 32 {
            panic!("CONFIRMATION_SECRET must be at least 32 characters long");
        }

        // Codes stay valid for a day by default, like the registration
        // window of the email verification flow.
        let confirmation_code_expiry = Self::parse_seconds("CONFIRMATION_CODE_EXPIRY", "86400");
        if confirmation_code_expiry <= 0 {
            panic!("CONFIRMATION_CODE_EXPIRY must be positive");
        }

        Self {
            host,
            port,
            database_url,
            smtp,
            admin_email,
            confirmation_secret,
            confirmation_code_expiry,
        }
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
