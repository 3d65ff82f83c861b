use crate::auth::AdminAccount;
use crate::helpers::CookiePolicy;
use serde;

pub const DEV_JWT_SECRET: &str = "development-only-secret-change-me";
/// Upper bound for `auth.token_ttl_days`.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub app_port: u16,
    pub app_host: String,
    #[serde(default)]
    pub environment: Environment,
    /// Default tracing filter, `RUST_LOG` takes precedence.
    #[serde(default)]
    pub log_level: Option<String>,
    pub auth: AuthSettings,
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `development` or `production`."
            )),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_token_ttl_days() -> i64 {
    30
}

fn default_cookie_name() -> String {
    "adminToken".to_string()
}

impl AuthSettings {
    /// Let `ADMIN_JWT_SECRET` override whatever the file says.
    fn apply_env(&mut self) {
        if let Ok(secret) = std::env::var("ADMIN_JWT_SECRET") {
            self.jwt_secret = secret;
        }
    }
}

impl Settings {
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> String {
        match &self.log_level {
            Some(level) if !level.trim().is_empty() => level.trim().to_lowercase(),
            _ if self.is_development() => "debug".to_string(),
            _ => "info".to_string(),
        }
    }

    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy {
            name: self.auth.cookie_name.clone(),
            secure: !self.is_development(),
            max_age_days: self.auth.token_ttl_days,
        }
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.auth.token_ttl_days) {
            return Err(config::ConfigError::Message(format!(
                "auth.token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}"
            )));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(config::ConfigError::NotFound("ADMIN_JWT_SECRET".to_string()));
        }

        if !self.is_development() && self.auth.jwt_secret == DEV_JWT_SECRET {
            return Err(config::ConfigError::Message(
                "the development JWT secret cannot be used in production".to_string(),
            ));
        }

        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    if let Ok(environment) = std::env::var("APP_ENVIRONMENT") {
        config.environment =
            Environment::try_from(environment).map_err(config::ConfigError::Message)?;
    }
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        config.log_level = Some(level);
    }
    config.auth.apply_env();

    config.validate()?;
    Ok(config)
}
