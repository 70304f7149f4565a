use env_logger::Env;

use crate::config::{AppConfig, Environment};
use crate::errors::AppError;

/// Default `RUST_LOG` filter for each environment
fn default_filter(app: &AppConfig) -> String {
    match app.environment {
        Environment::Development => app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info,sqlx=warn".to_string(),
        Environment::Production => "info,actix_web=warn,sqlx=warn".to_string(),
    }
}

// Setup logging with custom format and configuration
pub fn setup_logging(app: &AppConfig) -> Result<(), AppError> {
    let env = Env::default()
        .filter_or("RUST_LOG", default_filter(app))
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

/// Access log format for actix's `Logger`
pub fn access_log_format(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => {
            "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}o"
        }
        _ => "%a \"%r\" %s %b %T %{X-Request-ID}o",
    }
}
