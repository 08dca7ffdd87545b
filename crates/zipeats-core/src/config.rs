use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Treat empty values the same as unset so `KEY=` in a .env file disables it.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("ZIPEATS_ENV", "development"));

    let database_url = optional("DATABASE_URL");
    if database_url.is_none() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let bind_addr = parse_addr("ZIPEATS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ZIPEATS_LOG_LEVEL", "info");
    let frontend_url = or_default("ZIPEATS_FRONTEND_URL", "http://localhost:5173");

    let google_places_api_key = optional("GOOGLE_PLACES_API_KEY");
    let places_base_url = or_default(
        "ZIPEATS_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/place/",
    );
    let places_timeout_secs = parse_u64("ZIPEATS_PLACES_TIMEOUT_SECS", "30")?;
    let places_user_agent = or_default(
        "ZIPEATS_PLACES_USER_AGENT",
        "zipeats/0.1 (restaurant-lookup)",
    );
    let page_token_delay_ms = parse_u64("ZIPEATS_PAGE_TOKEN_DELAY_MS", "2000")?;
    let max_places = parse_usize("ZIPEATS_MAX_PLACES", "60")?;

    let enrich_batch_size = parse_usize("ZIPEATS_ENRICH_BATCH_SIZE", "10")?;
    if enrich_batch_size == 0 {
        return Err(invalid(
            "ZIPEATS_ENRICH_BATCH_SIZE",
            "batch size must be at least 1".to_string(),
        ));
    }
    let enrich_batch_delay_ms = parse_u64("ZIPEATS_ENRICH_BATCH_DELAY_MS", "100")?;

    let db_max_connections = parse_u32("ZIPEATS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("ZIPEATS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ZIPEATS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let rate_limit_max_requests = parse_usize("ZIPEATS_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("ZIPEATS_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        frontend_url,
        google_places_api_key,
        places_base_url,
        places_timeout_secs,
        places_user_agent,
        page_token_delay_ms,
        max_places,
        enrich_batch_size,
        enrich_batch_delay_ms,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
