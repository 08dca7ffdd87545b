use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Postgres URL for the snapshot store. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Origin allowed by CORS (the web frontend).
    pub frontend_url: String,
    /// Places provider credential. Only required on the cache-miss path.
    pub google_places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub places_user_agent: String,
    pub page_token_delay_ms: u64,
    pub max_places: usize,
    pub enrich_batch_size: usize,
    pub enrich_batch_delay_ms: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("frontend_url", &self.frontend_url)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_places_api_key",
                &self.google_places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("places_user_agent", &self.places_user_agent)
            .field("page_token_delay_ms", &self.page_token_delay_ms)
            .field("max_places", &self.max_places)
            .field("enrich_batch_size", &self.enrich_batch_size)
            .field("enrich_batch_delay_ms", &self.enrich_batch_delay_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
