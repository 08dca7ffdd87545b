mod app_config;
mod config;
pub mod genre;
pub mod hours;
mod restaurant;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use genre::{classify, Genre};
pub use hours::{is_open_now, parse_hhmm, OpeningPeriod};
pub use restaurant::{RestaurantRecord, ZipCodeSnapshot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
