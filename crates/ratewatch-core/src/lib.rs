pub mod app_config;
pub mod config;
pub mod cutoff;
pub mod merge;
pub mod rating;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use cutoff::{cutoff_date, cutoff_date_for};
pub use merge::{merge, LiveMerge};
pub use rating::{RatingCategory, RatingSnapshot, RatingValue, RowExtraction};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
