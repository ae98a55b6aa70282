pub mod app_config;
pub mod config;
pub mod geo;
pub mod seed;
pub mod types;

pub use app_config::{AppConfig, Environment, SearchConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, km_to_miles, round_one_decimal};
pub use seed::{load_seed_file, SeedDrink, SeedFile, SeedShop};
pub use types::{
    Coordinates, DrinkCandidate, ExternalReview, PlaceDetail, SearchResult, ShopCandidate,
    ShopSource,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[source] serde_yaml::Error),

    #[error("seed file validation failed: {0}")]
    Validation(String),
}
