use std::net::SocketAddr;
use std::path::PathBuf;

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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub seed_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub google_places_api_key: Option<String>,
    pub foursquare_api_key: Option<String>,
    pub enable_community_map: bool,
    pub provider_timeout_ms: u64,
    pub search_radius_km: f64,
    pub community_radius_km: f64,
    pub location_timeout_ms: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("seed_path", &self.seed_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "google_places_api_key",
                &self.google_places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "foursquare_api_key",
                &self.foursquare_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("enable_community_map", &self.enable_community_map)
            .field("provider_timeout_ms", &self.provider_timeout_ms)
            .field("search_radius_km", &self.search_radius_km)
            .field("community_radius_km", &self.community_radius_km)
            .field("location_timeout_ms", &self.location_timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Explicit configuration for the search aggregator and its outbound collaborators.
///
/// Built once at startup and handed to the search service; nothing in the
/// search path reads the process environment directly.
#[derive(Clone)]
pub struct SearchConfig {
    pub primary_provider_key: Option<String>,
    pub budget_provider_key: Option<String>,
    pub enable_community_map_provider: bool,
    pub provider_timeout_ms: u64,
    pub search_radius_km: f64,
    pub community_radius_km: f64,
    pub location_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_provider_key: None,
            budget_provider_key: None,
            enable_community_map_provider: true,
            provider_timeout_ms: 8_000,
            search_radius_km: 50.0,
            community_radius_km: 8.0,
            location_timeout_ms: 3_000,
            user_agent: "beanverdict/0.1 (coffee-search)".to_string(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            primary_provider_key: config.google_places_api_key.clone(),
            budget_provider_key: config.foursquare_api_key.clone(),
            enable_community_map_provider: config.enable_community_map,
            provider_timeout_ms: config.provider_timeout_ms,
            search_radius_km: config.search_radius_km,
            community_radius_km: config.community_radius_km,
            location_timeout_ms: config.location_timeout_ms,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field(
                "primary_provider_key",
                &self.primary_provider_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "budget_provider_key",
                &self.budget_provider_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "enable_community_map_provider",
                &self.enable_community_map_provider,
            )
            .field("provider_timeout_ms", &self.provider_timeout_ms)
            .field("search_radius_km", &self.search_radius_km)
            .field("community_radius_km", &self.community_radius_km)
            .field("location_timeout_ms", &self.location_timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
