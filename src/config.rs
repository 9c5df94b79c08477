//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `SMITA_*` environment variable overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::AdminAccount;
use crate::booking::BookingPolicy;
use crate::repository::memory::demo_tables;
use crate::repository::{Table, TimeSlot};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub restaurant: RestaurantConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub booking: BookingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Dining room and booking rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantConfig {
    #[serde(default = "default_restaurant_name")]
    pub name: String,

    /// Bookable start times, `HH:MM`
    #[serde(default = "default_time_slots")]
    pub time_slots: Vec<String>,

    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,

    #[serde(default = "default_party_size")]
    pub default_party_size: u32,

    #[serde(default)]
    pub allow_past_dates: bool,

    /// Seed the two demo reservations at startup
    #[serde(default = "default_demo_reservations")]
    pub demo_reservations: bool,

    #[serde(default = "demo_tables")]
    pub tables: Vec<Table>,
}

fn default_restaurant_name() -> String {
    "Smita Restaurant".to_string()
}

fn default_time_slots() -> Vec<String> {
    TimeSlot::evening_service()
        .iter()
        .map(|slot| slot.to_string())
        .collect()
}

fn default_max_party_size() -> u32 {
    8
}

fn default_party_size() -> u32 {
    2
}

fn default_demo_reservations() -> bool {
    true
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: default_restaurant_name(),
            time_slots: default_time_slots(),
            max_party_size: default_max_party_size(),
            default_party_size: default_party_size(),
            allow_past_dates: false,
            demo_reservations: default_demo_reservations(),
            tables: demo_tables(),
        }
    }
}

/// Notification store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_notification_duration")]
    pub default_duration_ms: u64,
}

fn default_notification_duration() -> u64 {
    5000
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_notification_duration(),
        }
    }
}

/// Admin accounts and session lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admins")]
    pub admins: Vec<AdminAccount>,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_admins() -> Vec<AdminAccount> {
    vec![AdminAccount::new("admin@smitarestaurant.com", "admin123")]
}

fn default_session_ttl() -> u64 {
    8 * 60 * 60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admins: default_admins(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

/// Booking session housekeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_session_idle() -> u64 {
    30 * 60
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            session_idle_secs: default_session_idle(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("smita").join("config.toml")),
            Some(PathBuf::from("/etc/smita/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// An explicit path must load; otherwise fall back to the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `SMITA_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("SMITA_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("SMITA_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid SMITA_API_PORT"),
            }
        }

        // A single admin from the environment replaces the configured list
        if let (Some(email), Some(password)) =
            (lookup("SMITA_ADMIN_EMAIL"), lookup("SMITA_ADMIN_PASSWORD"))
        {
            self.auth.admins = vec![AdminAccount::new(email, password)];
        }

        if let Some(level) = lookup("SMITA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SMITA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Check cross-field rules serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let slots = self.time_slots()?;
        if slots.is_empty() {
            return Err(ConfigError::Invalid("restaurant.time_slots is empty".to_string()));
        }

        let restaurant = &self.restaurant;
        if restaurant.max_party_size == 0 {
            return Err(ConfigError::Invalid(
                "restaurant.max_party_size must be positive".to_string(),
            ));
        }
        if restaurant.default_party_size == 0
            || restaurant.default_party_size > restaurant.max_party_size
        {
            return Err(ConfigError::Invalid(format!(
                "restaurant.default_party_size must be between 1 and {}",
                restaurant.max_party_size
            )));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.notifications.default_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "notifications.default_duration_ms must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for table in &restaurant.tables {
            if table.capacity == 0 {
                return Err(ConfigError::Invalid(format!(
                    "table {} has zero capacity",
                    table.id
                )));
            }
            if !seen.insert(table.id) {
                return Err(ConfigError::Invalid(format!("duplicate table id {}", table.id)));
            }
        }

        if self.auth.admins.is_empty() {
            tracing::warn!("No admin accounts configured; the dashboard is unreachable");
        }

        Ok(())
    }

    /// Parsed, sorted and de-duplicated time slots
    pub fn time_slots(&self) -> Result<Vec<TimeSlot>, ConfigError> {
        let mut slots = self
            .restaurant
            .time_slots
            .iter()
            .map(|raw| {
                raw.parse::<TimeSlot>()
                    .map_err(|_| ConfigError::Invalid(format!("malformed time slot {:?}", raw)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        slots.sort();
        slots.dedup();
        Ok(slots)
    }

    pub fn booking_policy(&self) -> Result<BookingPolicy, ConfigError> {
        Ok(BookingPolicy {
            time_slots: self.time_slots()?,
            max_party_size: self.restaurant.max_party_size,
            default_party_size: self.restaurant.default_party_size,
            allow_past_dates: self.restaurant.allow_past_dates,
        })
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notifications.default_duration_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_ttl_secs)
    }

    pub fn booking_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.booking.session_idle_secs)
    }

    pub fn booking_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.booking.sweep_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Smita Restaurant Configuration
#
# Environment variables override these settings:
# - SMITA_API_HOST
# - SMITA_API_PORT
# - SMITA_ADMIN_EMAIL / SMITA_ADMIN_PASSWORD (replace the admin list)
# - SMITA_LOG_LEVEL
# - SMITA_LOG_FORMAT

[api]
host = "0.0.0.0"
port = 8090

# Request timeout in seconds
request_timeout_secs = 30

[restaurant]
name = "Smita Restaurant"

# Bookable start times (HH:MM)
time_slots = ["17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30", "21:00", "21:30"]

max_party_size = 8
default_party_size = 2

# Accept bookings for dates before today
allow_past_dates = false

# Seed two demo reservations at startup
demo_reservations = true

[[restaurant.tables]]
id = 1
name = "Table 1"
capacity = 2
location = "Window"

[[restaurant.tables]]
id = 2
name = "Table 2"
capacity = 4
location = "Main Floor"

[[restaurant.tables]]
id = 3
name = "Table 3"
capacity = 6
location = "Private Room"
available = false

[[restaurant.tables]]
id = 4
name = "Table 4"
capacity = 2
location = "Bar Area"

[[restaurant.tables]]
id = 5
name = "Table 5"
capacity = 8
location = "Private Room"

[[restaurant.tables]]
id = 6
name = "Table 6"
capacity = 4
location = "Patio"

[notifications]
# How long a notification stays up (ms), must be positive
default_duration_ms = 5000

[auth]
# Admin session lifetime in seconds
session_ttl_secs = 28800

[[auth.admins]]
email = "admin@smitarestaurant.com"
password = "admin123"

[booking]
# Abandoned booking sessions are dropped after this many idle seconds
session_idle_secs = 1800
sweep_interval_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
