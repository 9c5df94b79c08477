//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::{start_expiry_sweep, CredentialAuthenticator};
use crate::booking::BookingSessions;
use crate::config::{Config, ConfigError};
use crate::menu::MenuCatalog;
use crate::repository::memory::demo_reservations;
use crate::repository::InMemoryRepository;
use crate::services::Services;
use crate::shell::Shell;
use crate::state::{NotificationStore, ReservationStore};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Repository and the shared stores
    pub services: Services,
    /// Navigation, login and per-session dashboards
    pub shell: Arc<Shell>,
    /// Live booking wizards
    pub bookings: Arc<BookingSessions>,
    pub menu: Arc<MenuCatalog>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        shell: Arc<Shell>,
        bookings: Arc<BookingSessions>,
        menu: MenuCatalog,
        config: ApiConfig,
    ) -> Self {
        Self {
            services: shell.services().clone(),
            shell,
            bookings,
            menu: Arc::new(menu),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Wire the in-memory repository, stores, authenticator and booking
    /// registry from configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let reservations = if config.restaurant.demo_reservations {
            demo_reservations()
        } else {
            Vec::new()
        };
        let repository = Arc::new(InMemoryRepository::new(
            config.restaurant.tables.clone(),
            reservations,
        ));
        let services = Services::new(
            repository,
            ReservationStore::new(),
            NotificationStore::new(config.notification_duration()),
        );

        let authenticator = Arc::new(CredentialAuthenticator::new(
            config.auth.admins.clone(),
            config.session_ttl(),
        ));
        let shell = Arc::new(Shell::new(services, authenticator));
        let bookings = Arc::new(BookingSessions::new(
            config.booking_policy()?,
            config.booking_idle_timeout(),
        ));

        Ok(Self::new(shell, bookings, MenuCatalog::standard(), ApiConfig::from(config)))
    }

    /// Start the booking and admin-session sweeps and the session listener
    pub fn spawn_background_tasks(&self, sweep_every: Duration) -> Vec<tokio::task::JoinHandle<()>> {
        vec![
            self.bookings.start_background_sweep(sweep_every),
            start_expiry_sweep(self.shell.authenticator(), sweep_every),
            self.shell.spawn_session_listener(),
        ]
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Shown in health output
    pub restaurant_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            request_timeout: config.request_timeout(),
            restaurant_name: config.restaurant.name.clone(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
