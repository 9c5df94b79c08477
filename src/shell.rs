//! Application shell
//!
//! Navigation between the customer, menu and admin views, plus the
//! authentication plumbing in front of the management dashboard. Each admin
//! session gets its own dashboard; it is dropped when the session ends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, RwLock};

use crate::auth::{AuthError, Authenticator, Session, SessionToken};
use crate::dashboard::Dashboard;
use crate::services::Services;

/// Top-level views
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Customer,
    Menu,
    Admin,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Customer => write!(f, "customer"),
            View::Menu => write!(f, "menu"),
            View::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" | "reserve" => Ok(View::Customer),
            "menu" => Ok(View::Menu),
            "admin" => Ok(View::Admin),
            other => Err(format!("Unknown view: {}", other)),
        }
    }
}

/// Outcome of asking for a view
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Navigation {
    pub view: View,
    pub authenticated: bool,
    /// The admin view was requested without a session: show the login gate
    pub login_required: bool,
}

/// The view to show once authentication state changes
///
/// Losing the session while on the admin view falls back to the customer view.
pub fn fallback_view(current: View, authenticated: bool) -> View {
    match current {
        View::Admin if !authenticated => View::Customer,
        view => view,
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,
}

impl From<AuthError> for ShellError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ShellError::InvalidCredentials,
            AuthError::UnknownSession => ShellError::Unauthenticated,
        }
    }
}

pub type ShellResult<T> = Result<T, ShellError>;

pub struct Shell {
    services: Services,
    authenticator: Arc<dyn Authenticator>,
    dashboards: RwLock<HashMap<SessionToken, Arc<Mutex<Dashboard>>>>,
}

impl Shell {
    pub fn new(services: Services, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            services,
            authenticator,
            dashboards: RwLock::new(HashMap::new()),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Resolve a requested view against the caller's session
    pub async fn navigate(&self, requested: View, token: Option<SessionToken>) -> Navigation {
        let authenticated = match token {
            Some(token) => self.authenticator.session(token).await.is_some(),
            None => false,
        };

        Navigation {
            view: requested,
            authenticated,
            login_required: requested == View::Admin && !authenticated,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ShellResult<Session> {
        match self.authenticator.sign_in(email, password).await {
            Ok(session) => Ok(session),
            Err(e) => {
                self.services.notifications.error("Invalid credentials").await;
                Err(e.into())
            }
        }
    }

    pub async fn logout(&self, token: SessionToken) -> ShellResult<()> {
        let result = self.authenticator.sign_out(token).await;
        // Listener may lag; drop eagerly too
        self.dashboards.write().await.remove(&token);
        result.map_err(ShellError::from)
    }

    /// The caller's dashboard, mounted on first access
    ///
    /// A failed mount still returns the dashboard (the failure has been
    /// notified); the next access retries the load.
    pub async fn admin_dashboard(&self, token: SessionToken) -> ShellResult<Arc<Mutex<Dashboard>>> {
        if self.authenticator.session(token).await.is_none() {
            self.dashboards.write().await.remove(&token);
            return Err(ShellError::Unauthenticated);
        }

        let dashboard = Arc::clone(
            self.dashboards
                .write()
                .await
                .entry(token)
                .or_insert_with(|| Arc::new(Mutex::new(Dashboard::new()))),
        );

        {
            let mut guard = dashboard.lock().await;
            if !guard.is_loaded() {
                // Already reported through the notification store
                let _ = guard.mount(&self.services).await;
            }
        }

        Ok(dashboard)
    }

    pub async fn dashboard_count(&self) -> usize {
        self.dashboards.read().await.len()
    }

    /// Drop dashboards whose session is no longer live
    pub async fn prune_dashboards(&self) -> usize {
        let tokens: Vec<SessionToken> = self.dashboards.read().await.keys().copied().collect();

        let mut removed = 0;
        for token in tokens {
            if self.authenticator.session(token).await.is_none()
                && self.dashboards.write().await.remove(&token).is_some()
            {
                removed += 1;
            }
        }
        removed
    }

    /// Drop dashboards whose session signs out or expires
    pub fn spawn_session_listener(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let mut events = self.authenticator.subscribe();
        let shell = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.ends_session() => {
                        let Some(shell) = shell.upgrade() else { break };
                        if shell.dashboards.write().await.remove(&event.token()).is_some() {
                            tracing::debug!(token = %event.token(), "Cleared admin dashboard");
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session listener lagged");
                        let Some(shell) = shell.upgrade() else { break };
                        shell.prune_dashboards().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{start_expiry_sweep, AdminAccount, CredentialAuthenticator};
    use std::time::Duration;

    fn shell(ttl_secs: u64) -> Arc<Shell> {
        let authenticator = CredentialAuthenticator::new(
            vec![AdminAccount::new("admin@smitarestaurant.com", "admin123")],
            Duration::from_secs(ttl_secs),
        );
        Arc::new(Shell::new(Services::in_memory(), Arc::new(authenticator)))
    }

    #[test]
    fn test_fallback_view() {
        assert_eq!(fallback_view(View::Admin, false), View::Customer);
        assert_eq!(fallback_view(View::Admin, true), View::Admin);
        assert_eq!(fallback_view(View::Menu, false), View::Menu);
        assert_eq!(fallback_view(View::Customer, false), View::Customer);
    }

    #[test]
    fn test_view_parsing() {
        assert_eq!("Admin".parse::<View>(), Ok(View::Admin));
        assert_eq!("reserve".parse::<View>(), Ok(View::Customer));
        assert!("kitchen".parse::<View>().is_err());
    }

    #[tokio::test]
    async fn test_admin_view_requires_login() {
        let shell = shell(3600);

        let nav = shell.navigate(View::Admin, None).await;
        assert!(nav.login_required);
        assert!(!nav.authenticated);

        let nav = shell.navigate(View::Menu, None).await;
        assert!(!nav.login_required);

        let session = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();
        let nav = shell.navigate(View::Admin, Some(session.token)).await;
        assert!(nav.authenticated);
        assert!(!nav.login_required);
    }

    #[tokio::test]
    async fn test_bad_login_notifies() {
        let shell = shell(3600);
        let err = shell.login("admin@smitarestaurant.com", "wrong").await.unwrap_err();
        assert_eq!(err, ShellError::InvalidCredentials);

        let raised = shell.services().notifications.list().await;
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].message, "Invalid credentials");
    }

    #[tokio::test]
    async fn test_dashboard_mounted_per_session() {
        let shell = shell(3600);
        let session = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();

        let dashboard = shell.admin_dashboard(session.token).await.unwrap();
        assert!(dashboard.lock().await.is_loaded());
        assert_eq!(shell.services().reservations.len().await, 2);

        let again = shell.admin_dashboard(session.token).await.unwrap();
        assert!(Arc::ptr_eq(&dashboard, &again));

        assert_eq!(
            shell.admin_dashboard(uuid::Uuid::new_v4()).await.err(),
            Some(ShellError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn test_logout_clears_dashboard() {
        let shell = shell(3600);
        let session = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();
        shell.admin_dashboard(session.token).await.unwrap();

        shell.logout(session.token).await.unwrap();
        assert_eq!(shell.dashboard_count().await, 0);
        assert_eq!(
            shell.admin_dashboard(session.token).await.err(),
            Some(ShellError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn test_listener_drops_dashboard_on_sign_out() {
        let shell = shell(3600);
        let listener = shell.spawn_session_listener();
        let session = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();
        shell.admin_dashboard(session.token).await.unwrap();

        // Sign out behind the shell's back
        shell.authenticator().sign_out(session.token).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while shell.dashboard_count().await > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        listener.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_sessions_release_their_dashboards() {
        let authenticator = Arc::new(CredentialAuthenticator::new(
            vec![AdminAccount::new("admin@smitarestaurant.com", "admin123")],
            Duration::from_millis(50),
        ));
        let dyn_authenticator: Arc<dyn Authenticator> = authenticator.clone();
        let shell = Arc::new(Shell::new(Services::in_memory(), Arc::clone(&dyn_authenticator)));
        let listener = shell.spawn_session_listener();
        let sweeper = start_expiry_sweep(&dyn_authenticator, Duration::from_millis(100));

        for _ in 0..100 {
            let session = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();
            shell.admin_dashboard(session.token).await.unwrap();
        }
        assert_eq!(shell.dashboard_count().await, 100);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(authenticator.session_count().await, 0);

        tokio::time::timeout(Duration::from_secs(1), async {
            while shell.dashboard_count().await > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        sweeper.abort();
        listener.abort();
    }

    #[tokio::test]
    async fn test_prune_drops_dead_dashboards_only() {
        let shell = shell(3600);
        let kept = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();
        let gone = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();
        shell.admin_dashboard(kept.token).await.unwrap();
        shell.admin_dashboard(gone.token).await.unwrap();

        shell.authenticator().sign_out(gone.token).await.unwrap();
        assert_eq!(shell.prune_dashboards().await, 1);
        assert_eq!(shell.dashboard_count().await, 1);
        assert!(shell.admin_dashboard(kept.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_session_falls_back() {
        let shell = shell(0);
        let session = shell.login("admin@smitarestaurant.com", "admin123").await.unwrap();

        let nav = shell.navigate(View::Admin, Some(session.token)).await;
        assert!(nav.login_required);
        assert_eq!(fallback_view(View::Admin, nav.authenticated), View::Customer);
    }
}
