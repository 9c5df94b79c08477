//! Authentication
//!
//! The admin views only ever see a session token. Credential checking lives
//! behind the [`Authenticator`] trait so a real identity provider can replace
//! the configured demo accounts.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{interval, Instant};
use uuid::Uuid;

pub type SessionToken = Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unknown or expired session")]
    UnknownSession,
}

pub type AuthResult<T> = Result<T, AuthError>;

/// An account allowed into the management dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AdminAccount {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            display_name: None,
        }
    }
}

/// An authenticated admin session
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Monotonic twin of `expires_at`
    #[serde(skip)]
    deadline: Instant,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Authentication state changes, broadcast to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(SessionToken),
    SignedOut(SessionToken),
    Expired(SessionToken),
}

impl SessionEvent {
    pub fn token(&self) -> SessionToken {
        match self {
            SessionEvent::SignedIn(token)
            | SessionEvent::SignedOut(token)
            | SessionEvent::Expired(token) => *token,
        }
    }

    /// True when the session is gone
    pub fn ends_session(&self) -> bool {
        !matches!(self, SessionEvent::SignedIn(_))
    }
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Check credentials and open a session
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session>;

    /// Close a session
    async fn sign_out(&self, token: SessionToken) -> AuthResult<()>;

    /// Look up a live session
    async fn session(&self, token: SessionToken) -> Option<Session>;

    /// Forget every expired session, announcing each as `Expired`
    async fn sweep_expired(&self) -> usize;

    /// Receive session lifecycle events
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Periodically sweep expired sessions until the authenticator is dropped
pub fn start_expiry_sweep(
    authenticator: &Arc<dyn Authenticator>,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    let authenticator = Arc::downgrade(authenticator);

    tokio::spawn(async move {
        let mut ticker = interval(every);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match authenticator.upgrade() {
                Some(authenticator) => {
                    authenticator.sweep_expired().await;
                }
                None => break,
            }
        }
    })
}

/// Checks credentials against a fixed list of admin accounts
pub struct CredentialAuthenticator {
    accounts: Vec<AdminAccount>,
    sessions: RwLock<HashMap<SessionToken, Session>>,
    ttl: std::time::Duration,
    events: broadcast::Sender<SessionEvent>,
}

impl CredentialAuthenticator {
    pub fn new(accounts: Vec<AdminAccount>, ttl: std::time::Duration) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            accounts,
            sessions: RwLock::new(HashMap::new()),
            ttl,
            events,
        }
    }

    /// Number of sessions currently held, expired or not
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl Authenticator for CredentialAuthenticator {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = email.trim();
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
            .ok_or_else(|| {
                tracing::warn!(email, "Rejected sign-in");
                AuthError::InvalidCredentials
            })?;

        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            issued_at: now,
            expires_at: now + Duration::from_std(self.ttl).unwrap_or_else(|_| Duration::hours(8)),
            deadline: Instant::now() + self.ttl,
        };

        self.sessions.write().await.insert(session.token, session.clone());
        tracing::info!(email = %session.email, "Admin signed in");
        self.publish(SessionEvent::SignedIn(session.token));

        Ok(session)
    }

    async fn sign_out(&self, token: SessionToken) -> AuthResult<()> {
        match self.sessions.write().await.remove(&token) {
            Some(session) => {
                tracing::info!(email = %session.email, "Admin signed out");
                self.publish(SessionEvent::SignedOut(token));
                Ok(())
            }
            None => Err(AuthError::UnknownSession),
        }
    }

    async fn session(&self, token: SessionToken) -> Option<Session> {
        let session = self.sessions.read().await.get(&token).cloned()?;
        if !session.is_expired() {
            return Some(session);
        }

        if self.sessions.write().await.remove(&token).is_some() {
            tracing::info!(email = %session.email, "Admin session expired");
            self.publish(SessionEvent::Expired(token));
        }
        None
    }

    async fn sweep_expired(&self) -> usize {
        let expired: Vec<Session> = {
            let mut sessions = self.sessions.write().await;
            let tokens: Vec<SessionToken> = sessions
                .values()
                .filter(|s| s.is_expired())
                .map(|s| s.token)
                .collect();
            tokens.iter().filter_map(|t| sessions.remove(t)).collect()
        };

        for session in &expired {
            self.publish(SessionEvent::Expired(session.token));
        }
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Swept expired admin sessions");
        }
        expired.len()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(ttl_secs: u64) -> CredentialAuthenticator {
        CredentialAuthenticator::new(
            vec![AdminAccount::new("admin@smitarestaurant.com", "admin123")],
            std::time::Duration::from_secs(ttl_secs),
        )
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let auth = authenticator(3600);
        let mut events = auth.subscribe();

        let session = auth.sign_in("Admin@SmitaRestaurant.com", "admin123").await.unwrap();
        assert_eq!(session.email, "admin@smitarestaurant.com");
        assert_eq!(auth.session(session.token).await, Some(session.clone()));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedIn(session.token));

        auth.sign_out(session.token).await.unwrap();
        assert!(auth.session(session.token).await.is_none());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::SignedOut(session.token));

        assert_eq!(auth.sign_out(session.token).await, Err(AuthError::UnknownSession));
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let auth = authenticator(3600);
        assert_eq!(
            auth.sign_in("admin@smitarestaurant.com", "nope").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.sign_in("someone@else.com", "admin123").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(auth.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_forgotten() {
        let auth = authenticator(0);
        let mut events = auth.subscribe();
        let session = auth.sign_in("admin@smitarestaurant.com", "admin123").await.unwrap();
        events.recv().await.unwrap();

        assert!(auth.session(session.token).await.is_none());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Expired(session.token));
        assert_eq!(auth.session_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_reclaims_unused_expired_sessions() {
        let auth = authenticator(60);
        let first = auth.sign_in("admin@smitarestaurant.com", "admin123").await.unwrap();
        let second = auth.sign_in("admin@smitarestaurant.com", "admin123").await.unwrap();
        tokio::time::advance(std::time::Duration::from_secs(30)).await;
        let fresh = auth.sign_in("admin@smitarestaurant.com", "admin123").await.unwrap();

        assert_eq!(auth.sweep_expired().await, 0);

        let mut events = auth.subscribe();
        tokio::time::advance(std::time::Duration::from_secs(31)).await;
        assert_eq!(auth.sweep_expired().await, 2);
        assert_eq!(auth.session_count().await, 1);
        assert_eq!(auth.session(fresh.token).await, Some(fresh));

        let mut swept = vec![events.recv().await.unwrap(), events.recv().await.unwrap()];
        swept.sort_by_key(|e| e.token());
        let mut expected = vec![SessionEvent::Expired(first.token), SessionEvent::Expired(second.token)];
        expected.sort_by_key(|e| e.token());
        assert_eq!(swept, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep_runs_until_dropped() {
        let auth: Arc<dyn Authenticator> = Arc::new(authenticator(1));
        for _ in 0..100 {
            auth.sign_in("admin@smitarestaurant.com", "admin123").await.unwrap();
        }

        let sweeper = start_expiry_sweep(&auth, std::time::Duration::from_secs(5));
        tokio::time::sleep(std::time::Duration::from_secs(6)).await;

        let mut events = auth.subscribe();
        assert_eq!(auth.sweep_expired().await, 0);
        assert!(events.try_recv().is_err());

        drop(auth);
        tokio::time::sleep(std::time::Duration::from_secs(6)).await;
        assert!(sweeper.is_finished());
    }

    #[test]
    fn test_event_token() {
        let token = Uuid::new_v4();
        assert_eq!(SessionEvent::Expired(token).token(), token);
        assert!(SessionEvent::SignedOut(token).ends_session());
        assert!(!SessionEvent::SignedIn(token).ends_session());
    }
}
