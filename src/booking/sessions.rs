//! Booking session registry
//!
//! Each customer walking through the wizard over HTTP gets a session keyed
//! by a random id. Sessions left idle past the configured timeout are swept
//! by a background task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::interval;
use uuid::Uuid;

use super::workflow::{BookingPolicy, BookingWorkflow};
use crate::services::Services;

pub type BookingId = Uuid;

/// Live booking wizards, one per customer
pub struct BookingSessions {
    sessions: RwLock<HashMap<BookingId, Arc<Mutex<BookingWorkflow>>>>,
    policy: Arc<BookingPolicy>,
    idle_timeout: Duration,
}

impl BookingSessions {
    pub fn new(policy: BookingPolicy, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy: Arc::new(policy),
            idle_timeout,
        }
    }

    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    /// Open a new wizard with the table list already loaded
    pub async fn start(&self, services: &Services) -> (BookingId, Arc<Mutex<BookingWorkflow>>) {
        let mut workflow = BookingWorkflow::new(Arc::clone(&self.policy));
        workflow.load_tables(services).await;

        let id = Uuid::new_v4();
        let workflow = Arc::new(Mutex::new(workflow));
        self.sessions.write().await.insert(id, Arc::clone(&workflow));

        tracing::debug!(booking_id = %id, "Booking session started");
        (id, workflow)
    }

    /// Look up a wizard and mark it active
    pub async fn get(&self, id: BookingId) -> Option<Arc<Mutex<BookingWorkflow>>> {
        let workflow = self.sessions.read().await.get(&id).cloned()?;
        workflow.lock().await.touch();
        Some(workflow)
    }

    pub async fn remove(&self, id: BookingId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than the timeout, returning how many
    pub async fn sweep_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let mut expired = Vec::new();

        for (id, workflow) in sessions.iter() {
            // A locked workflow is in use right now
            if let Ok(workflow) = workflow.try_lock() {
                if workflow.touched_at().elapsed() > self.idle_timeout {
                    expired.push(*id);
                }
            }
        }

        for id in &expired {
            sessions.remove(id);
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "Swept idle booking sessions");
        }
        expired.len()
    }

    /// Periodically sweep idle sessions until the registry is dropped
    pub fn start_background_sweep(self: &Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        let registry = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = interval(every);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match registry.upgrade() {
                    Some(registry) => {
                        registry.sweep_idle().await;
                    }
                    None => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStep;

    #[tokio::test]
    async fn test_start_loads_tables() {
        let services = Services::in_memory();
        let sessions = BookingSessions::new(BookingPolicy::default(), Duration::from_secs(60));

        let (id, workflow) = sessions.start(&services).await;
        assert_eq!(workflow.lock().await.tables().len(), 6);
        assert_eq!(workflow.lock().await.step(), BookingStep::SelectingDateTime);

        assert!(sessions.get(id).await.is_some());
        assert!(sessions.get(Uuid::new_v4()).await.is_none());
        assert!(sessions.remove(id).await);
        assert!(sessions.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_swept() {
        let services = Services::in_memory();
        let sessions = BookingSessions::new(BookingPolicy::default(), Duration::from_secs(60));

        let (stale, _) = sessions.start(&services).await;
        tokio::time::sleep(Duration::from_secs(40)).await;
        let (fresh, _) = sessions.start(&services).await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(sessions.sweep_idle().await, 1);
        assert!(sessions.get(stale).await.is_none());
        assert!(sessions.get(fresh).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_keeps_session_alive() {
        let services = Services::in_memory();
        let sessions = BookingSessions::new(BookingPolicy::default(), Duration::from_secs(60));
        let (id, _) = sessions.start(&services).await;

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_secs(45)).await;
            assert!(sessions.get(id).await.is_some());
        }
        assert_eq!(sessions.sweep_idle().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep() {
        let services = Services::in_memory();
        let sessions = Arc::new(BookingSessions::new(
            BookingPolicy::default(),
            Duration::from_secs(10),
        ));
        let handle = sessions.start_background_sweep(Duration::from_secs(5));
        sessions.start(&services).await;

        tokio::time::sleep(Duration::from_secs(16)).await;
        assert!(sessions.is_empty().await);

        drop(sessions);
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(handle.is_finished());
    }
}
