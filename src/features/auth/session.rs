//! Session expiry notifications.
//!
//! The manager is created once in `main` and handed to every component that
//! can observe an expired session (token validation, token refresh). Other
//! components subscribe with `on_expire` instead of polling.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::core::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct SessionExpired {
    /// Known when the expired token could still be verified
    pub user_id: Option<Uuid>,
    pub reason: String,
    pub at: DateTime<Utc>,
}

pub type ExpiryListener = Arc<dyn Fn(&SessionExpired) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

pub struct SessionManager {
    listeners: RwLock<Vec<(ListenerId, ExpiryListener)>>,
    next_listener_id: AtomicU64,
    expired_total: AtomicU64,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            expired_total: AtomicU64::new(0),
        }
    }

    pub fn on_expire<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&SessionExpired) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push((id, Arc::new(listener)));
        }
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        match self.listeners.write() {
            Ok(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(listener_id, _)| *listener_id != id);
                listeners.len() != before
            }
            Err(_) => false,
        }
    }

    pub fn notify_expired(&self, user_id: Option<Uuid>, reason: impl Into<String>) {
        let event = SessionExpired {
            user_id,
            reason: reason.into(),
            at: Utc::now(),
        };
        self.expired_total.fetch_add(1, Ordering::Relaxed);

        // Listeners run outside the lock so they may subscribe or unsubscribe
        let listeners: Vec<ExpiryListener> = match self.listeners.read() {
            Ok(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => Vec::new(),
        };
        for listener in listeners {
            listener(&event);
        }
    }

    /// Pass `result` through, notifying listeners when it is a session expiry
    pub fn observe<T>(&self, user_id: Option<Uuid>, result: Result<T>) -> Result<T> {
        if let Err(AppError::SessionExpired) = &result {
            self.notify_expired(user_id, "session expired");
        }
        result
    }

    pub fn expired_total(&self) -> u64 {
        self.expired_total.load(Ordering::Relaxed)
    }
}
