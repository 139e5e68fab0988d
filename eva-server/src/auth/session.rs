//! Signed-in sessions

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

use shared::models::UserProfile;

/// Authentication context of one signed-in user
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub session_id: String,
    pub profile: UserProfile,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn new(profile: UserProfile, is_admin: bool, ttl: Duration) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            profile,
            is_admin,
            expires_at: Utc::now()
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn employee_code(&self) -> Option<&str> {
        self.profile.employee_code()
    }

    /// Identity used to key in-flight operations
    pub fn actor(&self) -> &str {
        self.employee_code().unwrap_or(&self.session_id)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Live sessions by id
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, AuthContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, context: AuthContext) {
        self.sessions.insert(context.session_id.clone(), context);
    }

    /// Live session for `id`; an expired one is dropped
    pub fn get(&self, id: &str) -> Option<AuthContext> {
        let context = self.sessions.get(id)?.clone();
        if context.is_expired() {
            self.sessions.remove(id);
            return None;
        }
        Some(context)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, context| !context.is_expired());
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
