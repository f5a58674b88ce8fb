//! Authentication boundary.
//!
//! The core only needs to know whether a user is present and who it is;
//! sign-in flows live outside this crate.

use std::sync::RwLock;

/// Answers "is a user signed in, and which one".
pub trait SessionProvider: Send + Sync {
    fn user_id(&self) -> Option<String>;

    fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}

/// Mutable in-process session.
#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<String>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user: RwLock::new(Some(user_id.into())),
        }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user_id.into());
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionProvider for Session {
    fn user_id(&self) -> Option<String> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
