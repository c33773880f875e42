//! Access gate in front of the hiring-manager history view.
//!
//! `AppState` holds an `Arc<dyn AccessGate>`; the default is a plain
//! shared-secret equality check. Swap in a real provider by implementing the
//! trait, without touching the matching engine or handlers.

use async_trait::async_trait;

#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Returns true when `presented` grants access to the history view.
    async fn authorize(&self, presented: &str) -> bool;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Static shared secret compared by plain string equality.
/// No hashing, no per-user accounts, no lockout.
pub struct SharedSecretGate {
    secret: String,
}

impl SharedSecretGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl AccessGate for SharedSecretGate {
    async fn authorize(&self, presented: &str) -> bool {
        presented == self.secret
    }

    fn name(&self) -> &str {
        "shared-secret"
    }
}
