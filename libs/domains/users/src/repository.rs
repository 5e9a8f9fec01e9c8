use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{UserError, UserResult};
use crate::models::User;

/// Storage contract for accounts.
///
/// `login` looks an account up by email; the password argument is part of the
/// contract but plays no role in the lookup, hash verification happens in the
/// service layer.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn register(&self, cx: &RequestContext, user: User) -> UserResult<()>;

    async fn login(&self, cx: &RequestContext, email: &str, passwords: &str) -> UserResult<User>;
}

/// Map-backed repository used by tests and local development.
///
/// Duplicate detection and lookup treat emails case-insensitively, matching
/// the unique index the Postgres schema enforces.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn register(&self, cx: &RequestContext, user: User) -> UserResult<()> {
        cx.ensure_active()?;

        // The write guard spans the duplicate check and the insert, so two
        // racing registrations for one email cannot both pass the check.
        let mut users = self.users.write().await;
        let needle = user.email.to_lowercase();
        if users.values().any(|u| u.email.to_lowercase() == needle) {
            return Err(UserError::DuplicateEmail(user.email));
        }
        debug!(user_id = %user.id, email = %user.email, "Registered user");
        users.insert(user.id, user);
        drop(users);

        cx.ensure_active()?;
        Ok(())
    }

    async fn login(&self, cx: &RequestContext, email: &str, _passwords: &str) -> UserResult<User> {
        cx.ensure_active()?;

        let needle = email.to_lowercase();
        let user = self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned();

        cx.ensure_active()?;
        user.ok_or_else(|| UserError::NotFound(email.to_string()))
    }
}
