use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use tracing::info;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// Postgres-backed repository.
///
/// Email uniqueness is enforced by the unique index on `lower(email)`, so a
/// racing duplicate insert fails in the database rather than in application
/// code.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    email: String,
    passwords: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            passwords: row.passwords,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for PostgresUserRepository {
    async fn register(&self, cx: &RequestContext, user: User) -> UserResult<()> {
        cx.ensure_active()?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO users (id, email, passwords, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
            [
                user.id.into(),
                user.email.clone().into(),
                user.passwords.clone().into(),
                user.created_at.into(),
                user.updated_at.into(),
            ],
        );

        self.db.execute(stmt).await.map_err(|err| {
            let details = err.to_string();
            if details.contains("duplicate key") || details.contains("unique constraint") {
                UserError::DuplicateEmail(user.email.clone())
            } else {
                UserError::Persistence(format!("Database error: {}", details))
            }
        })?;

        cx.ensure_active()?;
        info!(user_id = %user.id, email = %user.email, "Registered user");
        Ok(())
    }

    async fn login(&self, cx: &RequestContext, email: &str, _passwords: &str) -> UserResult<User> {
        cx.ensure_active()?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT id, email, passwords, created_at, updated_at FROM users \
             WHERE lower(email) = lower($1)",
            [email.into()],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|err| UserError::Persistence(format!("Database error: {}", err)))?;

        cx.ensure_active()?;
        row.map(User::from)
            .ok_or_else(|| UserError::NotFound(email.to_string()))
    }
}
