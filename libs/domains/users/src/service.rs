use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use validator::ValidateEmail;

use crate::context::RequestContext;
use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

const MAX_EMAIL_LENGTH: usize = 255;

/// Business rules for registration and login.
///
/// Passwords are argon2-hashed before they reach storage and verified here on
/// login. Both operations answer with the literal status string `"Success"`.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn register(
        &self,
        cx: &RequestContext,
        email: &str,
        passwords: &str,
    ) -> UserResult<String> {
        cx.ensure_active()?;
        self.validate_credentials(email, passwords)?;

        let hash = self.hash_password(passwords)?;
        self.repository
            .register(cx, User::new(email.to_string(), hash))
            .await?;

        Ok("Success".to_string())
    }

    pub async fn login(
        &self,
        cx: &RequestContext,
        email: &str,
        passwords: &str,
    ) -> UserResult<String> {
        cx.ensure_active()?;
        self.validate_credentials(email, passwords)?;

        let user = match self.repository.login(cx, email, passwords).await {
            Ok(user) => user,
            // A missing account must look exactly like a wrong password.
            Err(UserError::NotFound(_)) => return Err(UserError::Authentication),
            Err(err) => return Err(err),
        };

        if !self.verify_password(passwords, &user.passwords)? {
            return Err(UserError::Authentication);
        }

        Ok("Success".to_string())
    }

    fn validate_credentials(&self, email: &str, passwords: &str) -> UserResult<()> {
        if email.len() > MAX_EMAIL_LENGTH || !email.validate_email() {
            return Err(UserError::Validation(
                "email must be a valid address".to_string(),
            ));
        }
        if passwords.is_empty() {
            return Err(UserError::Validation(
                "passwords must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn hash_password(&self, passwords: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(passwords.as_bytes(), &salt)
            .map_err(|err| UserError::Hashing(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, passwords: &str, hash: &str) -> UserResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|err| UserError::Hashing(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(passwords.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;

    fn service() -> UserService<InMemoryUserRepository> {
        UserService::new(InMemoryUserRepository::new())
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let service = service();
        let cx = RequestContext::new();

        let registered = service.register(&cx, "a@example.com", "hunter2").await.unwrap();
        let logged_in = service.login(&cx, "a@example.com", "hunter2").await.unwrap();

        assert_eq!(registered, "Success");
        assert_eq!(logged_in, "Success");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let service = service();
        let cx = RequestContext::new();
        service.register(&cx, "a@example.com", "hunter2").await.unwrap();

        let wrong_password = service.login(&cx, "a@example.com", "wrong").await.unwrap_err();
        let unknown_email = service.login(&cx, "b@example.com", "hunter2").await.unwrap_err();

        assert!(matches!(wrong_password, UserError::Authentication));
        assert!(matches!(unknown_email, UserError::Authentication));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn stored_password_is_hashed_and_verifiable() {
        let repository = InMemoryUserRepository::new();
        let service = UserService::new(repository.clone());
        let cx = RequestContext::new();
        service.register(&cx, "a@example.com", "hunter2").await.unwrap();

        let stored = repository.login(&cx, "a@example.com", "").await.unwrap();

        assert_ne!(stored.passwords, "hunter2");
        assert!(service.verify_password("hunter2", &stored.passwords).unwrap());
        assert!(!service.verify_password("wrong", &stored.passwords).unwrap());
        assert!(!service.verify_password("", &stored.passwords).unwrap());
        let hash = stored.passwords.clone();
        assert!(!service.verify_password(&hash, &stored.passwords).unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_to_different_strings() {
        let service = service();

        let first = service.hash_password("hunter2").unwrap();
        let second = service.hash_password("hunter2").unwrap();

        assert_ne!(first, second);
        assert!(service.verify_password("hunter2", &first).unwrap());
        assert!(service.verify_password("hunter2", &second).unwrap());
    }

    #[tokio::test]
    async fn duplicate_registration_is_reported_as_conflict() {
        let service = service();
        let cx = RequestContext::new();
        service.register(&cx, "a@example.com", "hunter2").await.unwrap();

        let err = service.register(&cx, "A@Example.com", "other").await.unwrap_err();

        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_before_storage() {
        let service = service();
        let cx = RequestContext::new();

        let err = service.register(&cx, "not-an-email", "hunter2").await.unwrap_err();

        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn overlong_email_is_rejected() {
        let service = service();
        let cx = RequestContext::new();
        let email = format!("{}@example.com", "a".repeat(250));

        let err = service.register(&cx, &email, "hunter2").await.unwrap_err();

        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_password_is_rejected() {
        let service = service();
        let cx = RequestContext::new();

        let err = service.register(&cx, "a@example.com", "").await.unwrap_err();

        assert!(matches!(err, UserError::Validation(_)));
    }

    #[tokio::test]
    async fn cancelled_context_fails_fast() {
        let service = service();
        let cx = RequestContext::new();
        cx.cancel();

        let err = service.register(&cx, "a@example.com", "hunter2").await.unwrap_err();

        assert!(matches!(err, UserError::Cancelled));
    }
}
