use async_trait::async_trait;

use super::domain::{NewUser, User};
use super::errors::RepositoryError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
    /// Persist a candidate. Implementations must refuse a second row for the
    /// same email with `RepositoryError::Conflict`.
    async fn save(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// In-memory repository for tests, benches and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<HashMap<String, User>>, // key: email
        fail_writes: bool,
    }

    impl InMemoryUserRepository {
        /// Repository whose `save` always fails with a backend error.
        pub fn failing_writes() -> Self {
            Self { users: Mutex::default(), fail_writes: true }
        }

        fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, User>>, RepositoryError> {
            self.users
                .lock()
                .map_err(|_| RepositoryError::Backend("user map lock poisoned".into()))
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
            Ok(self.lock()?.contains_key(email))
        }

        async fn save(&self, user: NewUser) -> Result<User, RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Backend("write rejected by store".into()));
            }
            let mut users = self.lock()?;
            if users.contains_key(&user.email) {
                return Err(RepositoryError::Conflict(user.email));
            }
            let saved = User { id: Uuid::new_v4(), name: user.name, email: user.email, created_at: Utc::now() };
            users.insert(saved.email.clone(), saved.clone());
            Ok(saved)
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.lock()?.len() as u64)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn save_enforces_unique_email() {
            let repo = InMemoryUserRepository::default();
            repo.save(NewUser::new("Asha", "asha@example.com")).await.unwrap();
            let err = repo.save(NewUser::new("Other", "asha@example.com")).await.unwrap_err();
            assert!(matches!(err, RepositoryError::Conflict(_)));
            assert_eq!(repo.count().await.unwrap(), 1);
        }

        #[tokio::test]
        async fn emails_compared_exactly() {
            let repo = InMemoryUserRepository::default();
            repo.save(NewUser::new("Asha", "asha@example.com")).await.unwrap();
            assert!(!repo.exists_by_email("Asha@Example.com").await.unwrap());
            assert!(!repo.exists_by_email(" asha@example.com").await.unwrap());
        }

        #[tokio::test]
        async fn failing_writes_store_nothing() {
            let repo = InMemoryUserRepository::failing_writes();
            assert!(repo.save(NewUser::new("Asha", "asha@example.com")).await.is_err());
            assert_eq!(repo.count().await.unwrap(), 0);
        }
    }
}
