use std::sync::Arc;

use tracing::{info, warn, error, instrument};

use super::domain::{NewUser, Outcome, RejectReason};
use super::errors::RepositoryError;
use super::repository::UserRepository;

/// Signup business service independent of web framework
pub struct RegistrationService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> Clone for RegistrationService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: UserRepository + ?Sized> RegistrationService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Register a candidate unless its email is already taken.
    ///
    /// A unique-key conflict reported by the store on write is treated the
    /// same as a positive pre-check, so concurrent signups for one email end
    /// with a single `Accepted`.
    ///
    /// # Examples
    /// ```
    /// use service::registration::{RegistrationService, NewUser, Outcome, repository::memory::InMemoryUserRepository};
    /// use std::sync::Arc;
    /// let svc = RegistrationService::new(Arc::new(InMemoryUserRepository::default()));
    /// let first = tokio_test::block_on(svc.register(NewUser::new("Asha", "asha@example.com")));
    /// assert!(first.is_accepted());
    /// let second = tokio_test::block_on(svc.register(NewUser::new("Asha", "asha@example.com")));
    /// assert_eq!(second.label(), "rejected");
    /// ```
    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    pub async fn register(&self, candidate: NewUser) -> Outcome {
        match self.repo.exists_by_email(&candidate.email).await {
            Ok(true) => {
                info!("signup_rejected_duplicate");
                return Self::duplicate(candidate.email);
            }
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "email lookup failed");
                return Outcome::Failed { detail: e.detail() };
            }
        }

        let email = candidate.email.clone();
        match self.repo.save(candidate).await {
            Ok(user) => {
                info!(user_id = %user.id, "user_registered");
                Outcome::Accepted { id: user.id, name: user.name }
            }
            Err(RepositoryError::Conflict(_)) => {
                warn!("email claimed concurrently; rejecting");
                Self::duplicate(email)
            }
            Err(e) => {
                error!(error = %e, "user save failed");
                Outcome::Failed { detail: e.detail() }
            }
        }
    }

    /// Current number of persisted users.
    pub async fn user_count(&self) -> Result<u64, RepositoryError> {
        self.repo.count().await
    }

    fn duplicate(email: String) -> Outcome {
        Outcome::Rejected { email, reason: RejectReason::DuplicateEmail }
    }
}
