use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::registration::domain::{NewUser, User};
use crate::registration::errors::RepositoryError;
use crate::registration::repository::UserRepository;

/// Postgres-backed repository over the `user` table.
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: models::user::Model) -> User {
    User { id: m.id, name: m.name, email: m.email, created_at: m.created_at.with_timezone(&Utc) }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(models::user::exists_by_email(&self.db, email).await?)
    }

    async fn save(&self, user: NewUser) -> Result<User, RepositoryError> {
        let created = models::user::create(&self.db, &user.name, &user.email).await?;
        Ok(to_domain(created))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(models::user::count(&self.db).await?)
    }
}
