use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter, PaginatorTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a user row. The email is stored exactly as given; uniqueness is
/// enforced by the `uniq_user_email` index and surfaces as `UniqueViolation`.
pub async fn create(db: &DatabaseConnection, name: &str, email: &str) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn exists_by_email(db: &DatabaseConnection, email: &str) -> Result<bool, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(found.is_some())
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, errors::ModelError> {
    Ok(Entity::find().count(db).await?)
}
