use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ModelError::UniqueViolation(msg),
            _ => ModelError::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_sql_errors_map_to_db() {
        let err: ModelError = DbErr::Custom("connection refused".into()).into();
        match err {
            ModelError::Db(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn every_variant_has_a_message() {
        for err in [ModelError::UniqueViolation("uniq_user_email".into()), ModelError::Db("down".into())] {
            let text = err.to_string();
            match err {
                ModelError::UniqueViolation(_) => assert!(text.starts_with("unique constraint violated")),
                ModelError::Db(_) => assert!(text.starts_with("database error")),
            }
        }
    }
}
