//! Service layer providing the signup business logic on top of models.
//! - Separates business logic from data access.
//! - Persistence is reached only through the `UserRepository` trait.

pub mod registration;
