//! Registration module: domain, repository and service layers.
//!
//! Owns the duplicate-email checked signup flow; the HTTP layer only maps
//! `Outcome` values to responses.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{NewUser, Outcome, RejectReason, User};
pub use errors::RepositoryError;
pub use repository::UserRepository;
pub use service::RegistrationService;
