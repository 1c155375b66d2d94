use std::sync::Arc;

use axum::{extract::{rejection::JsonRejection, State}, http::StatusCode, Json};
use common::types::ApiMessage;
use tracing::{error, warn};

use service::registration::{NewUser, Outcome, RegistrationService, UserRepository};

use crate::errors::ApiError;
use crate::observability;

pub const SIGNUP_OK: &str = "Signup successful";
pub const EMAIL_EXISTS: &str = "Email already exists";
pub const SIGNUP_FAILED: &str = "Failed to register user";

#[derive(Clone)]
pub struct ServerState {
    pub registration: RegistrationService<dyn UserRepository>,
}

impl ServerState {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { registration: RegistrationService::new(users) }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/signup",
    tag = "users",
    request_body = crate::openapi::SignupRequest,
    responses(
        (status = 200, description = "Signup successful", body = crate::openapi::ApiMessageDoc),
        (status = 400, description = "Email already exists", body = crate::openapi::ApiMessageDoc),
        (status = 500, description = "Persistence failure", body = crate::openapi::ApiMessageDoc)
    )
)]
pub async fn signup(
    State(state): State<ServerState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<ApiMessage>, ApiError> {
    let Json(candidate) = payload.map_err(|rejection| {
        warn!(error = %rejection, "signup body rejected");
        ApiError(rejection.status(), rejection.body_text())
    })?;

    let timer = observability::REGISTRATION_DURATION.start_timer();
    let outcome = state.registration.register(candidate).await;
    timer.observe_duration();
    observability::record_outcome(&outcome);

    match outcome {
        Outcome::Accepted { .. } => Ok(Json(ApiMessage::ok(SIGNUP_OK))),
        Outcome::Rejected { .. } => Err(ApiError(StatusCode::BAD_REQUEST, EMAIL_EXISTS.into())),
        Outcome::Failed { detail } => {
            error!(%detail, "signup failed");
            Err(ApiError(StatusCode::INTERNAL_SERVER_ERROR, SIGNUP_FAILED.into()))
        }
    }
}
