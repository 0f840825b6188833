use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::ports::CredentialServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed email or empty password can never match an account.
    let email = EmailAddress::new(body.email).map_err(|_| ApiError::InvalidCredentials)?;
    let password = Password::new(body.password).map_err(|_| ApiError::InvalidCredentials)?;

    let outcome = state
        .credential_service
        .login(LoginCommand::new(email, password))
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&outcome.user).into(),
            access_token: outcome.access_token,
            refresh_token: outcome.refresh_token,
        },
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
}
