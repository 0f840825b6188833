use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credential::errors::CredentialError;
use crate::domain::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

/// Exchange the refresh token carried as a bearer credential for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let refresh_token = refresh_token_from(&headers)?;
    let access_token = state.credential_service.renew(refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshResponseData { access_token },
    ))
}

/// Read the bearer value without treating it as an access token.
pub(super) fn refresh_token_from(headers: &HeaderMap) -> Result<&str, ApiError> {
    auth::extract_bearer(headers)
        .map_err(|e| ApiError::from(CredentialError::Unauthenticated(e.into())))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
}
