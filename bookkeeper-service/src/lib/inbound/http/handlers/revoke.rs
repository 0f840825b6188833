use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::refresh::refresh_token_from;
use super::ApiError;
use crate::domain::credential::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

/// Revoke the refresh token carried as a bearer credential (logout).
pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let refresh_token = refresh_token_from(&headers)?;
    state.credential_service.logout(refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}
