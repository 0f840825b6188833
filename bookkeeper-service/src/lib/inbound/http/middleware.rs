use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::credential::ports::CredentialServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that runs the authorization gate and records the subject on the request.
///
/// Any rejection becomes a bare 401; the reason is logged, never returned.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state.credential_service.authorize(req.headers())?;

    tracing::debug!(user_id = %user_id, "Request authorized");
    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}
