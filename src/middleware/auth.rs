use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthError, Identity, TokenService};
use crate::error::ApiError;
use crate::AppState;

/// Verified identity attached to requests that passed the gate.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

/// Gate in front of every protected route: verify the bearer token and attach
/// its identity, or answer 401 without running the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(request.headers(), &state.tokens)?;
    tracing::debug!(user_id = %user.0.id, "authenticated request");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Pull the bearer token out of the headers and verify it.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, AuthError> {
    let token = extract_bearer(headers).ok_or(AuthError::MissingToken)?;
    tokens.verify(token).map(AuthUser)
}

/// `Bearer <token>`, scheme matched case-insensitively. Anything else counts as no token.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
