use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, UserId};
use crate::state::AppState;

/// Identity resolved for the current request, if any.
///
/// Inserted into every request by [`resolve_caller`]. Handlers decide what
/// an absent identity means; this middleware never rejects.
#[derive(Clone, Debug, Default)]
pub struct Caller(pub Option<UserId>);

impl Caller {
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

/// Resolve `Authorization: Bearer <jwt>` into a [`Caller`] extension
pub async fn resolve_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let caller = match extract_jwt_from_headers(request.headers()) {
        Ok(None) => Caller(None),
        Ok(Some(token)) => match validate_jwt(&token, &state.config.security.jwt_secret) {
            Ok(user_id) => Caller(Some(user_id)),
            Err(e) => {
                tracing::debug!("Ignoring bearer token: {}", e);
                Caller(None)
            }
        },
        Err(msg) => {
            tracing::debug!("Ignoring Authorization header: {}", msg);
            Caller(None)
        }
    };

    request.extensions_mut().insert(caller);
    next.run(request).await
}

/// Extract JWT token from Authorization header. `Ok(None)` when no header is sent.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token".to_string()),
        Some(token) => Ok(Some(token.trim().to_string())),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
