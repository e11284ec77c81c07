use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Identity verification middleware for the task routes.
///
/// Runs before the handler extracts anything from the request, so a missing
/// or bad credential is rejected ahead of body parsing, validation and any
/// storage access. On success the verified `Identity` is placed in the
/// request extensions for the handler.
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state.verifier.verify(request.headers()).map_err(|e| {
        tracing::debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
