//! Directive endpoint
//!
//! The voice assistant's event trigger posts each directive here and relays
//! the response envelope back unchanged.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;

use super::ApiState;
use crate::Error;
use crate::directive::{Directive, ResponseEnvelope};

/// Error body for failed invocations
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Invocation failure mapped to an HTTP status
#[derive(Debug)]
pub struct InvocationError(StatusCode, String);

impl From<Error> for InvocationError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::UnsupportedNamespace(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, e.to_string())
    }
}

impl IntoResponse for InvocationError {
    fn into_response(self) -> Response {
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}

/// Handle one directive
async fn handle_directive(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<Directive>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, InvocationError> {
    let Json(directive) = body.map_err(|e| {
        tracing::warn!(error = %e, "malformed directive");
        InvocationError(StatusCode::BAD_REQUEST, e.body_text())
    })?;

    let response = state.router.handle(&directive).await.map_err(|e| {
        tracing::warn!(
            directive = %directive.header.name,
            error = %e,
            "invocation failed"
        );
        InvocationError::from(e)
    })?;

    tracing::debug!(?response, "directive response");
    Ok(Json(response))
}

/// Build directive routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/directive", post(handle_directive))
        .with_state(state)
}
