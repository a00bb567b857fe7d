use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct LoginResponse {
    token: String,
}

pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match state.issuer.login(&body.username, &body.password) {
        Ok(Some(token)) => Ok((StatusCode::OK, Json(LoginResponse { token }))),
        Ok(None) => Err(ApiError::new(
            req_id.0,
            "unauthorized",
            "invalid username or password",
        )),
        Err(e) => {
            tracing::error!(error = %e, "token encoding failed");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "failed to issue a token",
            ))
        }
    }
}
