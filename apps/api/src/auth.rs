use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use serde::Deserialize;
use stockledger_core::{AppError, TenantId, UserIdentity};
use tower_sessions::Session;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub const SESSION_USER_KEY: &str = "user_identity";

/// Session establishment payload handed over by the identity provider.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub token: String,
    pub subject: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub tenant_id: String,
    pub roles: Vec<String>,
}

pub async fn create_session_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateSessionRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.session_token {
        return Err(AppError::Unauthorized("invalid session token".to_owned()).into());
    }

    let tenant_id = uuid::Uuid::parse_str(payload.tenant_id.as_str())
        .map(TenantId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid tenant_id: {error}")))?;

    let display_name = payload
        .display_name
        .unwrap_or_else(|| payload.subject.clone());
    let identity = UserIdentity::new(
        payload.subject,
        display_name,
        payload.email,
        tenant_id,
        payload.roles,
    );

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    Ok(Json(UserIdentityResponse::from(&user)))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}
