use axum::Json;
use axum::extract::{Extension, State};
use stockledger_core::UserIdentity;

use crate::dto::DirectoryOptionResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<DirectoryOptionResponse>>> {
    let options = state
        .directory_service
        .list_users(&user)
        .await?
        .into_iter()
        .map(DirectoryOptionResponse::from)
        .collect();

    Ok(Json(options))
}

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<DirectoryOptionResponse>>> {
    let options = state
        .directory_service
        .list_organizations(&user)
        .await?
        .into_iter()
        .map(DirectoryOptionResponse::from)
        .collect();

    Ok(Json(options))
}
