use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use stockledger_application::{RelationIncludes, translate_list_request, translate_relation_includes};
use stockledger_core::{AppError, UserIdentity};
use stockledger_domain::{RecordId, goods_receipt_schema};

use crate::dto::GoodsReceiptResponse;
use crate::error::ApiResult;
use crate::state::AppState;

const GOODS_RECEIPTS_ROUTE: &str = "goods-receipts";

#[derive(Debug, serde::Deserialize)]
pub struct RecordIncludeQuery {
    pub relations: Option<String>,
}

pub async fn list_goods_receipts_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<Vec<GoodsReceiptResponse>>> {
    let translated = translate_list_request(GOODS_RECEIPTS_ROUTE, &params)?;

    let records = state
        .record_service
        .list(&user, translated.query)
        .await?
        .into_iter()
        .map(GoodsReceiptResponse::from)
        .collect();

    Ok(Json(records))
}

pub async fn create_goods_receipt_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<serde_json::Value>,
) -> ApiResult<Json<GoodsReceiptResponse>> {
    let record = state.record_service.create(&user, &payload).await?;

    Ok(Json(GoodsReceiptResponse::from(record)))
}

pub async fn get_goods_receipt_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
    Query(query): Query<RecordIncludeQuery>,
) -> ApiResult<Json<GoodsReceiptResponse>> {
    let record_id = parse_record_id(record_id.as_str())?;
    let includes = relation_includes(query)?;

    let record = state.record_service.get(&user, record_id, includes).await?;

    Ok(Json(GoodsReceiptResponse::from(record)))
}

pub async fn update_goods_receipt_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> ApiResult<Json<GoodsReceiptResponse>> {
    let record_id = parse_record_id(record_id.as_str())?;

    let record = state
        .record_service
        .update(&user, record_id, &payload)
        .await?;

    Ok(Json(GoodsReceiptResponse::from(record)))
}

pub async fn delete_goods_receipt_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(record_id): Path<String>,
) -> ApiResult<Json<GoodsReceiptResponse>> {
    let record_id = parse_record_id(record_id.as_str())?;

    let record = state.record_service.delete(&user, record_id).await?;

    Ok(Json(GoodsReceiptResponse::from(record)))
}

// Malformed identifiers surface as the same not-found signal as unknown ones.
fn parse_record_id(raw: &str) -> Result<RecordId, AppError> {
    RecordId::parse(raw)
        .map_err(|_| AppError::NotFound(format!("goods receipt '{raw}' does not exist")))
}

fn relation_includes(query: RecordIncludeQuery) -> Result<RelationIncludes, AppError> {
    match query.relations {
        Some(hint) => translate_relation_includes(goods_receipt_schema(), hint.as_str()),
        None => Ok(RelationIncludes::default()),
    }
}
