use serde::Serialize;
use stockledger_domain::{GoodsReceipt, RelatedOrganization, RelatedUser};
use ts_rs::TS;

/// Included user relation payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/related-user-response.ts"
)]
pub struct RelatedUserResponse {
    pub id: String,
    pub email: String,
}

/// Included organization relation payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/related-organization-response.ts"
)]
pub struct RelatedOrganizationResponse {
    pub id: String,
    pub name: String,
}

/// Goods receipt payload returned by every record operation.
///
/// Relation fields are omitted from the body unless the query included them.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/goods-receipt-response.ts"
)]
pub struct GoodsReceiptResponse {
    pub id: String,
    pub po_date: String,
    pub po_value: i64,
    pub po_number: i64,
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub user: Option<RelatedUserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub organization: Option<RelatedOrganizationResponse>,
}

impl From<GoodsReceipt> for GoodsReceiptResponse {
    fn from(value: GoodsReceipt) -> Self {
        Self {
            id: value.id().to_string(),
            po_date: value.po_date().to_string(),
            po_value: value.po_value(),
            po_number: value.po_number(),
            user_id: value.user_id().map(str::to_owned),
            organization_id: value.organization_id().map(str::to_owned),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
            user: value.user().map(related_user_response),
            organization: value.organization().map(related_organization_response),
        }
    }
}

fn related_user_response(value: &RelatedUser) -> RelatedUserResponse {
    RelatedUserResponse {
        id: value.id.clone(),
        email: value.email.clone(),
    }
}

fn related_organization_response(value: &RelatedOrganization) -> RelatedOrganizationResponse {
    RelatedOrganizationResponse {
        id: value.id.clone(),
        name: value.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stockledger_domain::GoodsReceiptDraft;

    use super::GoodsReceiptResponse;

    #[test]
    fn response_echoes_submitted_field_values() {
        let draft = GoodsReceiptDraft::from_payload(&json!({
            "po_date": "2024-01-10",
            "po_value": 100,
            "po_number": 7,
            "user_id": "user-1",
        }));
        assert!(draft.is_ok());
        let draft = draft.unwrap_or_else(|_| unreachable!());

        let now = chrono::Utc::now();
        let record = stockledger_domain::GoodsReceipt::new(
            stockledger_domain::RecordId::new(),
            draft.po_date(),
            draft.po_value(),
            draft.po_number(),
            draft.user_id().map(str::to_owned),
            draft.organization_id().map(str::to_owned),
            now,
            now,
            None,
            None,
        );

        let response = GoodsReceiptResponse::from(record);
        assert_eq!(response.po_date, "2024-01-10");
        assert_eq!(response.po_value, 100);
        assert_eq!(response.po_number, 7);
        assert_eq!(response.user_id.as_deref(), Some("user-1"));
        assert!(!response.id.is_empty());

        let body = serde_json::to_value(&response);
        assert!(body.is_ok());
        let body = body.unwrap_or_default();
        assert!(body.get("user").is_none());
    }
}
