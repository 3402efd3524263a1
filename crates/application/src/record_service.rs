use std::sync::Arc;

use serde_json::Value;
use stockledger_core::{AppError, AppResult, UserIdentity};
use stockledger_domain::{
    AuditAction, GoodsReceipt, GoodsReceiptDraft, RecordId, RecordOperation, goods_receipt_schema,
};

use crate::authorization_service::AuthorizationService;
use crate::record_ports::{
    AuditEvent, AuditRepository, RecordQuery, RecordRepository, RelationIncludes,
};

/// Application service for goods-receipt record operations.
///
/// Each operation is a thin composition: authorization gate, then the
/// validation rule set for writes, then a single storage call through the
/// tenant-scoped store. No retries, no multi-step transactions.
#[derive(Clone)]
pub struct RecordService {
    repository: Arc<dyn RecordRepository>,
    authorization_service: AuthorizationService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RecordService {
    /// Creates a new record service from repository implementations.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        authorization_service: AuthorizationService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            authorization_service,
            audit_repository,
        }
    }

    /// Lists goods receipts matching a translated query.
    pub async fn list(
        &self,
        actor: &UserIdentity,
        query: RecordQuery,
    ) -> AppResult<Vec<GoodsReceipt>> {
        let store = self
            .authorized_store(actor, RecordOperation::List)
            .await?;

        store.list(query).await
    }

    /// Creates a goods receipt from a JSON write payload.
    pub async fn create(&self, actor: &UserIdentity, payload: &Value) -> AppResult<GoodsReceipt> {
        let store = self
            .authorized_store(actor, RecordOperation::Create)
            .await?;

        let draft = GoodsReceiptDraft::from_payload(payload)?;
        let record = store.create(draft).await?;

        self.append_audit_event(actor, AuditAction::RecordCreated, record.id())
            .await?;

        Ok(record)
    }

    /// Gets a goods receipt by identifier.
    pub async fn get(
        &self,
        actor: &UserIdentity,
        record_id: RecordId,
        includes: RelationIncludes,
    ) -> AppResult<GoodsReceipt> {
        let store = self
            .authorized_store(actor, RecordOperation::Read)
            .await?;

        store
            .find(record_id, includes)
            .await?
            .ok_or_else(|| Self::not_found(record_id))
    }

    /// Replaces the mutable fields of a goods receipt.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        record_id: RecordId,
        payload: &Value,
    ) -> AppResult<GoodsReceipt> {
        let store = self
            .authorized_store(actor, RecordOperation::Update)
            .await?;

        let draft = GoodsReceiptDraft::from_payload(payload)?;
        let record = store
            .update(record_id, draft)
            .await?
            .ok_or_else(|| Self::not_found(record_id))?;

        self.append_audit_event(actor, AuditAction::RecordUpdated, record.id())
            .await?;

        Ok(record)
    }

    /// Hard-deletes a goods receipt and returns the removed record.
    pub async fn delete(&self, actor: &UserIdentity, record_id: RecordId) -> AppResult<GoodsReceipt> {
        let store = self
            .authorized_store(actor, RecordOperation::Delete)
            .await?;

        let record = store
            .delete(record_id)
            .await?
            .ok_or_else(|| Self::not_found(record_id))?;

        self.append_audit_event(actor, AuditAction::RecordDeleted, record_id)
            .await?;

        Ok(record)
    }

    async fn authorized_store(
        &self,
        actor: &UserIdentity,
        operation: RecordOperation,
    ) -> AppResult<crate::TenantRecordStore> {
        self.authorization_service
            .authorize_records(
                actor,
                goods_receipt_schema().entity_logical_name(),
                operation,
                self.repository.clone(),
            )
            .await
    }

    async fn append_audit_event(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        record_id: RecordId,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id: actor.tenant_id(),
                subject: actor.subject().to_owned(),
                action,
                entity_logical_name: goods_receipt_schema().entity_logical_name().to_owned(),
                record_id: record_id.to_string(),
            })
            .await
    }

    fn not_found(record_id: RecordId) -> AppError {
        AppError::NotFound(format!("goods receipt '{record_id}' does not exist"))
    }
}
