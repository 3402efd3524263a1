use async_trait::async_trait;
use stockledger_core::{AppResult, TenantId};
use stockledger_domain::{AuditAction, GoodsReceipt, GoodsReceiptDraft, RecordId, RoleGrant};

/// One equality condition translated from a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityFilter {
    /// Field logical name to compare (`id` addresses the record identifier).
    pub field_logical_name: String,
    /// Expected value, as received on the wire.
    pub value: String,
}

/// Relations a query asks storage to resolve alongside the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationIncludes {
    /// Join the linked user, when one is set.
    pub user: bool,
    /// Join the linked organization, when one is set.
    pub organization: bool,
}

/// Structured storage query produced by the query translator.
///
/// Only fields present in the request are translated; the tenant filter is
/// supplied separately by the authorization gate, never here. An absent
/// `limit` means the query is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Equality filters on whitelisted fields.
    pub filters: Vec<EqualityFilter>,
    /// Relations to resolve with the records.
    pub includes: RelationIncludes,
    /// Maximum rows returned; `None` passes through unbounded.
    pub limit: Option<usize>,
    /// Rows skipped for offset pagination.
    pub offset: usize,
}

/// Repository port for goods-receipt persistence.
///
/// Every method takes the tenant partition key explicitly; callers outside
/// the authorization gate go through [`crate::TenantRecordStore`] instead.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Lists records matching the query, scoped to one tenant.
    async fn list_records(
        &self,
        tenant_id: TenantId,
        query: RecordQuery,
    ) -> AppResult<Vec<GoodsReceipt>>;

    /// Finds a record by identifier within the tenant scope.
    async fn find_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
        includes: RelationIncludes,
    ) -> AppResult<Option<GoodsReceipt>>;

    /// Creates a record; storage assigns the identifier and both timestamps.
    async fn create_record(
        &self,
        tenant_id: TenantId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<GoodsReceipt>;

    /// Replaces the mutable fields of a record; storage refreshes `updated_at`.
    ///
    /// Returns `None` when the identifier has no record in the tenant scope.
    async fn update_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<Option<GoodsReceipt>>;

    /// Hard-deletes a record and returns it, or `None` when absent.
    async fn delete_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
    ) -> AppResult<Option<GoodsReceipt>>;
}

/// Repository port for role-grant lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists grants attached to any of the given roles in a tenant.
    async fn list_grants_for_roles(
        &self,
        tenant_id: TenantId,
        roles: &[String],
    ) -> AppResult<Vec<RoleGrant>>;
}

/// One audit log entry appended by record write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Tenant the event belongs to.
    pub tenant_id: TenantId,
    /// Acting subject.
    pub subject: String,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Entity logical name the record belongs to.
    pub entity_logical_name: String,
    /// Affected record identifier.
    pub record_id: String,
}

/// Repository port for the append-only audit log.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Selectable option for a foreign-key field in the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOption {
    /// Stable identifier stored in the foreign-key field.
    pub id: String,
    /// Human-readable label shown in the picker.
    pub label: String,
}

/// Repository port for tenant-scoped user and organization lookups.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Lists users in the tenant as picker options.
    async fn list_users(&self, tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>>;

    /// Lists organizations in the tenant as picker options.
    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>>;
}
