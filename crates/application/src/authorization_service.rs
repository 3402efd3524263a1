use std::sync::Arc;

use stockledger_core::{AppError, AppResult, TenantId, UserIdentity};
use stockledger_domain::{GoodsReceipt, GoodsReceiptDraft, RecordId, RecordOperation};

use crate::record_ports::{
    AuthorizationRepository, RecordQuery, RecordRepository, RelationIncludes,
};

/// Application service for tenant-scoped authorization checks.
///
/// The capability check runs once per request, before any record storage
/// I/O; row-level decisions are left to the tenant filter the resulting
/// [`TenantRecordStore`] applies.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Ensures the actor's roles grant the operation on the entity.
    pub async fn require_operation(
        &self,
        actor: &UserIdentity,
        entity_logical_name: &str,
        operation: RecordOperation,
    ) -> AppResult<()> {
        if self
            .has_operation(actor, entity_logical_name, operation)
            .await?
        {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' may not {} entity '{}' in tenant '{}'",
            actor.subject(),
            operation.as_str(),
            entity_logical_name,
            actor.tenant_id()
        )))
    }

    /// Returns whether the actor's roles currently grant the operation.
    pub async fn has_operation(
        &self,
        actor: &UserIdentity,
        entity_logical_name: &str,
        operation: RecordOperation,
    ) -> AppResult<bool> {
        let grants = self
            .repository
            .list_grants_for_roles(actor.tenant_id(), actor.roles())
            .await?;

        Ok(grants
            .iter()
            .any(|grant| grant.permits(entity_logical_name, operation)))
    }

    /// Authorizes the operation and hands out a tenant-scoped storage handle.
    pub async fn authorize_records(
        &self,
        actor: &UserIdentity,
        entity_logical_name: &str,
        operation: RecordOperation,
        repository: Arc<dyn RecordRepository>,
    ) -> AppResult<TenantRecordStore> {
        self.require_operation(actor, entity_logical_name, operation)
            .await?;

        Ok(TenantRecordStore {
            repository,
            tenant_id: actor.tenant_id(),
        })
    }
}

/// Storage handle whose reads and writes are implicitly filtered to one
/// tenant.
///
/// A decorator over [`RecordRepository`]: the tenant partition key is bound
/// when the authorization gate allows the request and cannot be widened
/// afterwards.
pub struct TenantRecordStore {
    repository: Arc<dyn RecordRepository>,
    tenant_id: TenantId,
}

impl TenantRecordStore {
    /// Returns the tenant the handle is bound to.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Lists records matching the query within the bound tenant.
    pub async fn list(&self, query: RecordQuery) -> AppResult<Vec<GoodsReceipt>> {
        self.repository.list_records(self.tenant_id, query).await
    }

    /// Finds one record by identifier within the bound tenant.
    pub async fn find(
        &self,
        record_id: RecordId,
        includes: RelationIncludes,
    ) -> AppResult<Option<GoodsReceipt>> {
        self.repository
            .find_record(self.tenant_id, record_id, includes)
            .await
    }

    /// Creates a record owned by the bound tenant.
    pub async fn create(&self, draft: GoodsReceiptDraft) -> AppResult<GoodsReceipt> {
        self.repository.create_record(self.tenant_id, draft).await
    }

    /// Updates a record within the bound tenant.
    pub async fn update(
        &self,
        record_id: RecordId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<Option<GoodsReceipt>> {
        self.repository
            .update_record(self.tenant_id, record_id, draft)
            .await
    }

    /// Deletes a record within the bound tenant.
    pub async fn delete(&self, record_id: RecordId) -> AppResult<Option<GoodsReceipt>> {
        self.repository.delete_record(self.tenant_id, record_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use stockledger_core::{AppResult, TenantId, UserIdentity};
    use stockledger_domain::{RecordOperation, RoleGrant};

    use super::{AuthorizationRepository, AuthorizationService};

    struct FakeAuthorizationRepository {
        grants: HashMap<TenantId, Vec<RoleGrant>>,
    }

    #[async_trait]
    impl AuthorizationRepository for FakeAuthorizationRepository {
        async fn list_grants_for_roles(
            &self,
            tenant_id: TenantId,
            roles: &[String],
        ) -> AppResult<Vec<RoleGrant>> {
            Ok(self
                .grants
                .get(&tenant_id)
                .map(|grants| {
                    grants
                        .iter()
                        .filter(|grant| roles.contains(&grant.role))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn actor(tenant_id: TenantId, roles: &[&str]) -> UserIdentity {
        UserIdentity::new(
            "alice",
            "Alice",
            None,
            tenant_id,
            roles.iter().map(|role| (*role).to_owned()).collect(),
        )
    }

    fn clerk_grant(operation: RecordOperation) -> RoleGrant {
        RoleGrant {
            role: "clerk".to_owned(),
            entity_logical_name: "goods_receipt".to_owned(),
            operation,
        }
    }

    #[tokio::test]
    async fn require_operation_allows_granted_role() {
        let tenant_id = TenantId::new();
        let service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
            grants: HashMap::from([(tenant_id, vec![clerk_grant(RecordOperation::List)])]),
        }));

        let result = service
            .require_operation(
                &actor(tenant_id, &["clerk"]),
                "goods_receipt",
                RecordOperation::List,
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn require_operation_denies_missing_grant() {
        let tenant_id = TenantId::new();
        let service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
            grants: HashMap::from([(tenant_id, vec![clerk_grant(RecordOperation::List)])]),
        }));

        let result = service
            .require_operation(
                &actor(tenant_id, &["clerk"]),
                "goods_receipt",
                RecordOperation::Delete,
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn grants_do_not_cross_tenants() {
        let granted_tenant = TenantId::new();
        let other_tenant = TenantId::new();
        let service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
            grants: HashMap::from([(granted_tenant, vec![clerk_grant(RecordOperation::List)])]),
        }));

        let result = service
            .require_operation(
                &actor(other_tenant, &["clerk"]),
                "goods_receipt",
                RecordOperation::List,
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn grants_do_not_cross_roles() {
        let tenant_id = TenantId::new();
        let service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
            grants: HashMap::from([(tenant_id, vec![clerk_grant(RecordOperation::List)])]),
        }));

        let result = service
            .require_operation(
                &actor(tenant_id, &["viewer"]),
                "goods_receipt",
                RecordOperation::List,
            )
            .await;
        assert!(result.is_err());
    }
}
