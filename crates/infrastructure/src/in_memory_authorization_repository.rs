use std::collections::HashMap;

use async_trait::async_trait;
use stockledger_application::AuthorizationRepository;
use stockledger_core::{AppResult, TenantId};
use stockledger_domain::RoleGrant;
use tokio::sync::RwLock;

/// In-memory role-grant repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationRepository {
    grants: RwLock<HashMap<TenantId, Vec<RoleGrant>>>,
}

impl InMemoryAuthorizationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a grant to a tenant.
    pub async fn grant(&self, tenant_id: TenantId, grant: RoleGrant) {
        self.grants.write().await.entry(tenant_id).or_default().push(grant);
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryAuthorizationRepository {
    async fn list_grants_for_roles(
        &self,
        tenant_id: TenantId,
        roles: &[String],
    ) -> AppResult<Vec<RoleGrant>> {
        Ok(self
            .grants
            .read()
            .await
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

#[cfg(test)]
mod tests {
    use stockledger_application::AuthorizationRepository;
    use stockledger_core::TenantId;
    use stockledger_domain::{RecordOperation, RoleGrant};

    use super::InMemoryAuthorizationRepository;

    #[tokio::test]
    async fn grants_are_scoped_to_tenant_and_role() {
        let repository = InMemoryAuthorizationRepository::new();
        let tenant_id = TenantId::new();

        repository
            .grant(
                tenant_id,
                RoleGrant {
                    role: "clerk".to_owned(),
                    entity_logical_name: "goods_receipt".to_owned(),
                    operation: RecordOperation::List,
                },
            )
            .await;

        let matching = repository
            .list_grants_for_roles(tenant_id, &["clerk".to_owned()])
            .await;
        assert!(matching.is_ok());
        assert_eq!(matching.unwrap_or_default().len(), 1);

        let wrong_role = repository
            .list_grants_for_roles(tenant_id, &["viewer".to_owned()])
            .await;
        assert!(wrong_role.is_ok());
        assert!(wrong_role.unwrap_or_default().is_empty());

        let wrong_tenant = repository
            .list_grants_for_roles(TenantId::new(), &["clerk".to_owned()])
            .await;
        assert!(wrong_tenant.is_ok());
        assert!(wrong_tenant.unwrap_or_default().is_empty());
    }
}
