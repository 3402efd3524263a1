use std::collections::HashMap;

use async_trait::async_trait;
use stockledger_application::{DirectoryOption, DirectoryRepository};
use stockledger_core::{AppResult, TenantId};
use tokio::sync::RwLock;

/// In-memory user and organization lookup repository.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    users: RwLock<HashMap<TenantId, Vec<DirectoryOption>>>,
    organizations: RwLock<HashMap<TenantId, Vec<DirectoryOption>>>,
}

impl InMemoryDirectoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user picker option for a tenant.
    pub async fn seed_user(&self, tenant_id: TenantId, option: DirectoryOption) {
        self.users.write().await.entry(tenant_id).or_default().push(option);
    }

    /// Registers an organization picker option for a tenant.
    pub async fn seed_organization(&self, tenant_id: TenantId, option: DirectoryOption) {
        self.organizations
            .write()
            .await
            .entry(tenant_id)
            .or_default()
            .push(option);
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn list_users(&self, tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>> {
        Ok(self
            .users
            .read()
            .await
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>> {
        Ok(self
            .organizations
            .read()
            .await
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use stockledger_application::{DirectoryOption, DirectoryRepository};
    use stockledger_core::TenantId;

    use super::InMemoryDirectoryRepository;

    #[tokio::test]
    async fn options_do_not_leak_across_tenants() {
        let repository = InMemoryDirectoryRepository::new();
        let tenant_id = TenantId::new();

        repository
            .seed_user(
                tenant_id,
                DirectoryOption {
                    id: "user-1".to_owned(),
                    label: "alice@example.com".to_owned(),
                },
            )
            .await;

        let own = repository.list_users(tenant_id).await;
        assert!(own.is_ok());
        assert_eq!(own.unwrap_or_default().len(), 1);

        let other = repository.list_users(TenantId::new()).await;
        assert!(other.is_ok());
        assert!(other.unwrap_or_default().is_empty());
    }
}
