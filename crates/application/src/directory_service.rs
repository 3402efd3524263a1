use std::sync::Arc;

use stockledger_core::{AppResult, UserIdentity};
use stockledger_domain::RecordOperation;

use crate::authorization_service::AuthorizationService;
use crate::record_ports::{DirectoryOption, DirectoryRepository};

/// Application service for the foreign-key picker option lists.
#[derive(Clone)]
pub struct DirectoryService {
    repository: Arc<dyn DirectoryRepository>,
    authorization_service: AuthorizationService,
}

impl DirectoryService {
    /// Creates a new directory service from a repository implementation.
    #[must_use]
    pub fn new(
        repository: Arc<dyn DirectoryRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            authorization_service,
        }
    }

    /// Lists tenant users as picker options.
    pub async fn list_users(&self, actor: &UserIdentity) -> AppResult<Vec<DirectoryOption>> {
        self.authorization_service
            .require_operation(actor, "user", RecordOperation::List)
            .await?;

        self.repository.list_users(actor.tenant_id()).await
    }

    /// Lists tenant organizations as picker options.
    pub async fn list_organizations(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<DirectoryOption>> {
        self.authorization_service
            .require_operation(actor, "organization", RecordOperation::List)
            .await?;

        self.repository.list_organizations(actor.tenant_id()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use stockledger_core::{AppResult, TenantId, UserIdentity};
    use stockledger_domain::{RecordOperation, RoleGrant};

    use crate::authorization_service::AuthorizationService;
    use crate::record_ports::{AuthorizationRepository, DirectoryOption, DirectoryRepository};

    use super::DirectoryService;

    struct FakeDirectoryRepository;

    #[async_trait]
    impl DirectoryRepository for FakeDirectoryRepository {
        async fn list_users(&self, _tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>> {
            Ok(vec![DirectoryOption {
                id: "user-1".to_owned(),
                label: "alice@example.com".to_owned(),
            }])
        }

        async fn list_organizations(
            &self,
            _tenant_id: TenantId,
        ) -> AppResult<Vec<DirectoryOption>> {
            Ok(Vec::new())
        }
    }

    struct FakeAuthorizationRepository {
        grants: Vec<RoleGrant>,
    }

    #[async_trait]
    impl AuthorizationRepository for FakeAuthorizationRepository {
        async fn list_grants_for_roles(
            &self,
            _tenant_id: TenantId,
            roles: &[String],
        ) -> AppResult<Vec<RoleGrant>> {
            Ok(self
                .grants
                .iter()
                .filter(|grant| roles.contains(&grant.role))
                .cloned()
                .collect())
        }
    }

    fn service(grants: Vec<RoleGrant>) -> DirectoryService {
        DirectoryService::new(
            Arc::new(FakeDirectoryRepository),
            AuthorizationService::new(Arc::new(FakeAuthorizationRepository { grants })),
        )
    }

    fn actor(tenant_id: TenantId) -> UserIdentity {
        UserIdentity::new("alice", "Alice", None, tenant_id, vec!["clerk".to_owned()])
    }

    #[tokio::test]
    async fn listing_users_requires_the_user_list_grant() {
        let tenant_id = TenantId::new();

        let denied = service(Vec::new());
        assert!(denied.list_users(&actor(tenant_id)).await.is_err());

        let allowed = service(vec![RoleGrant {
            role: "clerk".to_owned(),
            entity_logical_name: "user".to_owned(),
            operation: RecordOperation::List,
        }]);
        let options = allowed.list_users(&actor(tenant_id)).await;
        assert!(options.is_ok());
        assert_eq!(options.unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn listing_organizations_requires_the_organization_list_grant() {
        let tenant_id = TenantId::new();

        let denied = service(vec![RoleGrant {
            role: "clerk".to_owned(),
            entity_logical_name: "user".to_owned(),
            operation: RecordOperation::List,
        }]);
        assert!(denied.list_organizations(&actor(tenant_id)).await.is_err());
    }
}
