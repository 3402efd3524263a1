use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use stockledger_application::{EqualityFilter, RecordQuery, RecordRepository, RelationIncludes};
use stockledger_core::{AppError, AppResult, TenantId};
use stockledger_domain::{
    GoodsReceipt, GoodsReceiptDraft, RecordId, RelatedOrganization, RelatedUser,
};
use tokio::sync::RwLock;

/// In-memory goods-receipt repository implementation.
///
/// Relation targets are seeded through [`Self::seed_user`] and
/// [`Self::seed_organization`] so include resolution behaves like the
/// storage-side join of the PostgreSQL adapter.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository {
    records: RwLock<HashMap<(TenantId, RecordId), GoodsReceipt>>,
    users: RwLock<HashMap<String, RelatedUser>>,
    organizations: RwLock<HashMap<String, RelatedOrganization>>,
}

impl InMemoryRecordRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user projection for relation includes.
    pub async fn seed_user(&self, user: RelatedUser) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Registers an organization projection for relation includes.
    pub async fn seed_organization(&self, organization: RelatedOrganization) {
        self.organizations
            .write()
            .await
            .insert(organization.id.clone(), organization);
    }

    async fn attach_includes(
        &self,
        record: GoodsReceipt,
        includes: RelationIncludes,
    ) -> GoodsReceipt {
        let user = if includes.user {
            match record.user_id() {
                Some(user_id) => self.users.read().await.get(user_id).cloned(),
                None => None,
            }
        } else {
            None
        };

        let organization = if includes.organization {
            match record.organization_id() {
                Some(organization_id) => self
                    .organizations
                    .read()
                    .await
                    .get(organization_id)
                    .cloned(),
                None => None,
            }
        } else {
            None
        };

        GoodsReceipt::new(
            record.id(),
            record.po_date(),
            record.po_value(),
            record.po_number(),
            record.user_id().map(str::to_owned),
            record.organization_id().map(str::to_owned),
            record.created_at(),
            record.updated_at(),
            user,
            organization,
        )
    }
}

fn record_matches(record: &GoodsReceipt, filter: &EqualityFilter) -> AppResult<bool> {
    match filter.field_logical_name.as_str() {
        "id" => Ok(record.id().to_string() == filter.value),
        "user_id" => Ok(record.user_id() == Some(filter.value.as_str())),
        "organization_id" => Ok(record.organization_id() == Some(filter.value.as_str())),
        other => Err(AppError::Validation(format!(
            "unsupported filter field '{other}'"
        ))),
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn list_records(
        &self,
        tenant_id: TenantId,
        query: RecordQuery,
    ) -> AppResult<Vec<GoodsReceipt>> {
        let records = self.records.read().await;

        let mut listed = Vec::new();
        for ((stored_tenant_id, _), record) in records.iter() {
            if stored_tenant_id != &tenant_id {
                continue;
            }

            let mut matches = true;
            for filter in &query.filters {
                if !record_matches(record, filter)? {
                    matches = false;
                    break;
                }
            }

            if matches {
                listed.push(record.clone());
            }
        }
        drop(records);

        listed.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().to_string().cmp(&right.id().to_string()))
        });

        let page: Vec<GoodsReceipt> = listed
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        let mut resolved = Vec::with_capacity(page.len());
        for record in page {
            resolved.push(self.attach_includes(record, query.includes).await);
        }

        Ok(resolved)
    }

    async fn find_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
        includes: RelationIncludes,
    ) -> AppResult<Option<GoodsReceipt>> {
        let record = self
            .records
            .read()
            .await
            .get(&(tenant_id, record_id))
            .cloned();

        match record {
            Some(record) => Ok(Some(self.attach_includes(record, includes).await)),
            None => Ok(None),
        }
    }

    async fn create_record(
        &self,
        tenant_id: TenantId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<GoodsReceipt> {
        let now = Utc::now();
        let record = GoodsReceipt::new(
            RecordId::new(),
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

        self.records
            .write()
            .await
            .insert((tenant_id, record.id()), record.clone());

        Ok(record)
    }

    async fn update_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<Option<GoodsReceipt>> {
        let mut records = self.records.write().await;

        let Some(existing) = records.get(&(tenant_id, record_id)) else {
            return Ok(None);
        };

        let updated = GoodsReceipt::new(
            record_id,
            draft.po_date(),
            draft.po_value(),
            draft.po_number(),
            draft.user_id().map(str::to_owned),
            draft.organization_id().map(str::to_owned),
            existing.created_at(),
            Utc::now(),
            None,
            None,
        );
        records.insert((tenant_id, record_id), updated.clone());

        Ok(Some(updated))
    }

    async fn delete_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
    ) -> AppResult<Option<GoodsReceipt>> {
        Ok(self.records.write().await.remove(&(tenant_id, record_id)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stockledger_application::{
        EqualityFilter, RecordQuery, RecordRepository, RelationIncludes,
    };
    use stockledger_core::TenantId;
    use stockledger_domain::{GoodsReceiptDraft, RecordId, RelatedUser};

    use super::InMemoryRecordRepository;

    fn draft(po_number: i64, user_id: Option<&str>) -> GoodsReceiptDraft {
        let payload = json!({
            "po_date": "2024-01-10",
            "po_value": 100,
            "po_number": po_number,
            "user_id": user_id,
        });
        GoodsReceiptDraft::from_payload(&payload).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamps() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        let record = repository.create_record(tenant_id, draft(7, None)).await;
        assert!(record.is_ok());

        let record = record.unwrap_or_else(|_| unreachable!());
        assert!(!record.id().to_string().is_empty());
        assert_eq!(record.created_at(), record.updated_at());
    }

    #[tokio::test]
    async fn list_does_not_leak_across_tenants() {
        let repository = InMemoryRecordRepository::new();
        let left_tenant = TenantId::new();
        let right_tenant = TenantId::new();

        let left = repository.create_record(left_tenant, draft(1, None)).await;
        assert!(left.is_ok());
        let right = repository.create_record(right_tenant, draft(2, None)).await;
        assert!(right.is_ok());

        let listed = repository
            .list_records(left_tenant, RecordQuery::default())
            .await;
        assert!(listed.is_ok());

        let listed = listed.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].po_number(), 1);
    }

    #[tokio::test]
    async fn equality_filters_narrow_the_listing() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        let first = repository
            .create_record(tenant_id, draft(1, Some("user-1")))
            .await;
        assert!(first.is_ok());
        let second = repository
            .create_record(tenant_id, draft(2, Some("user-2")))
            .await;
        assert!(second.is_ok());

        let listed = repository
            .list_records(
                tenant_id,
                RecordQuery {
                    filters: vec![EqualityFilter {
                        field_logical_name: "user_id".to_owned(),
                        value: "user-2".to_owned(),
                    }],
                    ..RecordQuery::default()
                },
            )
            .await;
        assert!(listed.is_ok());

        let listed = listed.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].po_number(), 2);
    }

    #[tokio::test]
    async fn unsupported_filter_field_is_rejected() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        let created = repository.create_record(tenant_id, draft(1, None)).await;
        assert!(created.is_ok());

        let listed = repository
            .list_records(
                tenant_id,
                RecordQuery {
                    filters: vec![EqualityFilter {
                        field_logical_name: "po_value".to_owned(),
                        value: "100".to_owned(),
                    }],
                    ..RecordQuery::default()
                },
            )
            .await;
        assert!(listed.is_err());
    }

    #[tokio::test]
    async fn list_honors_offset_and_limit() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        for po_number in 1..=3 {
            let created = repository
                .create_record(tenant_id, draft(po_number, None))
                .await;
            assert!(created.is_ok());
        }

        let listed = repository
            .list_records(
                tenant_id,
                RecordQuery {
                    limit: Some(1),
                    offset: 1,
                    ..RecordQuery::default()
                },
            )
            .await;
        assert!(listed.is_ok());
        assert_eq!(listed.unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn includes_resolve_seeded_relation_targets() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        repository
            .seed_user(RelatedUser {
                id: "user-1".to_owned(),
                email: "alice@example.com".to_owned(),
            })
            .await;

        let created = repository
            .create_record(tenant_id, draft(1, Some("user-1")))
            .await;
        assert!(created.is_ok());
        let record_id = created.unwrap_or_else(|_| unreachable!()).id();

        let found = repository
            .find_record(
                tenant_id,
                record_id,
                RelationIncludes {
                    user: true,
                    organization: false,
                },
            )
            .await;
        assert!(found.is_ok());

        let record = found.unwrap_or_default();
        assert!(record.is_some());
        let record = record.unwrap_or_else(|| unreachable!());
        assert_eq!(
            record.user().map(|user| user.email.as_str()),
            Some("alice@example.com")
        );
    }

    #[tokio::test]
    async fn includes_stay_empty_without_the_hint() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        repository
            .seed_user(RelatedUser {
                id: "user-1".to_owned(),
                email: "alice@example.com".to_owned(),
            })
            .await;

        let created = repository
            .create_record(tenant_id, draft(1, Some("user-1")))
            .await;
        assert!(created.is_ok());
        let record_id = created.unwrap_or_else(|_| unreachable!()).id();

        let found = repository
            .find_record(tenant_id, record_id, RelationIncludes::default())
            .await;
        assert!(found.is_ok());

        let record = found.unwrap_or_default();
        assert!(record.is_some());
        assert!(record.unwrap_or_else(|| unreachable!()).user().is_none());
    }

    #[tokio::test]
    async fn update_preserves_creation_timestamp() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        let created = repository.create_record(tenant_id, draft(1, None)).await;
        assert!(created.is_ok());
        let created = created.unwrap_or_else(|_| unreachable!());

        let updated = repository
            .update_record(tenant_id, created.id(), draft(9, None))
            .await;
        assert!(updated.is_ok());

        let updated = updated.unwrap_or_default();
        assert!(updated.is_some());
        let updated = updated.unwrap_or_else(|| unreachable!());
        assert_eq!(updated.created_at(), created.created_at());
        assert_eq!(updated.po_number(), 9);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_record_once() {
        let repository = InMemoryRecordRepository::new();
        let tenant_id = TenantId::new();

        let created = repository.create_record(tenant_id, draft(1, None)).await;
        assert!(created.is_ok());
        let record_id = created.unwrap_or_else(|_| unreachable!()).id();

        let deleted = repository.delete_record(tenant_id, record_id).await;
        assert!(deleted.is_ok());
        assert!(deleted.unwrap_or_default().is_some());

        let again = repository.delete_record(tenant_id, record_id).await;
        assert!(again.is_ok());
        assert!(again.unwrap_or_default().is_none());
    }

    #[tokio::test]
    async fn delete_in_wrong_tenant_removes_nothing() {
        let repository = InMemoryRecordRepository::new();
        let owning_tenant = TenantId::new();
        let other_tenant = TenantId::new();

        let created = repository
            .create_record(owning_tenant, draft(1, None))
            .await;
        assert!(created.is_ok());
        let record_id = created.unwrap_or_else(|_| unreachable!()).id();

        let deleted = repository.delete_record(other_tenant, record_id).await;
        assert!(deleted.is_ok());
        assert!(deleted.unwrap_or_default().is_none());

        let found = repository
            .find_record(owning_tenant, record_id, RelationIncludes::default())
            .await;
        assert!(found.is_ok());
        assert!(found.unwrap_or_default().is_some());
    }

    #[tokio::test]
    async fn find_unknown_record_yields_none() {
        let repository = InMemoryRecordRepository::new();

        let found = repository
            .find_record(TenantId::new(), RecordId::new(), RelationIncludes::default())
            .await;
        assert!(found.is_ok());
        assert!(found.unwrap_or_default().is_none());
    }
}
