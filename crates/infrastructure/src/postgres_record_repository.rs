use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use stockledger_application::{RecordQuery, RecordRepository, RelationIncludes};
use stockledger_core::{AppError, AppResult, TenantId};
use stockledger_domain::{
    GoodsReceipt, GoodsReceiptDraft, RecordId, RelatedOrganization, RelatedUser,
};
use uuid::Uuid;

/// PostgreSQL-backed goods-receipt repository.
#[derive(Clone)]
pub struct PostgresRecordRepository {
    pool: PgPool,
}

impl PostgresRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GoodsReceiptRow {
    id: Uuid,
    po_date: NaiveDate,
    po_value: i64,
    po_number: i64,
    user_id: Option<String>,
    organization_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    related_user_id: Option<String>,
    related_user_email: Option<String>,
    related_organization_id: Option<String>,
    related_organization_name: Option<String>,
}

fn goods_receipt_from_row(row: GoodsReceiptRow, includes: RelationIncludes) -> GoodsReceipt {
    let user = includes
        .user
        .then(|| {
            row.related_user_id
                .zip(row.related_user_email)
                .map(|(id, email)| RelatedUser { id, email })
        })
        .flatten();

    let organization = includes
        .organization
        .then(|| {
            row.related_organization_id
                .zip(row.related_organization_name)
                .map(|(id, name)| RelatedOrganization { id, name })
        })
        .flatten();

    GoodsReceipt::new(
        RecordId::from_uuid(row.id),
        row.po_date,
        row.po_value,
        row.po_number,
        row.user_id,
        row.organization_id,
        row.created_at,
        row.updated_at,
        user,
        organization,
    )
}

const SELECT_WITH_RELATIONS: &str = r#"
    SELECT g.id, g.po_date, g.po_value, g.po_number, g.user_id, g.organization_id,
           g.created_at, g.updated_at,
           u.id AS related_user_id, u.email AS related_user_email,
           o.id AS related_organization_id, o.name AS related_organization_name
    FROM goods_receipts g
    LEFT JOIN users u ON u.id = g.user_id
    LEFT JOIN organizations o ON o.id = g.organization_id
"#;

#[async_trait]
impl RecordRepository for PostgresRecordRepository {
    async fn list_records(
        &self,
        tenant_id: TenantId,
        query: RecordQuery,
    ) -> AppResult<Vec<GoodsReceipt>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_WITH_RELATIONS);
        builder.push(" WHERE g.tenant_id = ");
        builder.push_bind(tenant_id.as_uuid());

        for filter in &query.filters {
            match filter.field_logical_name.as_str() {
                "id" => {
                    let record_id = RecordId::parse(filter.value.as_str())?;
                    builder.push(" AND g.id = ");
                    builder.push_bind(record_id.as_uuid());
                }
                "user_id" => {
                    builder.push(" AND g.user_id = ");
                    builder.push_bind(filter.value.clone());
                }
                "organization_id" => {
                    builder.push(" AND g.organization_id = ");
                    builder.push_bind(filter.value.clone());
                }
                other => {
                    return Err(AppError::Validation(format!(
                        "unsupported filter field '{other}'"
                    )));
                }
            }
        }

        builder.push(" ORDER BY g.created_at DESC, g.id");

        if let Some(limit) = query.limit {
            let limit = i64::try_from(limit).map_err(|error| {
                AppError::Validation(format!("invalid record list limit: {error}"))
            })?;
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }

        if query.offset > 0 {
            let offset = i64::try_from(query.offset).map_err(|error| {
                AppError::Validation(format!("invalid record list offset: {error}"))
            })?;
            builder.push(" OFFSET ");
            builder.push_bind(offset);
        }

        let rows = builder
            .build_query_as::<GoodsReceiptRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list goods receipts in tenant '{tenant_id}': {error}"
                ))
            })?;

        Ok(rows
            .into_iter()
            .map(|row| goods_receipt_from_row(row, query.includes))
            .collect())
    }

    async fn find_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
        includes: RelationIncludes,
    ) -> AppResult<Option<GoodsReceipt>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_WITH_RELATIONS);
        builder.push(" WHERE g.tenant_id = ");
        builder.push_bind(tenant_id.as_uuid());
        builder.push(" AND g.id = ");
        builder.push_bind(record_id.as_uuid());

        let row = builder
            .build_query_as::<GoodsReceiptRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find goods receipt '{record_id}' in tenant '{tenant_id}': {error}"
                ))
            })?;

        Ok(row.map(|row| goods_receipt_from_row(row, includes)))
    }

    async fn create_record(
        &self,
        tenant_id: TenantId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<GoodsReceipt> {
        let row = sqlx::query_as::<_, GoodsReceiptRow>(
            r#"
            INSERT INTO goods_receipts (id, tenant_id, po_date, po_value, po_number, user_id, organization_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, po_date, po_value, po_number, user_id, organization_id,
                      created_at, updated_at,
                      NULL::TEXT AS related_user_id, NULL::TEXT AS related_user_email,
                      NULL::TEXT AS related_organization_id, NULL::TEXT AS related_organization_name
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id.as_uuid())
        .bind(draft.po_date())
        .bind(draft.po_value())
        .bind(draft.po_number())
        .bind(draft.user_id())
        .bind(draft.organization_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to create goods receipt in tenant '{tenant_id}': {error}"
            ))
        })?;

        Ok(goods_receipt_from_row(row, RelationIncludes::default()))
    }

    async fn update_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
        draft: GoodsReceiptDraft,
    ) -> AppResult<Option<GoodsReceipt>> {
        let row = sqlx::query_as::<_, GoodsReceiptRow>(
            r#"
            UPDATE goods_receipts
            SET po_date = $3, po_value = $4, po_number = $5,
                user_id = $6, organization_id = $7, updated_at = now()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, po_date, po_value, po_number, user_id, organization_id,
                      created_at, updated_at,
                      NULL::TEXT AS related_user_id, NULL::TEXT AS related_user_email,
                      NULL::TEXT AS related_organization_id, NULL::TEXT AS related_organization_name
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(record_id.as_uuid())
        .bind(draft.po_date())
        .bind(draft.po_value())
        .bind(draft.po_number())
        .bind(draft.user_id())
        .bind(draft.organization_id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update goods receipt '{record_id}' in tenant '{tenant_id}': {error}"
            ))
        })?;

        Ok(row.map(|row| goods_receipt_from_row(row, RelationIncludes::default())))
    }

    async fn delete_record(
        &self,
        tenant_id: TenantId,
        record_id: RecordId,
    ) -> AppResult<Option<GoodsReceipt>> {
        let row = sqlx::query_as::<_, GoodsReceiptRow>(
            r#"
            DELETE FROM goods_receipts
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, po_date, po_value, po_number, user_id, organization_id,
                      created_at, updated_at,
                      NULL::TEXT AS related_user_id, NULL::TEXT AS related_user_email,
                      NULL::TEXT AS related_organization_id, NULL::TEXT AS related_organization_name
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(record_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete goods receipt '{record_id}' in tenant '{tenant_id}': {error}"
            ))
        })?;

        Ok(row.map(|row| goods_receipt_from_row(row, RelationIncludes::default())))
    }
}
