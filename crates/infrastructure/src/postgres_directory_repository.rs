use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use stockledger_application::{DirectoryOption, DirectoryRepository};
use stockledger_core::{AppError, AppResult, TenantId};

/// PostgreSQL-backed user and organization lookup repository.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DirectoryOptionRow {
    id: String,
    label: String,
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn list_users(&self, tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>> {
        let rows = sqlx::query_as::<_, DirectoryOptionRow>(
            r#"
            SELECT id, email AS label
            FROM users
            WHERE tenant_id = $1
            ORDER BY email
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list users in tenant '{tenant_id}': {error}"
            ))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| DirectoryOption {
                id: row.id,
                label: row.label,
            })
            .collect())
    }

    async fn list_organizations(&self, tenant_id: TenantId) -> AppResult<Vec<DirectoryOption>> {
        let rows = sqlx::query_as::<_, DirectoryOptionRow>(
            r#"
            SELECT id, name AS label
            FROM organizations
            WHERE tenant_id = $1
            ORDER BY name
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list organizations in tenant '{tenant_id}': {error}"
            ))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| DirectoryOption {
                id: row.id,
                label: row.label,
            })
            .collect())
    }
}
