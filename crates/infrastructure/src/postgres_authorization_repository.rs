use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use stockledger_application::AuthorizationRepository;
use stockledger_core::{AppError, AppResult, TenantId};
use stockledger_domain::{RecordOperation, RoleGrant};

/// PostgreSQL-backed role-grant repository.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleGrantRow {
    role: String,
    entity_logical_name: String,
    operation: String,
}

fn role_grant_from_row(row: RoleGrantRow) -> AppResult<RoleGrant> {
    let operation = RecordOperation::from_str(row.operation.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "role_grants row for role '{}' holds an invalid operation: {error}",
            row.role
        ))
    })?;

    Ok(RoleGrant {
        role: row.role,
        entity_logical_name: row.entity_logical_name,
        operation,
    })
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_grants_for_roles(
        &self,
        tenant_id: TenantId,
        roles: &[String],
    ) -> AppResult<Vec<RoleGrant>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            SELECT role, entity_logical_name, operation
            FROM role_grants
            WHERE tenant_id = $1 AND role = ANY($2)
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(roles)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list role grants in tenant '{tenant_id}': {error}"
            ))
        })?;

        rows.into_iter().map(role_grant_from_row).collect()
    }
}
