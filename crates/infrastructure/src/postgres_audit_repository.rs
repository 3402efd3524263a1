use async_trait::async_trait;
use sqlx::PgPool;
use stockledger_application::{AuditEvent, AuditRepository};
use stockledger_core::{AppError, AppResult};

/// PostgreSQL-backed append-only audit log.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_events (tenant_id, subject, action, entity_logical_name, record_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.tenant_id.as_uuid())
        .bind(event.subject.as_str())
        .bind(event.action.as_str())
        .bind(event.entity_logical_name.as_str())
        .bind(event.record_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to append audit event for record '{}' in tenant '{}': {error}",
                event.record_id, event.tenant_id
            ))
        })?;

        Ok(())
    }
}
