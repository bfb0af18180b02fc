use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{TenantBinding, TenantId};

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("Principal {principal_id} has {count} tenant bindings")]
    Ambiguous { principal_id: Uuid, count: usize },

    #[error("Invalid binding row: {0}")]
    InvalidRow(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Read-only view of the principal → tenant bindings written by the OAuth flow
#[async_trait]
pub trait BindingStore: Send + Sync {
    /// Zero or one binding for the principal. More than one is an error.
    async fn find_binding(&self, principal_id: Uuid) -> Result<Option<TenantBinding>, BindingError>;

    /// Connectivity check for `/health`
    async fn ping(&self) -> Result<(), BindingError>;
}

#[derive(Debug, FromRow)]
struct BindingRow {
    tenant_id: String,
    instance_url: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

impl BindingRow {
    fn into_binding(self, principal_id: Uuid) -> Result<TenantBinding, BindingError> {
        let tenant_id = TenantId::parse(&self.tenant_id)
            .ok_or_else(|| BindingError::InvalidRow("tenant_id is empty".to_string()))?;

        Ok(TenantBinding {
            principal_id,
            tenant_id,
            instance_url: self.instance_url,
            issued_at: self.issued_at,
        })
    }
}

/// Postgres-backed binding store over the `salesforce_tenants` table
#[derive(Clone)]
pub struct PgBindingStore {
    pool: PgPool,
}

impl PgBindingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Collapse a lookup result into zero-or-one, rejecting duplicates
fn single_binding(
    principal_id: Uuid,
    mut rows: Vec<BindingRow>,
) -> Result<Option<TenantBinding>, BindingError> {
    match rows.len() {
        0 => Ok(None),
        1 => rows.pop().map(|row| row.into_binding(principal_id)).transpose(),
        count => Err(BindingError::Ambiguous { principal_id, count }),
    }
}

#[async_trait]
impl BindingStore for PgBindingStore {
    async fn find_binding(&self, principal_id: Uuid) -> Result<Option<TenantBinding>, BindingError> {
        // LIMIT 2 is enough to detect a violated one-binding invariant
        let rows: Vec<BindingRow> = sqlx::query_as(
            r#"
            SELECT tenant_id, instance_url, issued_at
            FROM salesforce_tenants
            WHERE user_id = $1
            LIMIT 2
            "#,
        )
        .bind(principal_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(principal = %principal_id, rows = rows.len(), "Tenant binding lookup");
        single_binding(principal_id, rows)
    }

    async fn ping(&self) -> Result<(), BindingError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tenant: &str) -> BindingRow {
        BindingRow {
            tenant_id: tenant.to_string(),
            instance_url: Some("https://acme.my.salesforce.com".to_string()),
            issued_at: None,
        }
    }

    #[test]
    fn no_rows_is_absent() {
        assert!(single_binding(Uuid::nil(), vec![]).unwrap().is_none());
    }

    #[test]
    fn one_row_is_bound() {
        let principal = Uuid::new_v4();
        let binding = single_binding(principal, vec![row("acme")]).unwrap().unwrap();
        assert_eq!(binding.tenant_id.as_str(), "acme");
        assert_eq!(binding.principal_id, principal);
    }

    #[test]
    fn two_rows_violate_invariant() {
        let err = single_binding(Uuid::nil(), vec![row("a"), row("b")]).unwrap_err();
        assert!(matches!(err, BindingError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn blank_tenant_id_is_invalid() {
        let err = single_binding(Uuid::nil(), vec![row("  ")]).unwrap_err();
        assert!(matches!(err, BindingError::InvalidRow(_)));
    }
}
