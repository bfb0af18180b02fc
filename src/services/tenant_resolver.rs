use crate::database::{BindingError, BindingStore};
use crate::types::{Principal, TenantBinding};

/// Outcome of looking up the tenant bound to a principal.
///
/// `Absent` means the operator has to connect a CRM org; `Failed` means the lookup
/// itself broke. Callers must not treat one as the other.
#[derive(Debug, Clone, PartialEq)]
pub enum TenantResolution {
    Resolved(TenantBinding),
    Absent,
    Failed(String),
}

pub struct TenantResolver<'a> {
    store: &'a dyn BindingStore,
}

impl<'a> TenantResolver<'a> {
    pub fn new(store: &'a dyn BindingStore) -> Self {
        Self { store }
    }

    /// One lookup, no retry. Requires the principal, so it cannot resolve before the session does.
    pub async fn resolve(&self, principal: &Principal) -> TenantResolution {
        match self.store.find_binding(principal.id).await {
            Ok(Some(binding)) => {
                tracing::debug!(principal = %principal.id, tenant = %binding.tenant_id, "Tenant resolved");
                TenantResolution::Resolved(binding)
            }
            Ok(None) => {
                tracing::info!(principal = %principal.id, "No tenant bound to principal");
                TenantResolution::Absent
            }
            Err(err) => {
                tracing::error!(principal = %principal.id, error = %err, "Tenant lookup failed");
                TenantResolution::Failed(public_reason(&err))
            }
        }
    }
}

/// What an operator gets to see; driver errors stay in the log
pub fn public_reason(err: &BindingError) -> String {
    match err {
        BindingError::Ambiguous { count, .. } => {
            format!("expected at most one tenant binding, found {}", count)
        }
        BindingError::InvalidRow(_) => "tenant binding record is malformed".to_string(),
        BindingError::Sqlx(_) => "tenant store unavailable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TenantId;
    use async_trait::async_trait;
    use uuid::Uuid;

    enum Canned {
        Bound(&'static str),
        Unbound,
        Duplicate,
        Down,
    }

    #[async_trait]
    impl BindingStore for Canned {
        async fn find_binding(&self, principal_id: Uuid) -> Result<Option<TenantBinding>, BindingError> {
            match self {
                Canned::Bound(tenant) => Ok(Some(TenantBinding {
                    principal_id,
                    tenant_id: TenantId::parse(tenant).unwrap(),
                    instance_url: None,
                    issued_at: None,
                })),
                Canned::Unbound => Ok(None),
                Canned::Duplicate => Err(BindingError::Ambiguous { principal_id, count: 2 }),
                Canned::Down => Err(BindingError::Sqlx(sqlx::Error::PoolTimedOut)),
            }
        }

        async fn ping(&self) -> Result<(), BindingError> {
            Ok(())
        }
    }

    fn principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: None,
        }
    }

    #[tokio::test]
    async fn resolves_bound_principal() {
        let store = Canned::Bound("acme");
        match TenantResolver::new(&store).resolve(&principal()).await {
            TenantResolution::Resolved(binding) => assert_eq!(binding.tenant_id.as_str(), "acme"),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unbound_principal_is_absent() {
        let store = Canned::Unbound;
        assert_eq!(TenantResolver::new(&store).resolve(&principal()).await, TenantResolution::Absent);
    }

    #[tokio::test]
    async fn lookup_errors_are_failures_not_absence() {
        let store = Canned::Down;
        let resolution = TenantResolver::new(&store).resolve(&principal()).await;
        assert_eq!(resolution, TenantResolution::Failed("tenant store unavailable".to_string()));

        let store = Canned::Duplicate;
        let resolution = TenantResolver::new(&store).resolve(&principal()).await;
        assert!(matches!(resolution, TenantResolution::Failed(reason) if reason.contains("found 2")));
    }
}
