//! Tenant gate for tenant-scoped pages.
//!
//! ```text
//! awaiting-session -> awaiting-tenant -> fetching-data -> success | error
//!                                     \-> redirecting
//!                                     \-> error (lookup failed)
//! awaiting-session -> error (no principal)
//! ```
//!
//! The fetch closure only ever receives a `TenantScope`, so no tenant-scoped request
//! can be issued before the binding is resolved.

use std::future::Future;

use crate::database::BindingStore;
use crate::error::ConsoleError;
use crate::types::{Principal, TenantScope};

use super::tenant_resolver::{TenantResolution, TenantResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSession,
    AwaitingTenant,
    FetchingData,
    Success,
    Error,
    Redirecting,
}

/// Terminal state of a gated page
#[derive(Debug)]
pub enum GateOutcome<T> {
    Success(T),
    Error(ConsoleError),
    /// Single navigation target; the page answers with one redirect and nothing else
    Redirecting(String),
}

impl<T> GateOutcome<T> {
    pub fn phase(&self) -> Phase {
        match self {
            GateOutcome::Success(_) => Phase::Success,
            GateOutcome::Error(_) => Phase::Error,
            GateOutcome::Redirecting(_) => Phase::Redirecting,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GateOutcome<U> {
        match self {
            GateOutcome::Success(value) => GateOutcome::Success(f(value)),
            GateOutcome::Error(err) => GateOutcome::Error(err),
            GateOutcome::Redirecting(target) => GateOutcome::Redirecting(target),
        }
    }
}

#[derive(Debug)]
pub struct GateRun<T> {
    pub outcome: GateOutcome<T>,
    /// Phases walked, in order, ending with the terminal one
    pub trail: Vec<Phase>,
}

pub struct PageGate<'a> {
    store: &'a dyn BindingStore,
    onboarding_path: &'a str,
    trail: Vec<Phase>,
}

impl<'a> PageGate<'a> {
    pub fn new(store: &'a dyn BindingStore, onboarding_path: &'a str) -> Self {
        Self {
            store,
            onboarding_path,
            trail: vec![Phase::AwaitingSession],
        }
    }

    fn enter(&mut self, phase: Phase) {
        tracing::trace!(?phase, "Gate transition");
        self.trail.push(phase);
    }

    fn finish<T>(mut self, outcome: GateOutcome<T>) -> GateRun<T> {
        self.enter(outcome.phase());
        GateRun {
            outcome,
            trail: self.trail,
        }
    }

    pub async fn run<T, F, Fut>(mut self, principal: Option<&Principal>, fetch: F) -> GateRun<T>
    where
        F: FnOnce(TenantScope) -> Fut,
        Fut: Future<Output = Result<T, ConsoleError>>,
    {
        let Some(principal) = principal else {
            return self.finish(GateOutcome::Error(ConsoleError::AuthenticationAbsent));
        };

        self.enter(Phase::AwaitingTenant);
        let binding = match TenantResolver::new(self.store).resolve(principal).await {
            TenantResolution::Resolved(binding) => binding,
            TenantResolution::Absent => {
                let target = self.onboarding_path.to_string();
                tracing::info!(principal = %principal.id, target = %target, "Redirecting to onboarding");
                return self.finish(GateOutcome::Redirecting(target));
            }
            TenantResolution::Failed(reason) => {
                return self.finish(GateOutcome::Error(ConsoleError::TenantLookupFailed(reason)));
            }
        };

        self.enter(Phase::FetchingData);
        let scope = TenantScope {
            principal: principal.clone(),
            binding,
        };

        let outcome = match fetch(scope).await {
            Ok(value) => GateOutcome::Success(value),
            Err(err) => {
                tracing::warn!(principal = %principal.id, error = %err, "Tenant-scoped fetch failed");
                GateOutcome::Error(err)
            }
        };
        self.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::BindingError;
    use crate::types::{TenantBinding, TenantId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct OneTenant(Option<&'static str>);

    #[async_trait]
    impl BindingStore for OneTenant {
        async fn find_binding(&self, principal_id: Uuid) -> Result<Option<TenantBinding>, BindingError> {
            Ok(self.0.map(|tenant| TenantBinding {
                principal_id,
                tenant_id: TenantId::parse(tenant).unwrap(),
                instance_url: None,
                issued_at: None,
            }))
        }

        async fn ping(&self) -> Result<(), BindingError> {
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl BindingStore for Broken {
        async fn find_binding(&self, _principal_id: Uuid) -> Result<Option<TenantBinding>, BindingError> {
            Err(BindingError::InvalidRow("tenant_id is empty".to_string()))
        }

        async fn ping(&self) -> Result<(), BindingError> {
            Ok(())
        }
    }

    fn principal() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: Some("ops@rift.test".to_string()),
        }
    }

    #[tokio::test]
    async fn resolved_tenant_scopes_the_fetch() {
        let store = OneTenant(Some("acme"));
        let principal = principal();
        let run = PageGate::new(&store, "/connect-salesforce")
            .run(Some(&principal), |scope| async move { Ok(scope.tenant_id().to_string()) })
            .await;

        assert!(matches!(run.outcome, GateOutcome::Success(ref t) if t == "acme"));
        assert_eq!(
            run.trail,
            vec![Phase::AwaitingSession, Phase::AwaitingTenant, Phase::FetchingData, Phase::Success]
        );
    }

    #[tokio::test]
    async fn absent_tenant_redirects_once_without_fetching() {
        let store = OneTenant(None);
        let fetches = AtomicUsize::new(0);
        let counter = &fetches;
        let principal = principal();
        let run = PageGate::new(&store, "/connect-salesforce")
            .run(Some(&principal), move |_scope| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(run.outcome, GateOutcome::Redirecting(ref to) if to == "/connect-salesforce"));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(run.trail.iter().filter(|p| **p == Phase::Redirecting).count(), 1);
        assert!(!run.trail.contains(&Phase::FetchingData));
    }

    #[tokio::test]
    async fn lookup_failure_is_an_inline_error() {
        let store = Broken;
        let principal = principal();
        let run = PageGate::new(&store, "/connect-salesforce")
            .run(Some(&principal), |_scope| async { Ok(()) })
            .await;

        match run.outcome {
            GateOutcome::Error(ConsoleError::TenantLookupFailed(reason)) => {
                assert_eq!(reason, "tenant binding record is malformed")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(run.trail, vec![Phase::AwaitingSession, Phase::AwaitingTenant, Phase::Error]);
    }

    #[tokio::test]
    async fn missing_principal_never_reaches_tenant_lookup() {
        let store = OneTenant(Some("acme"));
        let run = PageGate::new(&store, "/connect-salesforce")
            .run(None, |_scope| async { Ok(()) })
            .await;

        assert!(matches!(run.outcome, GateOutcome::Error(ConsoleError::AuthenticationAbsent)));
        assert_eq!(run.trail, vec![Phase::AwaitingSession, Phase::Error]);
    }

    #[tokio::test]
    async fn fetch_failure_ends_in_error() {
        let store = OneTenant(Some("acme"));
        let principal = principal();
        let run: GateRun<()> = PageGate::new(&store, "/connect-salesforce")
            .run(Some(&principal), |_scope| async {
                Err(ConsoleError::data_fetch_failed(Some(500), "backend responded with 500"))
            })
            .await;

        assert!(matches!(
            run.outcome,
            GateOutcome::Error(ConsoleError::DataFetchFailed { status: Some(500), .. })
        ));
        assert_eq!(run.trail.last(), Some(&Phase::Error));
    }
}
