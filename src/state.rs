use std::sync::Arc;

use handlebars::TemplateError;

use crate::config::AppConfig;
use crate::database::{BindingStore, DatabaseManager, PgBindingStore};
use crate::middleware::{JwtSessionProvider, SessionProvider};
use crate::services::{BackendClient, PageGate};
use crate::views::PageRenderer;

/// Where tenant-scoped pages send principals that have no binding yet
pub const ONBOARDING_PATH: &str = "/connect-salesforce";

/// Shared handles for every request. Configuration is resolved once at startup
/// and travels here instead of living in a global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<dyn SessionProvider>,
    pub bindings: Arc<dyn BindingStore>,
    pub backend: BackendClient,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        sessions: Arc<dyn SessionProvider>,
        bindings: Arc<dyn BindingStore>,
        backend: BackendClient,
    ) -> Result<Self, TemplateError> {
        Ok(Self {
            config: Arc::new(config),
            sessions,
            bindings,
            backend,
            pages: Arc::new(PageRenderer::new()?),
        })
    }

    /// Production wiring: JWT sessions, Postgres bindings, HTTP backend
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let pool = DatabaseManager::connect_lazy(&config.database)?;
        let backend = BackendClient::new(&config.backend)?;
        let sessions = Arc::new(JwtSessionProvider::new(&config.auth));
        let bindings = Arc::new(PgBindingStore::new(pool));

        Ok(Self::new(config, sessions, bindings, backend)?)
    }

    /// Fresh gate for one page request
    pub fn gate(&self) -> PageGate<'_> {
        PageGate::new(self.bindings.as_ref(), ONBOARDING_PATH)
    }
}
