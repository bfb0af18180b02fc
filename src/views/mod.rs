//! View models for console pages.
//!
//! Built from validated backend records; rendered either as HTML through the
//! templates in `html` or serialized as the JSON body of a page request.

pub mod html;

pub use html::PageRenderer;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::format::{self, BadgeVariant};
use crate::services::backend::{ActivityEntry, CrmAdvisor, CrmClient, ServiceRequest, TenantInfo};
use crate::types::{Principal, TenantBinding, TenantScope};

/// Activity log shows the most recent entries only
pub const ACTIVITY_LIMIT: usize = 50;

/// Something the HTML layout can wrap
pub trait Page: Serialize {
    /// Sidebar entry to highlight
    fn nav(&self) -> &'static str;
    fn title(&self) -> String;
    /// Registered template for the page body
    fn template(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub label: String,
    pub variant: BadgeVariant,
}

impl Badge {
    pub fn new(label: impl Into<String>, variant: BadgeVariant) -> Self {
        Self {
            label: label.into(),
            variant,
        }
    }

    pub fn status(status: &str) -> Self {
        Self::new(status, format::status_variant(status))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A table, or the designated empty state when there is nothing to show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing<R> {
    Rows { rows: Vec<R> },
    Empty { empty: EmptyState },
}

impl<R> Listing<R> {
    pub fn from_rows(rows: Vec<R>, empty: EmptyState) -> Self {
        if rows.is_empty() {
            Listing::Empty { empty }
        } else {
            Listing::Rows { rows }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Rows { rows } => rows.len(),
            Listing::Empty { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------- clients ----------

pub const NO_CLIENTS: EmptyState = EmptyState {
    icon: "🧑‍💼",
    title: "No clients found",
    description: "Start adding clients to your portfolio",
};

/// CRM has no client status concept; every synced client is active
pub const DEFAULT_CLIENT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    pub id: String,
    pub href: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub advisor: String,
    pub status: Badge,
}

impl From<&CrmClient> for ClientRow {
    fn from(client: &CrmClient) -> Self {
        let (first_name, last_name) = format::split_full_name(&client.name);
        Self {
            id: client.id.clone(),
            href: format::client_path(&client.id),
            first_name,
            last_name,
            email: format::or_na(client.email.as_deref()),
            advisor: "Unassigned".to_string(),
            status: Badge::status(DEFAULT_CLIENT_STATUS),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientsView {
    pub count: usize,
    pub listing: Listing<ClientRow>,
}

impl ClientsView {
    pub fn build(clients: &[CrmClient]) -> Self {
        let rows: Vec<ClientRow> = clients.iter().map(ClientRow::from).collect();
        Self {
            count: rows.len(),
            listing: Listing::from_rows(rows, NO_CLIENTS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDetailView {
    pub id: String,
    pub tenant_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub status: Badge,
    pub advisor: Option<String>,
    pub external_id: String,
    pub created: String,
    pub updated: String,
    pub metadata: Vec<MetadataField>,
}

impl ClientDetailView {
    pub fn build(scope: &TenantScope, client: &CrmClient) -> Self {
        let row = ClientRow::from(client);
        let metadata = client
            .extra
            .iter()
            .map(|(key, value)| MetadataField {
                label: format::title_case_key(key),
                value: metadata_value(value),
            })
            .collect();

        Self {
            id: row.id,
            tenant_id: scope.tenant_id().to_string(),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: format::or_na(client.phone.as_deref()),
            status: row.status,
            advisor: None,
            external_id: format::or_na(client.external_id.as_deref()),
            created: format::date_time(client.created_at),
            updated: format::date_time(client.updated_at),
            metadata,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim_end().to_string()
    }
}

fn metadata_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

// ---------- advisors ----------

pub const NO_ADVISORS: EmptyState = EmptyState {
    icon: "👥",
    title: "No advisors found",
    description: "Add advisors to start managing your team",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: Badge,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorsView {
    pub count: usize,
    pub listing: Listing<AdvisorRow>,
}

impl AdvisorsView {
    /// Ordered by last name; advisors without one go last
    pub fn build(advisors: &[CrmAdvisor]) -> Self {
        let mut sorted: Vec<&CrmAdvisor> = advisors.iter().collect();
        sorted.sort_by(|a, b| {
            (a.last_name.is_none(), a.last_name.as_deref()).cmp(&(b.last_name.is_none(), b.last_name.as_deref()))
        });

        let rows: Vec<AdvisorRow> = sorted
            .into_iter()
            .map(|advisor| {
                let name = [advisor.first_name.as_deref(), advisor.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                AdvisorRow {
                    id: advisor.id.clone(),
                    name,
                    email: format::or_na(advisor.email.as_deref()),
                    phone: format::or_na(advisor.phone.as_deref()),
                    status: Badge::status(advisor.status.as_deref().unwrap_or(DEFAULT_CLIENT_STATUS)),
                }
            })
            .collect();

        Self {
            count: rows.len(),
            listing: Listing::from_rows(rows, NO_ADVISORS),
        }
    }
}

// ---------- activity ----------

pub const NO_ACTIVITY: EmptyState = EmptyState {
    icon: "📋",
    title: "No activity recorded",
    description: "Activity will appear here as actions are performed",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub id: String,
    pub when: String,
    pub entity_type: Badge,
    pub action: Badge,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    pub listing: Listing<ActivityRow>,
}

impl ActivityView {
    pub fn build(entries: &[ActivityEntry], now: DateTime<Utc>) -> Self {
        let mut sorted: Vec<&ActivityEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let rows = sorted
            .into_iter()
            .take(ACTIVITY_LIMIT)
            .map(|entry| ActivityRow {
                id: entry.id.clone(),
                when: format::relative_time(Some(entry.created_at), now),
                entity_type: Badge::new(format::or_na(entry.entity_type.as_deref()), BadgeVariant::Neutral),
                action: Badge::new(entry.action.clone(), format::action_variant(&entry.action)),
                description: format::or_na(entry.description.as_deref()),
            })
            .collect();

        Self {
            listing: Listing::from_rows(rows, NO_ACTIVITY),
        }
    }
}

// ---------- integrations ----------

pub const NO_INTEGRATIONS: EmptyState = EmptyState {
    icon: "🔗",
    title: "No integrations configured",
    description: "Connect your CRM systems to start syncing data",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationRow {
    pub id: String,
    pub kind: String,
    pub featured: bool,
    pub status: Badge,
    pub last_sync: String,
    pub created: String,
    pub instance_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationsView {
    pub listing: Listing<IntegrationRow>,
}

impl IntegrationsView {
    pub fn build(binding: Option<&TenantBinding>, now: DateTime<Utc>) -> Self {
        let rows = binding
            .map(|binding| IntegrationRow {
                id: binding.tenant_id.to_string(),
                kind: "Salesforce".to_string(),
                featured: true,
                status: Badge::new("active", BadgeVariant::Success),
                last_sync: format::relative_time(binding.issued_at, now),
                created: format::date(binding.issued_at),
                instance_url: format::or_na(binding.instance_url.as_deref()),
            })
            .into_iter()
            .collect();

        Self {
            listing: Listing::from_rows(rows, NO_INTEGRATIONS),
        }
    }
}

// ---------- dashboard ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub tenant_id: String,
    pub tenant_name: Option<String>,
    pub stats: Vec<Stat>,
}

impl DashboardView {
    pub fn build(
        scope: &TenantScope,
        info: &TenantInfo,
        clients: &[CrmClient],
        requests: &[ServiceRequest],
        now: DateTime<Utc>,
    ) -> Self {
        let last_sync = info.issued_at.or(scope.binding.issued_at);
        Self {
            tenant_id: scope.tenant_id().to_string(),
            tenant_name: info.name.clone().filter(|n| !n.trim().is_empty()),
            stats: vec![
                Stat {
                    label: "Clients",
                    value: clients.len().to_string(),
                    icon: "🧑‍💼",
                },
                Stat {
                    label: "Service Requests",
                    value: requests.len().to_string(),
                    icon: "📨",
                },
                Stat {
                    // The resolved binding is the tenant's one integration
                    label: "Integrations",
                    value: "1".to_string(),
                    icon: "🔗",
                },
                Stat {
                    label: "Last Sync",
                    value: format::relative_time(last_sync, now),
                    icon: "🔄",
                },
            ],
        }
    }
}

// ---------- session-only pages ----------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectView {
    pub tenant_id: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub principal_id: String,
    pub email: String,
}

impl SettingsView {
    pub fn build(principal: &Principal) -> Self {
        Self {
            principal_id: principal.id.to_string(),
            email: format::or_na(principal.email.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowsView {
    pub available: bool,
    pub message: &'static str,
}

impl Default for WorkflowsView {
    fn default() -> Self {
        Self {
            available: false,
            message: "Automated workflows for client onboarding, data synchronization, and process management will be available here.",
        }
    }
}

// ---------- page wiring ----------

impl Page for ClientsView {
    fn nav(&self) -> &'static str {
        "/clients"
    }

    fn title(&self) -> String {
        format!("Clients ({})", self.count)
    }

    fn template(&self) -> &'static str {
        "clients"
    }
}

impl Page for ClientDetailView {
    fn nav(&self) -> &'static str {
        "/clients"
    }

    fn title(&self) -> String {
        self.full_name()
    }

    fn template(&self) -> &'static str {
        "client_detail"
    }
}

impl Page for AdvisorsView {
    fn nav(&self) -> &'static str {
        "/advisors"
    }

    fn title(&self) -> String {
        format!("Advisors ({})", self.count)
    }

    fn template(&self) -> &'static str {
        "advisors"
    }
}

impl Page for ActivityView {
    fn nav(&self) -> &'static str {
        "/activity"
    }

    fn title(&self) -> String {
        "Activity Log".to_string()
    }

    fn template(&self) -> &'static str {
        "activity"
    }
}

impl Page for IntegrationsView {
    fn nav(&self) -> &'static str {
        "/integrations"
    }

    fn title(&self) -> String {
        "Integrations".to_string()
    }

    fn template(&self) -> &'static str {
        "integrations"
    }
}

impl Page for DashboardView {
    fn nav(&self) -> &'static str {
        "/dashboard"
    }

    fn title(&self) -> String {
        match &self.tenant_name {
            Some(name) => format!("Dashboard - {}", name),
            None => "Dashboard".to_string(),
        }
    }

    fn template(&self) -> &'static str {
        "dashboard"
    }
}

impl Page for ConnectView {
    fn nav(&self) -> &'static str {
        "/connect-salesforce"
    }

    fn title(&self) -> String {
        "Connect Salesforce".to_string()
    }

    fn template(&self) -> &'static str {
        "connect"
    }
}

impl Page for SettingsView {
    fn nav(&self) -> &'static str {
        "/settings"
    }

    fn title(&self) -> String {
        "Settings".to_string()
    }

    fn template(&self) -> &'static str {
        "settings"
    }
}

impl Page for WorkflowsView {
    fn nav(&self) -> &'static str {
        "/workflows"
    }

    fn title(&self) -> String {
        "Workflows".to_string()
    }

    fn template(&self) -> &'static str {
        "workflows"
    }
}
