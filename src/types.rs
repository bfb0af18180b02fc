/// Shared types used across the console

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Authenticated operator identity, as issued by the external auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Opaque tenant identifier. Never empty, never padded with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TenantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TenantId::parse(&raw).ok_or_else(|| serde::de::Error::custom("tenant id must not be empty"))
    }
}

/// Record associating a principal with a tenant and its CRM instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantBinding {
    pub principal_id: Uuid,
    pub tenant_id: TenantId,
    pub instance_url: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Request context carried explicitly through every tenant-scoped call
#[derive(Debug, Clone)]
pub struct TenantScope {
    pub principal: Principal,
    pub binding: TenantBinding,
}

impl TenantScope {
    pub fn tenant_id(&self) -> &TenantId {
        &self.binding.tenant_id
    }
}
