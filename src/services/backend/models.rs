//! Typed responses from the tenant-scoped data backend.
//!
//! Every endpoint decodes into an explicit type and passes a validation step, so a
//! malformed payload surfaces as a fetch failure instead of blank cells in a table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Post-decode checks the type system can't express
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate().map_err(|e| format!("item {}: {}", i, e)))
    }
}

fn require_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        Err("missing id".to_string())
    } else {
        Ok(())
    }
}

/// Salesforce contact as returned by `/clients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmClient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "externalId")]
    pub external_id: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", deserialize_with = "timestamp::optional")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Anything else the CRM sends, shown as metadata on the detail page
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for CrmClient {
    fn validate(&self) -> Result<(), String> {
        require_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmAdvisor {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Validate for CrmAdvisor {
    fn validate(&self) -> Result<(), String> {
        require_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "timestamp::required")]
    pub created_at: DateTime<Utc>,
}

impl Validate for ActivityEntry {
    fn validate(&self) -> Result<(), String> {
        require_id(&self.id)?;
        if self.action.trim().is_empty() {
            return Err("missing action".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "createdAt", deserialize_with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Validate for ServiceRequest {
    fn validate(&self) -> Result<(), String> {
        require_id(&self.id)
    }
}

/// `/tenants/{id}/info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    #[serde(default, alias = "tenant_id")]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "instance_url")]
    pub instance_url: Option<String>,
    #[serde(default, alias = "issued_at", deserialize_with = "timestamp::optional")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl Validate for TenantInfo {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Salesforce reports `issued_at` as epoch millis, sometimes as a string;
/// the proxy itself emits RFC 3339. Accept all three.
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    fn convert<E: Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
        match raw {
            Raw::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(text) => {
                if let Ok(at) = DateTime::parse_from_rfc3339(&text) {
                    return Ok(at.with_timezone(&Utc));
                }
                text.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .ok_or_else(|| E::custom(format!("invalid timestamp: {}", text)))
            }
        }
    }

    pub fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        convert(Raw::deserialize(deserializer)?)
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Raw>::deserialize(deserializer)?.map(convert).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn client_keeps_unknown_fields_as_extra() {
        let client: CrmClient = serde_json::from_value(json!({
            "id": "1",
            "name": "Jane Doe",
            "email": "j@x.com",
            "account_name": "Doe Family Trust"
        }))
        .unwrap();
        assert_eq!(client.email.as_deref(), Some("j@x.com"));
        assert_eq!(client.extra["account_name"], "Doe Family Trust");
        assert!(client.validate().is_ok());
    }

    #[test]
    fn client_system_fields_stay_out_of_extra() {
        let client: CrmClient = serde_json::from_value(json!({
            "id": "1",
            "name": "Jane Doe",
            "externalId": "003ABC",
            "created_at": "2026-01-05T15:04:00Z",
            "updatedAt": 1767625440000i64,
            "account_tier": "gold"
        }))
        .unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 1, 5, 15, 4, 0).unwrap();
        assert_eq!(client.external_id.as_deref(), Some("003ABC"));
        assert_eq!(client.created_at, Some(expected));
        assert_eq!(client.updated_at, Some(expected));
        assert_eq!(client.extra.len(), 1);
        assert!(client.extra.contains_key("account_tier"));
    }

    #[test]
    fn client_without_name_is_rejected() {
        let result = serde_json::from_value::<CrmClient>(json!({ "id": "1", "email": "j@x.com" }));
        assert!(result.is_err());
    }

    #[test]
    fn blank_ids_fail_validation() {
        let clients: Vec<CrmClient> =
            serde_json::from_value(json!([{ "id": "1", "name": "A" }, { "id": "", "name": "B" }])).unwrap();
        let err = clients.validate().unwrap_err();
        assert!(err.starts_with("item 1"));
    }

    #[test]
    fn tenant_info_accepts_all_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();

        let millis: TenantInfo = serde_json::from_value(json!({ "issuedAt": 1700000000000i64 })).unwrap();
        assert_eq!(millis.issued_at, Some(expected));

        let text: TenantInfo = serde_json::from_value(json!({ "issuedAt": "1700000000000" })).unwrap();
        assert_eq!(text.issued_at, Some(expected));

        let rfc: TenantInfo = serde_json::from_value(json!({ "issued_at": "2023-11-14T22:13:20Z" })).unwrap();
        assert_eq!(rfc.issued_at, Some(expected));

        let none: TenantInfo = serde_json::from_value(json!({ "issuedAt": null })).unwrap();
        assert_eq!(none.issued_at, None);

        assert!(serde_json::from_value::<TenantInfo>(json!({ "issuedAt": "yesterday" })).is_err());
    }

    #[test]
    fn activity_requires_timestamp() {
        let result = serde_json::from_value::<ActivityEntry>(json!({ "id": "a1", "action": "created" }));
        assert!(result.is_err());
    }
}
