//! Value types mirroring the provider's JSON objects
//!
//! Zones and records are snapshots decoded from a single API response. They are
//! never cached between calls, so a zone may already be stale when the update
//! computed from it is submitted.

use crate::domain::relative_name;
use serde::{Deserialize, Serialize};

/// Zone configuration as returned by the provider
///
/// Only the fields this client relies on are modelled; everything else the
/// provider sends is kept in `extra` so a config can be sent back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_unicode: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ZoneConfig {
    /// Reference a zone by its config id
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Reference a zone by its name
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Build a config from whichever identifiers are known
    pub fn from_parts(id: Option<String>, name: Option<String>) -> Self {
        Self {
            id,
            name,
            ..Self::default()
        }
    }

    /// Reduce to the identifier sent as an update target
    ///
    /// The id is preferred over the name when both are present.
    pub fn target(&self) -> crate::Result<ZoneConfig> {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            return Ok(ZoneConfig::by_id(id));
        }
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            return Ok(ZoneConfig::by_name(name));
        }
        Err(crate::Error::invalid_input(
            "zone config has neither an id nor a name",
        ))
    }

    /// Unicode name if known, otherwise the plain name
    pub fn display_name(&self) -> &str {
        self.name_unicode
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }
}

/// Identifies a zone for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneRef {
    Id(String),
    Name(String),
}

/// A DNS record as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_config_id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "type")]
    pub record_type: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl Record {
    /// Create a record value
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Case-insensitive match on name and, when given, type and content
    ///
    /// Absolute and relative forms of a name are equal. The TTL is never part
    /// of a record's identity.
    pub fn matches(&self, name: &str, record_type: Option<&str>, content: Option<&str>) -> bool {
        eq_ignore_case(relative_name(&self.name), relative_name(name))
            && record_type.is_none_or(|t| eq_ignore_case(&self.record_type, t))
            && content.is_none_or(|c| eq_ignore_case(&self.content, c))
    }

    /// Delete entry identifying this record
    pub fn to_delete(&self) -> RecordToDelete {
        RecordToDelete {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
            content: self.content.clone(),
        }
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// A zone snapshot with its full record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default)]
    pub zone_config: ZoneConfig,

    #[serde(default)]
    pub records: Vec<Record>,
}

impl Zone {
    /// Number of dots in the zone's name; deeper zones are more specific
    pub fn depth(&self) -> usize {
        self.zone_config.display_name().matches('.').count()
    }

    /// Records matching name and, when given, type and content
    pub fn matching_records<'a>(
        &'a self,
        name: &'a str,
        record_type: Option<&'a str>,
        content: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |record| record.matches(name, record_type, content))
    }

    /// Whether any record matches
    pub fn contains_record(
        &self,
        name: &str,
        record_type: Option<&str>,
        content: Option<&str>,
    ) -> bool {
        self.records
            .iter()
            .any(|record| record.matches(name, record_type, content))
    }
}

/// Entry of a `recordsToAdd` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordToAdd {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
}

/// Entry of a `recordsToDelete` list; deletes are identified without a TTL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordToDelete {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
}

/// Body of a `zoneUpdate` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneUpdate {
    pub zone_config: ZoneConfig,
    pub records_to_add: Vec<RecordToAdd>,
    pub records_to_delete: Vec<RecordToDelete>,
}

impl ZoneUpdate {
    /// An update with fresh, empty add and delete lists
    pub fn new(zone_config: ZoneConfig) -> Self {
        Self {
            zone_config,
            records_to_add: Vec::new(),
            records_to_delete: Vec::new(),
        }
    }

    /// Whether submitting this update would change nothing
    pub fn is_empty(&self) -> bool {
        self.records_to_add.is_empty() && self.records_to_delete.is_empty()
    }
}

/// Payload of every `*Find` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindResult<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_entries: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Sort order for find results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort field and direction for find calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zone_decodes_from_provider_shape() {
        let zone: Zone = serde_json::from_value(json!({
            "zoneConfig": {
                "id": "z-1",
                "name": "xn--bcher-kva.example",
                "nameUnicode": "bücher.example",
                "type": "NATIVE",
                "emailAddress": "hostmaster@bücher.example"
            },
            "records": [
                {"id": "r-1", "zoneConfigId": "z-1", "name": "www.bücher.example",
                 "type": "A", "content": "192.0.2.1", "ttl": 3600, "priority": null}
            ]
        }))
        .expect("zone decodes");

        assert_eq!(zone.zone_config.id.as_deref(), Some("z-1"));
        assert_eq!(zone.zone_config.display_name(), "bücher.example");
        assert_eq!(zone.records[0].ttl, Some(3600));
        assert!(zone.zone_config.extra.contains_key("emailAddress"));
        assert_eq!(zone.depth(), 1);
    }

    #[test]
    fn target_prefers_id() {
        let config = ZoneConfig {
            id: Some("z-1".into()),
            name: Some("example.org".into()),
            name_unicode: Some("example.org".into()),
            ..ZoneConfig::default()
        };

        assert_eq!(config.target().unwrap(), ZoneConfig::by_id("z-1"));
        assert_eq!(
            serde_json::to_value(config.target().unwrap()).unwrap(),
            json!({"id": "z-1"})
        );
    }

    #[test]
    fn target_falls_back_to_name() {
        let config = ZoneConfig::from_parts(None, Some("example.org".into()));
        assert_eq!(config.target().unwrap(), ZoneConfig::by_name("example.org"));
    }

    #[test]
    fn target_without_identifiers_is_invalid() {
        let config = ZoneConfig::default();
        assert!(matches!(
            config.target(),
            Err(crate::Error::InvalidInput(_))
        ));
    }

    #[test]
    fn record_matching_is_case_insensitive() {
        let record = Record::new("X.EXAMPLE.COM", "txt", "Token", 300);

        assert!(record.matches("x.example.com", None, None));
        assert!(record.matches("x.example.com", Some("TXT"), None));
        assert!(record.matches("x.example.com", Some("TXT"), Some("token")));
        assert!(!record.matches("x.example.com", Some("A"), None));
        assert!(!record.matches("y.example.com", None, None));
    }

    #[test]
    fn delete_entry_omits_ttl() {
        let record = Record::new("x", "TXT", "old", 300);
        assert_eq!(
            serde_json::to_value(record.to_delete()).unwrap(),
            json!({"name": "x", "type": "TXT", "content": "old"})
        );
    }

    #[test]
    fn zone_update_wire_shape() {
        let mut update = ZoneUpdate::new(ZoneConfig::by_name("example.org"));
        update.records_to_add.push(RecordToAdd {
            name: "x.example.org".into(),
            record_type: "TXT".into(),
            content: "new".into(),
            ttl: 300,
        });

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "zoneConfig": {"name": "example.org"},
                "recordsToAdd": [{"name": "x.example.org", "type": "TXT", "content": "new", "ttl": 300}],
                "recordsToDelete": []
            })
        );
    }

    #[test]
    fn find_result_tolerates_missing_metadata() {
        let result: FindResult<Record> =
            serde_json::from_value(json!({"data": []})).expect("decodes");
        assert!(result.data.is_empty());
        assert_eq!(result.total_entries, 0);
    }

    #[test]
    fn sort_wire_shape() {
        assert_eq!(
            serde_json::to_value(Sort::desc("zoneName")).unwrap(),
            json!({"field": "zoneName", "order": "DESC"})
        );
    }
}
