//! Record reconciliation
//!
//! The provider only offers `zoneUpdate`, which takes explicit add and delete
//! lists for a zone. This module turns a single-record intent ("make name/type
//! hold this content") plus a zone snapshot into those lists.
//!
//! ## Rules
//!
//! 1. The update targets the zone by id when known, else by name
//! 2. Every record matching name, type and (when given) the old content is deleted
//! 3. The TTL is the caller's, else the first deleted record's, else the default
//! 4. At most one record is added, and only when new content is given
//!
//! The snapshot is read before the update is written. Nothing here guards
//! against the zone changing in between.

use crate::domain::relative_name;
use crate::error::{Error, Result};
use crate::model::{Record, RecordToAdd, Zone, ZoneUpdate};

/// A desired change to the records of one name and type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordChange<'a> {
    pub name: &'a str,
    pub record_type: &'a str,
    /// Content to add; `None` makes the change a pure delete
    pub new_content: Option<&'a str>,
    /// Restricts deletes to records with this content; `None` deletes all
    pub old_content: Option<&'a str>,
    /// Explicit TTL for the added record
    pub ttl: Option<u32>,
}

impl<'a> RecordChange<'a> {
    /// Replace every record of name/type with one record holding `content`
    pub fn set(name: &'a str, record_type: &'a str, content: &'a str) -> Self {
        Self {
            name,
            record_type,
            new_content: Some(content),
            old_content: None,
            ttl: None,
        }
    }

    /// Replace only the records of name/type holding `old_content`
    pub fn update(
        name: &'a str,
        record_type: &'a str,
        new_content: &'a str,
        old_content: &'a str,
    ) -> Self {
        Self {
            name,
            record_type,
            new_content: Some(new_content),
            old_content: Some(old_content),
            ttl: None,
        }
    }

    /// Delete the records of name/type, optionally only those holding `content`
    pub fn delete(name: &'a str, record_type: &'a str, content: Option<&'a str>) -> Self {
        Self {
            name,
            record_type,
            new_content: None,
            old_content: content,
            ttl: None,
        }
    }

    /// Set an explicit TTL
    pub fn with_ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Record name in relative form, as stored by the provider
    pub fn record_name(&self) -> &'a str {
        relative_name(self.name)
    }

    fn validate(&self) -> Result<()> {
        if self.record_name().trim().is_empty() {
            return Err(Error::invalid_input("record name cannot be empty"));
        }
        if self.record_type.trim().is_empty() {
            return Err(Error::invalid_input("record type cannot be empty"));
        }
        Ok(())
    }
}

/// Computed zone update plus the records it replaces
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Body for the `zoneUpdate` call
    pub update: ZoneUpdate,
    /// Records found in the zone that the update deletes
    pub previous: Vec<Record>,
    /// Content the change asked for
    pub new_content: Option<String>,
}

impl Reconciliation {
    /// Whether the zone already holds the desired state
    ///
    /// True when there is nothing to submit, or when exactly one record was
    /// found and it already has the requested content.
    pub fn is_unchanged(&self) -> bool {
        if self.update.is_empty() {
            return true;
        }
        match (self.new_content.as_deref(), self.previous.as_slice()) {
            (Some(content), [only]) => only.content == content,
            _ => false,
        }
    }
}

/// Compute the add/delete lists that apply `change` to `zone`
pub fn reconcile(zone: &Zone, change: &RecordChange<'_>, default_ttl: u32) -> Result<Reconciliation> {
    change.validate()?;
    let zone_config = zone.zone_config.target()?;

    let previous: Vec<Record> = zone
        .matching_records(change.name, Some(change.record_type), change.old_content)
        .cloned()
        .collect();

    let mut update = ZoneUpdate::new(zone_config);
    update.records_to_delete = previous.iter().map(Record::to_delete).collect();

    if let Some(content) = change.new_content {
        let ttl = change
            .ttl
            .or_else(|| previous.first().and_then(|record| record.ttl))
            .unwrap_or(default_ttl);

        update.records_to_add.push(RecordToAdd {
            name: change.record_name().to_string(),
            record_type: change.record_type.to_string(),
            content: content.to_string(),
            ttl,
        });
    }

    Ok(Reconciliation {
        update,
        previous,
        new_content: change.new_content.map(str::to_string),
    })
}

/// Compute an add-only update for `change`
///
/// Existing records are left in place. When a record with the same name, type
/// and content already exists nothing is added.
pub fn addition(zone: &Zone, change: &RecordChange<'_>, default_ttl: u32) -> Result<Reconciliation> {
    change.validate()?;
    let content = change
        .new_content
        .ok_or_else(|| Error::invalid_input("a record to add needs content"))?;
    let zone_config = zone.zone_config.target()?;

    let existing: Vec<Record> = zone
        .matching_records(change.name, Some(change.record_type), Some(content))
        .cloned()
        .collect();

    let mut update = ZoneUpdate::new(zone_config);
    if existing.is_empty() {
        update.records_to_add.push(RecordToAdd {
            name: change.record_name().to_string(),
            record_type: change.record_type.to_string(),
            content: content.to_string(),
            ttl: change.ttl.unwrap_or(default_ttl),
        });
    }

    Ok(Reconciliation {
        update,
        previous: Vec::new(),
        new_content: Some(content.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordToDelete, ZoneConfig};

    const DEFAULT_TTL: u32 = 8400;

    fn zone_with(records: Vec<Record>) -> Zone {
        Zone {
            zone_config: ZoneConfig {
                id: Some("z-1".into()),
                name: Some("example.org".into()),
                name_unicode: Some("example.org".into()),
                ..ZoneConfig::default()
            },
            records,
        }
    }

    fn delete(name: &str, record_type: &str, content: &str) -> RecordToDelete {
        RecordToDelete {
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
        }
    }

    #[test]
    fn set_carries_previous_ttl() {
        let zone = zone_with(vec![Record::new("x", "TXT", "old", 300)]);
        let result = reconcile(&zone, &RecordChange::set("x", "TXT", "new"), DEFAULT_TTL).unwrap();

        assert_eq!(result.update.zone_config, ZoneConfig::by_id("z-1"));
        assert_eq!(result.update.records_to_delete, vec![delete("x", "TXT", "old")]);
        assert_eq!(
            result.update.records_to_add,
            vec![RecordToAdd {
                name: "x".into(),
                record_type: "TXT".into(),
                content: "new".into(),
                ttl: 300,
            }]
        );
        assert!(!result.is_unchanged());
    }

    #[test]
    fn explicit_ttl_wins() {
        let zone = zone_with(vec![Record::new("x", "TXT", "old", 300)]);
        let change = RecordChange::set("x", "TXT", "new").with_ttl(Some(60));
        let result = reconcile(&zone, &change, DEFAULT_TTL).unwrap();

        assert_eq!(result.update.records_to_add[0].ttl, 60);
    }

    #[test]
    fn default_ttl_without_previous_records() {
        let zone = zone_with(Vec::new());
        let result = reconcile(&zone, &RecordChange::set("x", "TXT", "new"), DEFAULT_TTL).unwrap();

        assert!(result.update.records_to_delete.is_empty());
        assert_eq!(result.update.records_to_add[0].ttl, DEFAULT_TTL);
    }

    #[test]
    fn matching_ignores_case_and_other_types() {
        let zone = zone_with(vec![
            Record::new("X.EXAMPLE.ORG", "txt", "a", 300),
            Record::new("x.example.org", "A", "192.0.2.1", 300),
            Record::new("y.example.org", "TXT", "b", 300),
        ]);
        let result = reconcile(
            &zone,
            &RecordChange::delete("x.example.org", "TXT", None),
            DEFAULT_TTL,
        )
        .unwrap();

        assert_eq!(
            result.update.records_to_delete,
            vec![delete("X.EXAMPLE.ORG", "txt", "a")]
        );
        assert!(result.update.records_to_add.is_empty());
    }

    #[test]
    fn update_only_touches_old_content() {
        let zone = zone_with(vec![
            Record::new("x", "TXT", "keep", 300),
            Record::new("x", "TXT", "old", 120),
        ]);
        let result = reconcile(&zone, &RecordChange::update("x", "TXT", "new", "old"), DEFAULT_TTL)
            .unwrap();

        assert_eq!(result.update.records_to_delete, vec![delete("x", "TXT", "old")]);
        assert_eq!(result.update.records_to_add[0].ttl, 120);
    }

    #[test]
    fn single_identical_record_is_unchanged() {
        let zone = zone_with(vec![Record::new("x", "TXT", "same", 300)]);
        let result = reconcile(&zone, &RecordChange::set("x", "TXT", "same"), DEFAULT_TTL).unwrap();

        assert!(result.is_unchanged());
    }

    #[test]
    fn duplicates_are_collapsed_even_if_one_matches() {
        let zone = zone_with(vec![
            Record::new("x", "TXT", "same", 300),
            Record::new("x", "TXT", "other", 300),
        ]);
        let result = reconcile(&zone, &RecordChange::set("x", "TXT", "same"), DEFAULT_TTL).unwrap();

        assert!(!result.is_unchanged());
        assert_eq!(result.update.records_to_delete.len(), 2);
    }

    #[test]
    fn delete_without_matches_is_unchanged() {
        let zone = zone_with(vec![Record::new("x", "TXT", "v", 300)]);
        let result = reconcile(
            &zone,
            &RecordChange::delete("x", "TXT", Some("other")),
            DEFAULT_TTL,
        )
        .unwrap();

        assert!(result.update.is_empty());
        assert!(result.is_unchanged());
    }

    #[test]
    fn zone_without_identifier_is_rejected() {
        let zone = Zone::default();
        let result = reconcile(&zone, &RecordChange::set("x", "TXT", "v"), DEFAULT_TTL);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn empty_name_is_rejected() {
        let zone = zone_with(Vec::new());
        let result = reconcile(&zone, &RecordChange::set("", "TXT", "v"), DEFAULT_TTL);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn addition_keeps_existing_records() {
        let zone = zone_with(vec![Record::new("x", "TXT", "first", 300)]);
        let change = RecordChange::set("x", "TXT", "second").with_ttl(Some(60));
        let result = addition(&zone, &change, DEFAULT_TTL).unwrap();

        assert!(result.update.records_to_delete.is_empty());
        assert_eq!(result.update.records_to_add.len(), 1);
        assert_eq!(result.update.records_to_add[0].ttl, 60);
    }

    #[test]
    fn addition_of_existing_record_is_unchanged() {
        let zone = zone_with(vec![Record::new("x", "TXT", "first", 300)]);
        let result = addition(&zone, &RecordChange::set("x", "TXT", "FIRST"), DEFAULT_TTL).unwrap();

        assert!(result.is_unchanged());
    }

    #[test]
    fn absolute_name_replaces_relative_record() {
        let zone = zone_with(vec![Record::new("x.example.org", "TXT", "old", 300)]);
        let result = reconcile(
            &zone,
            &RecordChange::set("x.example.org.", "TXT", "new"),
            DEFAULT_TTL,
        )
        .unwrap();

        assert_eq!(
            result.update.records_to_delete,
            vec![delete("x.example.org", "TXT", "old")]
        );
        assert_eq!(result.update.records_to_add[0].name, "x.example.org");
        assert_eq!(result.update.records_to_add[0].ttl, 300);
    }

    #[test]
    fn lone_dot_is_an_empty_name() {
        let zone = zone_with(Vec::new());
        let result = reconcile(&zone, &RecordChange::set(".", "TXT", "v"), DEFAULT_TTL);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
