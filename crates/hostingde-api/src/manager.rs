//! Record management facade
//!
//! [`DnsManager`] changes single records without the caller naming a zone id.
//! Each operation follows the same sequence:
//!
//! ```text
//! resolve zone ──► reconcile (pure) ──► zoneUpdate (skipped if unchanged)
//! ```
//!
//! At most one lookup and one update call are made per operation, strictly in
//! that order.

use crate::client::DnsClient;
use hostingde_core::config::ClientConfig;
use hostingde_core::domain::relative_name;
use hostingde_core::filter::{Filter, fields};
use hostingde_core::model::{Record, RecordToAdd, Zone, ZoneConfig, ZoneUpdate};
use hostingde_core::reconcile::{RecordChange, Reconciliation, addition, reconcile};
use hostingde_core::{Error, Result};
use tracing::info;

/// Result of a record change
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// A zone update was submitted
    Updated {
        /// Zone the update targeted
        zone_config: ZoneConfig,
        /// Number of records added
        added: usize,
        /// Number of records deleted
        deleted: usize,
        /// Zone as returned by the provider after the update
        zone: Zone,
    },
    /// The zone already had the desired state (no-op)
    Unchanged {
        /// Zone that was checked
        zone_config: ZoneConfig,
    },
}

impl UpdateOutcome {
    /// Whether a write was made
    pub fn is_changed(&self) -> bool {
        matches!(self, UpdateOutcome::Updated { .. })
    }

    /// Zone the change applied to
    pub fn zone_config(&self) -> &ZoneConfig {
        match self {
            UpdateOutcome::Updated { zone_config, .. } => zone_config,
            UpdateOutcome::Unchanged { zone_config } => zone_config,
        }
    }
}

/// Facade for single-record changes
#[derive(Debug)]
pub struct DnsManager {
    /// API client
    client: DnsClient,

    /// TTL used when neither the caller nor a replaced record supplies one
    default_ttl: u32,
}

impl DnsManager {
    /// Create a manager talking to the API over HTTPS
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_client(DnsClient::new(config)?, config.default_ttl))
    }

    /// Create a manager on top of an existing client
    pub fn with_client(client: DnsClient, default_ttl: u32) -> Self {
        Self {
            client,
            default_ttl,
        }
    }

    /// The underlying API client
    pub fn client(&self) -> &DnsClient {
        &self.client
    }

    /// Mutable access to the client, e.g. to replace the auth token
    pub fn client_mut(&mut self) -> &mut DnsClient {
        &mut self.client
    }

    /// The zone a record most likely belongs to
    pub async fn find_zone_for_record(
        &self,
        name: &str,
        record_type: Option<&str>,
        content: Option<&str>,
    ) -> Result<Zone> {
        self.client
            .find_zone_for_record(name, record_type, content)
            .await
    }

    /// Add a record next to any existing records of the same name and type
    ///
    /// Returns [`UpdateOutcome::Unchanged`] if an identical record exists.
    pub async fn add_record(
        &self,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let zone = self
            .client
            .find_zone_for_record(name, Some(record_type), Some(content))
            .await?;
        let change = RecordChange::set(name, record_type, content).with_ttl(ttl);
        let reconciliation = addition(&zone, &change, self.default_ttl)?;
        self.submit(reconciliation, name, record_type).await
    }

    /// Add a record to a zone known by name, without looking the zone up
    pub async fn add_record_to_zone(
        &self,
        zone_name: &str,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let mut update = ZoneUpdate::new(ZoneConfig::by_name(zone_name));
        update.records_to_add.push(RecordToAdd {
            name: relative_name(name).to_string(),
            record_type: record_type.to_string(),
            content: content.to_string(),
            ttl: ttl.unwrap_or(self.default_ttl),
        });

        let reconciliation = Reconciliation {
            update,
            previous: Vec::new(),
            new_content: Some(content.to_string()),
        };
        self.submit(reconciliation, name, record_type).await
    }

    /// Delete the records of name/type, optionally only those holding `content`
    ///
    /// Returns [`UpdateOutcome::Unchanged`] if nothing matches.
    pub async fn delete_record(
        &self,
        name: &str,
        record_type: &str,
        content: Option<&str>,
    ) -> Result<UpdateOutcome> {
        let zone = self
            .client
            .find_zone_for_record(name, Some(record_type), content)
            .await?;
        let change = RecordChange::delete(name, record_type, content);
        let reconciliation = reconcile(&zone, &change, self.default_ttl)?;
        self.submit(reconciliation, name, record_type).await
    }

    /// Delete every record of name/type from a zone known by name
    ///
    /// The records are found with a record search restricted to `zone_name`;
    /// an empty result is an [`Error::ObjectNotFound`].
    pub async fn delete_records_in_zone(
        &self,
        zone_name: &str,
        name: &str,
        record_type: &str,
    ) -> Result<UpdateOutcome> {
        let filter = Filter::record(name, Some(record_type), None)
            .and_with(Filter::field(fields::ZONE_NAME, zone_name));
        let records = self.client.get_records_by_filter(&filter).await?;

        let mut update = ZoneUpdate::new(ZoneConfig::by_name(zone_name));
        update.records_to_delete = records.iter().map(Record::to_delete).collect();

        let reconciliation = Reconciliation {
            update,
            previous: records,
            new_content: None,
        };
        self.submit(reconciliation, name, record_type).await
    }

    /// Make `content` the only record of name/type
    pub async fn set_record(
        &self,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let zone = self
            .client
            .find_zone_for_record(name, Some(record_type), None)
            .await?;
        self.set_in(&zone, name, record_type, content, ttl).await
    }

    /// Make `content` the only record of name/type in the zone named `zone_name`
    pub async fn set_record_in_zone(
        &self,
        zone_name: &str,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        self.set_record_by_zone_filter(&Filter::zone_name(zone_name), name, record_type, content, ttl)
            .await
    }

    /// Make `content` the only record of name/type in the best zone matching `zone_filter`
    pub async fn set_record_by_zone_filter(
        &self,
        zone_filter: &Filter,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let zone = self
            .client
            .find_zone_by_filter(zone_filter, name, Some(record_type), None)
            .await?;
        self.set_in(&zone, name, record_type, content, ttl).await
    }

    /// Make `content` the only record of name/type, locating the zone through
    /// the existing records
    ///
    /// Requires at least one existing record of name/type; the zone of the
    /// first hit is used.
    pub async fn set_record_by_record_search(
        &self,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let records = self
            .client
            .get_records_by_filter(&Filter::record(name, Some(record_type), None))
            .await?;

        let zone_config_id = records
            .first()
            .and_then(|record| record.zone_config_id.clone())
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Could not find any existing record with a zoneConfigId for {}",
                    name
                ))
            })?;

        let records = records
            .into_iter()
            .filter(|record| record.zone_config_id.as_deref() == Some(zone_config_id.as_str()))
            .collect();
        let zone = Zone {
            zone_config: ZoneConfig::by_id(zone_config_id),
            records,
        };

        self.set_in(&zone, name, record_type, content, ttl).await
    }

    /// Replace the records of name/type holding `old_content` with `new_content`
    pub async fn update_record(
        &self,
        name: &str,
        record_type: &str,
        new_content: &str,
        old_content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let zone = self
            .client
            .find_zone_for_record(name, Some(record_type), Some(old_content))
            .await?;
        let change = RecordChange::update(name, record_type, new_content, old_content).with_ttl(ttl);
        let reconciliation = reconcile(&zone, &change, self.default_ttl)?;
        self.submit(reconciliation, name, record_type).await
    }

    async fn set_in(
        &self,
        zone: &Zone,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: Option<u32>,
    ) -> Result<UpdateOutcome> {
        let change = RecordChange::set(name, record_type, content).with_ttl(ttl);
        let reconciliation = reconcile(zone, &change, self.default_ttl)?;
        self.submit(reconciliation, name, record_type).await
    }

    async fn submit(
        &self,
        reconciliation: Reconciliation,
        name: &str,
        record_type: &str,
    ) -> Result<UpdateOutcome> {
        let Reconciliation { update, .. } = &reconciliation;

        if reconciliation.is_unchanged() {
            info!(
                "Not updating {} ({}): zone {:?} already has the requested state",
                name, record_type, update.zone_config
            );
            return Ok(UpdateOutcome::Unchanged {
                zone_config: update.zone_config.clone(),
            });
        }

        let zone = self.client.update_zone(update).await?;

        info!(
            "Updated {} ({}) in zone {:?}: {} added, {} deleted",
            name,
            record_type,
            update.zone_config,
            update.records_to_add.len(),
            update.records_to_delete.len()
        );

        Ok(UpdateOutcome::Updated {
            zone_config: reconciliation.update.zone_config,
            added: reconciliation.update.records_to_add.len(),
            deleted: reconciliation.update.records_to_delete.len(),
            zone,
        })
    }
}
