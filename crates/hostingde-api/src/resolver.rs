//! Zone resolution for a bare record name
//!
//! Queries every suffix of the record name as a zone name in one `zonesFind`
//! call, then lets [`best_zone_for_record`] pick among the hits.

use crate::client::DnsClient;
use hostingde_core::domain::{best_zone_for_record, record_domain_list};
use hostingde_core::filter::Filter;
use hostingde_core::model::Zone;
use hostingde_core::{Error, Result};
use tracing::debug;

impl DnsClient {
    /// Zones whose name is any suffix of `record_name`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Zone>)`: At least one candidate zone
    /// - `Err(Error::ObjectNotFound)`: The name has no candidate suffix or no
    ///   candidate exists on the provider
    pub async fn find_candidate_zones(&self, record_name: &str) -> Result<Vec<Zone>> {
        let domains = record_domain_list(record_name);
        if domains.is_empty() {
            return Err(Error::not_found(format!(
                "Record name has no candidate zone names: {}",
                record_name
            )));
        }

        debug!("Looking up zones for {}: {:?}", record_name, domains);
        self.get_zones_by_filter(&Filter::zone_domain_list(&domains))
            .await
    }

    /// The zone a record most likely belongs to
    ///
    /// The returned zone may not contain the record when none of the
    /// candidates does; callers needing an exact match must check its records.
    pub async fn find_zone_for_record(
        &self,
        record_name: &str,
        record_type: Option<&str>,
        record_content: Option<&str>,
    ) -> Result<Zone> {
        let zones = self.find_candidate_zones(record_name).await?;
        select_zone(zones, record_name, record_type, record_content)
    }

    /// Best zone for a record among the zones matching `zone_filter`
    pub async fn find_zone_by_filter(
        &self,
        zone_filter: &Filter,
        record_name: &str,
        record_type: Option<&str>,
        record_content: Option<&str>,
    ) -> Result<Zone> {
        let zones = self.get_zones_by_filter(zone_filter).await?;
        select_zone(zones, record_name, record_type, record_content)
    }
}

fn select_zone(
    zones: Vec<Zone>,
    record_name: &str,
    record_type: Option<&str>,
    record_content: Option<&str>,
) -> Result<Zone> {
    let zone = best_zone_for_record(&zones, record_name, record_type, record_content)
        .cloned()
        .ok_or_else(|| Error::not_found(format!("No zone found for record: {}", record_name)))?;

    debug!(
        "Selected zone {} for record {}",
        zone.zone_config.display_name(),
        record_name
    );
    Ok(zone)
}
