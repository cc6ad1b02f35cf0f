//! hosting.de DNS API client
//!
//! One method per endpoint of the DNS API. List endpoints return a single page;
//! walking further pages is left to the caller.

use crate::transport::ReqwestTransport;
use hostingde_core::config::{ClientConfig, RetryPolicy};
use hostingde_core::filter::Filter;
use hostingde_core::model::{
    FindResult, Record, RecordToAdd, Sort, Zone, ZoneConfig, ZoneRef, ZoneUpdate,
};
use hostingde_core::traits::HttpTransport;
use hostingde_core::{Error, RequestHandler, Result};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// API path for listing zone configs
pub const ZONE_CONFIGS_FIND: &str = "/api/dns/v1/json/zoneConfigsFind";
/// API path for listing zones
pub const ZONES_FIND: &str = "/api/dns/v1/json/zonesFind";
/// API path for listing records
pub const RECORDS_FIND: &str = "/api/dns/v1/json/recordsFind";
/// API path for creating a zone
pub const ZONE_CREATE: &str = "/api/dns/v1/json/zoneCreate";
/// API path for recreating an existing zone
pub const ZONE_RECREATE: &str = "/api/dns/v1/json/zoneRecreate";
/// API path for deleting a zone
pub const ZONE_DELETE: &str = "/api/dns/v1/json/zoneDelete";
/// API path for updating a zone's records
pub const ZONE_UPDATE: &str = "/api/dns/v1/json/zoneUpdate";

#[derive(Serialize)]
struct FindRequest<'a> {
    filter: &'a Filter,
    limit: u32,
    page: u32,
    sort: Option<&'a Sort>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ZoneCreateRequest<'a> {
    zone_config: &'a ZoneConfig,
    records: &'a [RecordToAdd],
    use_default_nameserver_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    nameserver_set_id: Option<&'a str>,
}

/// Client for the hosting.de DNS endpoints
///
/// # Security
///
/// The Debug implementation delegates to [`RequestHandler`], which hides the
/// auth token.
#[derive(Debug)]
pub struct DnsClient {
    /// Request envelope with auth token, base URL and retry policy
    handler: RequestHandler,

    /// Page size for zone lookups
    zone_query_limit: u32,

    /// Page size for record lookups
    record_query_limit: u32,
}

impl DnsClient {
    /// Create a client talking to the API over HTTPS
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.http_timeout())?;
        Self::with_transport(Box::new(transport), config)
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(transport: Box<dyn HttpTransport>, config: &ClientConfig) -> Result<Self> {
        let handler = RequestHandler::from_config(transport, config)?;
        Ok(Self {
            handler,
            zone_query_limit: config.zone_query_limit,
            record_query_limit: config.record_query_limit,
        })
    }

    /// Replace the auth token
    pub fn set_auth_token(&mut self, auth_token: impl Into<String>) {
        self.handler.set_auth_token(auth_token);
    }

    /// Replace the base URL
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.handler.set_base_url(base_url);
    }

    /// Replace the object-locked retry policy
    pub fn set_retry_policy(&mut self, retry: RetryPolicy) {
        self.handler.set_retry_policy(retry);
    }

    /// The underlying request envelope
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    async fn find<T>(
        &self,
        path: &str,
        filter: &Filter,
        limit: u32,
        page: u32,
        sort: Option<&Sort>,
    ) -> Result<FindResult<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = FindRequest {
            filter,
            limit,
            page,
            sort,
        };
        self.handler.call(path, &request).await
    }

    /// List zone configs
    ///
    /// See https://www.hosting.de/api/#list-zoneconfigs
    pub async fn find_zone_configs(
        &self,
        filter: &Filter,
        limit: u32,
        page: u32,
        sort: Option<&Sort>,
    ) -> Result<FindResult<ZoneConfig>> {
        self.find(ZONE_CONFIGS_FIND, filter, limit, page, sort).await
    }

    /// List zones including their records
    ///
    /// See https://www.hosting.de/api/#listing-zones
    pub async fn find_zones(
        &self,
        filter: &Filter,
        limit: u32,
        page: u32,
        sort: Option<&Sort>,
    ) -> Result<FindResult<Zone>> {
        self.find(ZONES_FIND, filter, limit, page, sort).await
    }

    /// List records
    ///
    /// See https://www.hosting.de/api/#listing-records
    pub async fn find_records(
        &self,
        filter: &Filter,
        limit: u32,
        page: u32,
        sort: Option<&Sort>,
    ) -> Result<FindResult<Record>> {
        self.find(RECORDS_FIND, filter, limit, page, sort).await
    }

    /// First page of zones matching `filter`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Zone>)`: At least one zone
    /// - `Err(Error::ObjectNotFound)`: The filter matched nothing
    pub async fn get_zones_by_filter(&self, filter: &Filter) -> Result<Vec<Zone>> {
        let result = self
            .find_zones(filter, self.zone_query_limit, 1, None)
            .await?;

        if result.data.is_empty() {
            return Err(Error::not_found(format!(
                "Could not find any zone matching filter: {}",
                filter.to_value()
            )));
        }

        debug!(
            "Found {} zone(s) ({} in total)",
            result.data.len(),
            result.total_entries
        );
        Ok(result.data)
    }

    /// First page of records matching `filter`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Record>)`: At least one record
    /// - `Err(Error::ObjectNotFound)`: The filter matched nothing
    pub async fn get_records_by_filter(&self, filter: &Filter) -> Result<Vec<Record>> {
        let result = self
            .find_records(filter, self.record_query_limit, 1, None)
            .await?;

        if result.data.is_empty() {
            return Err(Error::not_found(format!(
                "Could not find any record matching filter: {}",
                filter.to_value()
            )));
        }

        debug!(
            "Found {} record(s) ({} in total)",
            result.data.len(),
            result.total_entries
        );
        Ok(result.data)
    }

    /// Create a zone
    ///
    /// See https://www.hosting.de/api/#creating-new-zones
    pub async fn create_zone(
        &self,
        zone_config: &ZoneConfig,
        records: &[RecordToAdd],
        use_default_nameserver_set: bool,
        nameserver_set_id: Option<&str>,
    ) -> Result<Zone> {
        let request = ZoneCreateRequest {
            zone_config,
            records,
            use_default_nameserver_set,
            nameserver_set_id,
        };
        self.handler.call(ZONE_CREATE, &request).await
    }

    /// Replace an existing zone's records wholesale
    ///
    /// See https://www.hosting.de/api/#recreating-existing-zones
    pub async fn recreate_zone(
        &self,
        zone_config: &ZoneConfig,
        records: &[RecordToAdd],
        use_default_nameserver_set: bool,
        nameserver_set_id: Option<&str>,
    ) -> Result<Zone> {
        let request = ZoneCreateRequest {
            zone_config,
            records,
            use_default_nameserver_set,
            nameserver_set_id,
        };
        self.handler.call(ZONE_RECREATE, &request).await
    }

    /// Delete a zone by config id or name
    ///
    /// See https://www.hosting.de/api/#deleting-zones
    pub async fn delete_zone(&self, zone: &ZoneRef) -> Result<()> {
        let request = match zone {
            ZoneRef::Id(id) => json!({ "zoneConfigId": id }),
            ZoneRef::Name(name) => json!({ "zoneName": name }),
        };
        let _: Value = self.handler.call(ZONE_DELETE, &request).await?;
        Ok(())
    }

    /// Submit add and delete lists for one zone
    ///
    /// See https://www.hosting.de/api/#updating-zones
    pub async fn update_zone(&self, update: &ZoneUpdate) -> Result<Zone> {
        debug!(
            "Updating zone {:?}: {} to add, {} to delete",
            update.zone_config,
            update.records_to_add.len(),
            update.records_to_delete.len()
        );
        self.handler.call(ZONE_UPDATE, update).await
    }
}
