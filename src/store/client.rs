//! Client facade over an injected [`StoreApi`].

use crate::common::{ClientConfig, Result};
use crate::store::api::{DeleteItemInput, PutItemInput, QueryInput, Record, StoreApi};
use crate::store::backoff::await_endpoint;
use crate::store::batch::{BatchKeys, ChunkedBatchFetcher};
use crate::store::codec;
use crate::store::scan::{ScanSpec, SegmentCount, SegmentedScanner};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// An item that knows how to become a put request.
pub trait Marshal {
    fn marshal(&self) -> Result<PutItemInput>;
}

/// An item that can be deleted by key.
pub trait Deletable {
    fn table_name(&self) -> &str;
    fn key(&self) -> BTreeMap<String, Value>;
}

pub struct Client {
    api: Arc<dyn StoreApi>,
    config: ClientConfig,
    scanner: SegmentedScanner,
    fetcher: ChunkedBatchFetcher,
}

impl Client {
    /// Build a client. Outside production, waits for the configured endpoint
    /// to accept connections first and fails if it never does.
    pub async fn new(config: ClientConfig, api: Arc<dyn StoreApi>) -> Result<Self> {
        config.validate()?;

        if !config.is_production() {
            tracing::info!("Creating {:?} client for {}", config.environment, config.endpoint);
            await_endpoint(&config.endpoint, &config.backoff_policy(), config.connect_timeout())
                .await?;
        }

        Ok(Self::with_api(config, api))
    }

    /// Build a client without probing the endpoint.
    pub fn with_api(config: ClientConfig, api: Arc<dyn StoreApi>) -> Self {
        Self {
            scanner: SegmentedScanner::new(api.clone(), config.scan_channel_capacity),
            fetcher: ChunkedBatchFetcher::new(api.clone()),
            api,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Segmented scan bound into `destination`.
    ///
    /// `destination` is only replaced once every segment has finished and
    /// every record has been bound.
    pub async fn scan<T: DeserializeOwned>(
        &self,
        spec: &ScanSpec,
        destination: &mut Vec<T>,
    ) -> Result<()> {
        let records = self.scan_records(spec).await?;
        *destination = codec::decode(records)?;
        Ok(())
    }

    /// Segmented scan returning raw records. A `ScanSpec` left on
    /// [`SegmentCount::Auto`] picks up the configured default.
    pub async fn scan_records(&self, spec: &ScanSpec) -> Result<Vec<Record>> {
        if spec.segments == SegmentCount::Auto && self.config.scan_segments > 0 {
            let spec = spec.clone().with_segments(self.config.default_segments());
            return self.scanner.scan(&spec).await;
        }
        self.scanner.scan(spec).await
    }

    /// Chunked batch-get bound into `destination`, in key order.
    pub async fn batch_get<T: DeserializeOwned>(
        &self,
        table_name: &str,
        keys: &BatchKeys,
        destination: &mut Vec<T>,
    ) -> Result<()> {
        let records = self.batch_get_records(table_name, keys).await?;
        *destination = codec::decode(records)?;
        Ok(())
    }

    pub async fn batch_get_records(&self, table_name: &str, keys: &BatchKeys) -> Result<Vec<Record>> {
        self.fetcher.batch_get(table_name, keys).await
    }

    /// Single-page query bound into `destination`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        input: QueryInput,
        destination: &mut Vec<T>,
    ) -> Result<Option<Record>> {
        let output = self.api.query(input).await?;
        *destination = codec::decode(output.items)?;
        Ok(output.last_evaluated_key)
    }

    pub async fn put(&self, item: &impl Marshal) -> Result<()> {
        self.api.put_item(item.marshal()?).await
    }

    pub async fn delete(&self, item: &impl Deletable) -> Result<()> {
        let key = item
            .key()
            .iter()
            .map(|(name, value)| codec::encode(value).map(|attr| (name.clone(), attr)))
            .collect::<Result<Record>>()?;

        self.api
            .delete_item(DeleteItemInput {
                table_name: item.table_name().to_string(),
                key,
            })
            .await
    }
}
