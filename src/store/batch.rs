//! Chunked, paginated batch-get.

use crate::common::{Error, Result};
use crate::store::api::{BatchGetInput, Record, StoreApi};
use crate::store::codec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Most keys the store accepts in one batch-get request.
pub const MAX_BATCH_KEYS: usize = 100;

/// Keys to fetch: one key attribute and its values, in the order results
/// should come back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchKeys {
    pub attribute: String,
    pub values: Vec<Value>,
}

impl BatchKeys {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            values: Vec::new(),
        }
    }

    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Build from an attribute-to-values map holding exactly one attribute.
    pub fn from_map(map: BTreeMap<String, Vec<Value>>) -> Result<Self> {
        if map.len() != 1 {
            return Err(Error::InvalidRequest(format!(
                "batch keys must name exactly one attribute, got {}",
                map.len()
            )));
        }
        let Some((attribute, values)) = map.into_iter().next() else {
            return Err(Error::InvalidRequest("batch keys are empty".into()));
        };
        Ok(Self { attribute, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encode every value into a single-attribute key record.
    pub fn encode(&self) -> Result<Vec<Record>> {
        self.values
            .iter()
            .map(|value| {
                let attr = codec::encode(value)?;
                Ok(Record::from([(self.attribute.clone(), attr)]))
            })
            .collect()
    }
}

pub struct ChunkedBatchFetcher {
    api: Arc<dyn StoreApi>,
}

impl ChunkedBatchFetcher {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }

    /// Fetch all `keys` from `table_name`, one chunk of at most
    /// [`MAX_BATCH_KEYS`] at a time.
    ///
    /// Chunks run sequentially so the result follows key order. The first
    /// failing request aborts the batch.
    pub async fn batch_get(&self, table_name: &str, keys: &BatchKeys) -> Result<Vec<Record>> {
        let encoded = keys.encode()?;
        if encoded.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = encoded.chunks(MAX_BATCH_KEYS);
        tracing::info!(
            "Batch get of {} key(s) from {} in {} chunk(s)",
            encoded.len(),
            table_name,
            chunks.len()
        );

        let mut aggregate = Vec::with_capacity(encoded.len());
        for (index, chunk) in chunks.enumerate() {
            let fetched = self.fetch_chunk(table_name, chunk.to_vec(), &mut aggregate).await?;
            tracing::debug!(chunk = index, keys = chunk.len(), fetched, "Batch chunk complete");
        }

        tracing::info!(
            "Batch get from {} finished: {} record(s)",
            table_name,
            aggregate.len()
        );
        Ok(aggregate)
    }

    /// Drive one chunk until the store reports no unprocessed keys.
    async fn fetch_chunk(
        &self,
        table_name: &str,
        keys: Vec<Record>,
        aggregate: &mut Vec<Record>,
    ) -> Result<usize> {
        let mut pending = keys;
        let mut fetched = 0;

        while !pending.is_empty() {
            let output = self
                .api
                .batch_get_item(BatchGetInput {
                    table_name: table_name.to_string(),
                    keys: pending,
                })
                .await?;

            fetched += output.responses.len();
            aggregate.extend(output.responses);
            pending = output.unprocessed_keys;
        }

        Ok(fetched)
    }
}
