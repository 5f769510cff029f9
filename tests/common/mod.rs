//! In-memory store used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use dynawrap::store::{
    AttributeValue, BatchGetInput, BatchGetOutput, DeleteItemInput, PutItemInput, QueryInput,
    QueryOutput, Record, ScanInput, ScanOutput, StoreApi,
};
use dynawrap::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ScanFn = Box<dyn Fn(&ScanInput) -> Result<ScanOutput> + Send + Sync>;
type BatchFn = Box<dyn Fn(&BatchGetInput) -> Result<BatchGetOutput> + Send + Sync>;

pub struct MockStore {
    scan_fn: ScanFn,
    batch_fn: BatchFn,
    /// Segment whose scan call never completes.
    hang_segment: Option<usize>,
    /// Later segments answer sooner when set.
    stagger: Option<Duration>,
    pub scan_calls: Mutex<Vec<ScanInput>>,
    pub batch_calls: Mutex<Vec<BatchGetInput>>,
    pub puts: Mutex<Vec<PutItemInput>>,
    pub deletes: Mutex<Vec<DeleteItemInput>>,
    pub query_items: Vec<Record>,
    pub abandoned: Arc<AtomicUsize>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            scan_fn: Box::new(|_| Ok(ScanOutput::default())),
            batch_fn: Box::new(|input| {
                Ok(BatchGetOutput {
                    responses: input.keys.clone(),
                    unprocessed_keys: vec![],
                })
            }),
            hang_segment: None,
            stagger: None,
            scan_calls: Mutex::new(vec![]),
            batch_calls: Mutex::new(vec![]),
            puts: Mutex::new(vec![]),
            deletes: Mutex::new(vec![]),
            query_items: vec![],
            abandoned: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_scan<F>(mut self, f: F) -> Self
    where
        F: Fn(&ScanInput) -> Result<ScanOutput> + Send + Sync + 'static,
    {
        self.scan_fn = Box::new(f);
        self
    }

    pub fn on_batch_get<F>(mut self, f: F) -> Self
    where
        F: Fn(&BatchGetInput) -> Result<BatchGetOutput> + Send + Sync + 'static,
    {
        self.batch_fn = Box::new(f);
        self
    }

    pub fn hang_segment(mut self, segment: usize) -> Self {
        self.hang_segment = Some(segment);
        self
    }

    pub fn stagger(mut self, step: Duration) -> Self {
        self.stagger = Some(step);
        self
    }

    pub fn with_query_items(mut self, items: Vec<Record>) -> Self {
        self.query_items = items;
        self
    }

    pub fn scan_count(&self) -> usize {
        self.scan_calls.lock().unwrap().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.keys.len())
            .collect()
    }

    pub fn into_api(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Counts a scan call that was dropped before it finished.
struct AbandonGuard(Arc<AtomicUsize>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreApi for MockStore {
    async fn scan(&self, input: ScanInput) -> Result<ScanOutput> {
        self.scan_calls.lock().unwrap().push(input.clone());

        if self.hang_segment == Some(input.segment) {
            let _guard = AbandonGuard(self.abandoned.clone());
            std::future::pending::<()>().await;
        }
        if let Some(step) = self.stagger {
            let reversed = input.total_segments - input.segment;
            tokio::time::sleep(step * reversed as u32).await;
        }

        (self.scan_fn)(&input)
    }

    async fn batch_get_item(&self, input: BatchGetInput) -> Result<BatchGetOutput> {
        self.batch_calls.lock().unwrap().push(input.clone());
        (self.batch_fn)(&input)
    }

    async fn query(&self, _input: QueryInput) -> Result<QueryOutput> {
        Ok(QueryOutput {
            items: self.query_items.clone(),
            last_evaluated_key: None,
        })
    }

    async fn put_item(&self, input: PutItemInput) -> Result<()> {
        self.puts.lock().unwrap().push(input);
        Ok(())
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<()> {
        if input.key.is_empty() {
            return Err(Error::remote("missing key"));
        }
        self.deletes.lock().unwrap().push(input);
        Ok(())
    }
}

pub fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

pub fn record(name: &str, value: AttributeValue) -> Record {
    Record::from([(name.to_string(), value)])
}
