//! Segmented parallel scan.
//!
//! A scan is split into N store-side segments. Each segment is paged through
//! by its own task; records flow into one channel and are merged by a single
//! loop that owns the aggregate. A separate supervisor joins the workers and
//! reports completion (or the first failure) on its own channel, so the
//! merge loop never has to tell a record from a termination signal.

use crate::common::{Error, Result};
use crate::store::api::{Record, ScanInput, StoreApi};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How many segments a scan is split into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentCount {
    /// One segment per available CPU.
    #[default]
    Auto,
    Exact(NonZeroUsize),
}

impl SegmentCount {
    /// The positive segment count workers are dispatched with.
    pub fn resolve(self) -> usize {
        match self {
            SegmentCount::Auto => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            SegmentCount::Exact(n) => n.get(),
        }
    }
}

impl From<usize> for SegmentCount {
    fn from(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(SegmentCount::Auto, SegmentCount::Exact)
    }
}

/// What to scan. Cloned once per scan and shared read-only by all workers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSpec {
    pub table_name: String,
    pub filter_expression: Option<String>,
    pub expression_values: Record,
    pub segments: SegmentCount,
}

impl ScanSpec {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, expression: impl Into<String>, values: Record) -> Self {
        self.filter_expression = Some(expression.into());
        self.expression_values = values;
        self
    }

    pub fn with_segments(mut self, segments: impl Into<SegmentCount>) -> Self {
        self.segments = segments.into();
        self
    }
}

/// One worker's slice of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSegment {
    pub segment: usize,
    pub total_segments: usize,
}

impl ScanSegment {
    fn input(&self, spec: &ScanSpec, exclusive_start_key: Option<Record>) -> ScanInput {
        ScanInput {
            table_name: spec.table_name.clone(),
            filter_expression: spec.filter_expression.clone(),
            expression_attribute_values: spec.expression_values.clone(),
            segment: self.segment,
            total_segments: self.total_segments,
            exclusive_start_key,
        }
    }
}

pub struct SegmentedScanner {
    api: Arc<dyn StoreApi>,
    channel_capacity: usize,
}

impl SegmentedScanner {
    pub fn new(api: Arc<dyn StoreApi>, channel_capacity: usize) -> Self {
        Self {
            api,
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Scan every segment concurrently and return all records.
    ///
    /// Any segment failure fails the whole scan with that segment's error;
    /// the remaining workers are cancelled. Record order across segments is
    /// arbitrary; within a segment, page order is kept.
    pub async fn scan(&self, spec: &ScanSpec) -> Result<Vec<Record>> {
        let total_segments = spec.segments.resolve();
        tracing::info!(
            "Scanning {} with {} segment(s)",
            spec.table_name,
            total_segments
        );

        let spec = Arc::new(spec.clone());
        let cancel = CancellationToken::new();
        // Dropping this future stops the workers too.
        let _guard = cancel.clone().drop_guard();

        let (records_tx, mut records_rx) = mpsc::channel::<Record>(self.channel_capacity);
        let (done_tx, mut done_rx) = oneshot::channel::<Result<()>>();

        let mut workers = JoinSet::new();
        for segment in 0..total_segments {
            let segment = ScanSegment {
                segment,
                total_segments,
            };
            workers.spawn(scan_segment(
                self.api.clone(),
                spec.clone(),
                segment,
                records_tx.clone(),
                cancel.clone(),
            ));
        }
        drop(records_tx);

        tokio::spawn(supervise(workers, done_tx, cancel.clone()));

        let mut aggregate = Vec::new();
        let mut records_open = true;
        loop {
            tokio::select! {
                outcome = &mut done_rx => {
                    match outcome {
                        Ok(Ok(())) => {
                            // Workers are gone; take whatever is still buffered.
                            while let Some(record) = records_rx.recv().await {
                                aggregate.push(record);
                            }
                            break;
                        }
                        Ok(Err(e)) => {
                            tracing::warn!("Scan of {} failed: {}", spec.table_name, e);
                            return Err(e);
                        }
                        Err(_) => {
                            return Err(Error::Internal(
                                "scan supervisor exited without reporting".into(),
                            ))
                        }
                    }
                }
                record = records_rx.recv(), if records_open => {
                    match record {
                        Some(record) => aggregate.push(record),
                        None => records_open = false,
                    }
                }
            }
        }

        tracing::info!(
            "Scan of {} finished: {} record(s)",
            spec.table_name,
            aggregate.len()
        );
        Ok(aggregate)
    }
}

/// Page through one segment, forwarding records one at a time.
async fn scan_segment(
    api: Arc<dyn StoreApi>,
    spec: Arc<ScanSpec>,
    segment: ScanSegment,
    records: mpsc::Sender<Record>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut start_key = None;
    let mut pages = 0usize;

    loop {
        let input = segment.input(&spec, start_key.take());
        let page = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            page = api.scan(input) => page?,
        };
        pages += 1;
        tracing::debug!(
            segment = segment.segment,
            page = pages,
            items = page.items.len(),
            "Scan page received"
        );

        for record in page.items {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                sent = records.send(record) => {
                    // Receiver gone: the scan already finished or failed.
                    if sent.is_err() {
                        return Ok(());
                    }
                }
            }
        }

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => return Ok(()),
        }
    }
}

/// Join all workers and publish the outcome. The first failure cancels the rest.
async fn supervise(
    mut workers: JoinSet<Result<()>>,
    done: oneshot::Sender<Result<()>>,
    cancel: CancellationToken,
) {
    while let Some(joined) = workers.join_next().await {
        let failure = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e,
            Err(e) => Error::Internal(format!("scan worker failed: {}", e)),
        };
        cancel.cancel();
        let _ = done.send(Err(failure));
        return;
    }
    let _ = done.send(Ok(()));
}
