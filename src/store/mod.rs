//! Store access layer
//!
//! - `api`: the injected store client seam
//! - `codec`: attribute encoding and result binding
//! - `backoff`: connectivity probe for development endpoints
//! - `batch`: chunked, paginated batch-get
//! - `scan`: segmented parallel scan
//! - `client`: facade tying the above together

pub mod api;
pub mod backoff;
pub mod batch;
pub mod client;
pub mod codec;
pub mod scan;

pub use api::{
    AttributeValue, BatchGetInput, BatchGetOutput, DeleteItemInput, PutItemInput, QueryInput,
    QueryOutput, Record, ScanInput, ScanOutput, StoreApi,
};
pub use backoff::{await_endpoint, probe_address, BackoffPolicy, BackoffProbe, ProbeOutcome, ProbeState};
pub use batch::{BatchKeys, ChunkedBatchFetcher, MAX_BATCH_KEYS};
pub use client::{Client, Deletable, Marshal};
pub use scan::{ScanSegment, ScanSpec, SegmentCount, SegmentedScanner};
