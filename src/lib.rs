//! # dynawrap
//!
//! Client-side access layer for a partitioned key-value store, adding the
//! two operations the store's API leaves to callers:
//! - Segmented parallel scans (one task per store-side segment)
//! - Chunked, paginated batch-gets that keep caller key order
//! - A backoff connectivity probe for development endpoints
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                   Client                     │
//! │  scan()                    batch_get()       │
//! └──────┬──────────────────────────┬────────────┘
//!        │                          │
//! ┌──────▼───────────┐     ┌────────▼──────────┐
//! │ SegmentedScanner │     │ ChunkedBatchFetcher│
//! │ N tasks ─► mpsc  │     │ 100-key chunks,    │
//! │ ─► merge loop    │     │ one at a time      │
//! └──────┬───────────┘     └────────┬──────────┘
//!        │      AttributeCodec      │
//!        └────────────┬─────────────┘
//!                ┌────▼─────┐
//!                │ StoreApi │  (injected)
//!                └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use dynawrap::store::{BatchKeys, Client, ScanSpec, StoreApi};
//! # use dynawrap::ClientConfig;
//! # async fn run(api: Arc<dyn StoreApi>) -> dynawrap::Result<()> {
//! #[derive(serde::Deserialize)]
//! struct Message {
//!     id: String,
//! }
//!
//! let client = Client::new(ClientConfig::default(), api).await?;
//!
//! let mut messages: Vec<Message> = Vec::new();
//! client
//!     .scan(&ScanSpec::new("message_group").with_segments(4), &mut messages)
//!     .await?;
//!
//! let keys = BatchKeys::new("id").with_values(["m-1", "m-2"]);
//! client.batch_get("message_group", &keys, &mut messages).await?;
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod store;

// Re-export commonly used types
pub use common::{ClientConfig, Error, Result};
pub use store::Client;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
