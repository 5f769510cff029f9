//! The store API seam.
//!
//! Everything below the scanner and the batch fetcher (wire protocol,
//! credentials, request signing) lives behind [`StoreApi`]. Each method
//! maps to exactly one store round trip; pagination is driven by the caller.

use crate::common::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One item as returned by the store: attribute name to typed value.
pub type Record = HashMap<String, AttributeValue>;

/// The store's typed attribute representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    #[serde(rename = "S")]
    S(String),
    /// Numbers travel as decimal text.
    #[serde(rename = "N")]
    N(String),
    #[serde(rename = "B")]
    B(Vec<u8>),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null,
    #[serde(rename = "L")]
    L(Vec<AttributeValue>),
    #[serde(rename = "M")]
    M(Record),
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    #[serde(rename = "NS")]
    Ns(Vec<String>),
}

impl AttributeValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::S(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::S(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

/// A single scan page request for one segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanInput {
    pub table_name: String,
    pub filter_expression: Option<String>,
    pub expression_attribute_values: Record,
    pub segment: usize,
    pub total_segments: usize,
    pub exclusive_start_key: Option<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanOutput {
    pub items: Vec<Record>,
    /// `None` marks the last page of the segment.
    pub last_evaluated_key: Option<Record>,
}

/// A single batch-get request against one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchGetInput {
    pub table_name: String,
    pub keys: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchGetOutput {
    pub responses: Vec<Record>,
    /// Keys the store did not get to; an empty list marks the last page.
    pub unprocessed_keys: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryInput {
    pub table_name: String,
    pub index_name: Option<String>,
    pub key_condition_expression: String,
    pub filter_expression: Option<String>,
    pub expression_attribute_values: Record,
    pub limit: Option<usize>,
    pub exclusive_start_key: Option<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutput {
    pub items: Vec<Record>,
    pub last_evaluated_key: Option<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PutItemInput {
    pub table_name: String,
    pub item: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteItemInput {
    pub table_name: String,
    pub key: Record,
}

/// Remote API client consumed by the scan and batch-get engines.
///
/// Implementations report store failures through [`crate::Error::remote`];
/// the engines hand those errors back to the caller unchanged.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Fetch one page of one scan segment.
    async fn scan(&self, input: ScanInput) -> Result<ScanOutput>;

    /// Fetch one page of a batch-get.
    async fn batch_get_item(&self, input: BatchGetInput) -> Result<BatchGetOutput>;

    async fn query(&self, input: QueryInput) -> Result<QueryOutput>;

    async fn put_item(&self, input: PutItemInput) -> Result<()>;

    async fn delete_item(&self, input: DeleteItemInput) -> Result<()>;
}
