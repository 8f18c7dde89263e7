use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use dashmap::DashMap;
use tracing::debug;

use crate::error::StorageError;
use crate::record::{HitRecord, HITS_ATTRIBUTE, PATH_ATTRIBUTE};

/// Persistent path -> hits mapping.
///
/// Implementations own the atomicity of `increment`: N concurrent calls for one key
/// must raise it by exactly N. Callers never lock around it.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Adds one to `key`, creating it at 0 first if unseen, and returns the new value.
    async fn increment(&self, key: &str) -> Result<u64, StorageError>;
}

#[async_trait]
impl<T: StoreClient + ?Sized> StoreClient for Arc<T> {
    async fn increment(&self, key: &str) -> Result<u64, StorageError> {
        (**self).increment(key).await
    }
}

#[async_trait]
impl<'a, T: StoreClient + ?Sized> StoreClient for &'a T {
    async fn increment(&self, key: &str) -> Result<u64, StorageError> {
        (**self).increment(key).await
    }
}

/// Hits table in DynamoDB, partition key `path` (S), counter `hits` (N).
#[derive(Debug, Clone)]
pub struct DynamoHitStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoHitStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl StoreClient for DynamoHitStore {
    async fn increment(&self, key: &str) -> Result<u64, StorageError> {
        // ADD is applied server side and treats a missing attribute as 0.
        let output = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PATH_ATTRIBUTE, AttributeValue::S(key.to_owned()))
            .update_expression("ADD #hits :incr")
            .expression_attribute_names("#hits", HITS_ATTRIBUTE)
            .expression_attribute_values(":incr", AttributeValue::N("1".to_owned()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(classify)?;

        let hits = hits_from_attributes(output.attributes())?;
        debug!(table = %self.table_name, path = key, hits, "update_item applied");

        Ok(hits)
    }
}

fn hits_from_attributes(
    attributes: Option<&HashMap<String, AttributeValue>>,
) -> Result<u64, StorageError> {
    let attributes = attributes
        .ok_or_else(|| StorageError::InvalidResponse("no attributes returned".to_owned()))?;

    HitRecord::from_item(attributes)
        .map(|record| record.hits)
        .ok_or_else(|| {
            StorageError::InvalidResponse(format!("unreadable item: {:?}", attributes))
        })
}

fn classify<R>(err: SdkError<UpdateItemError, R>) -> StorageError
where
    R: Debug + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();

    if let SdkError::ServiceError(service) = &err {
        let service = service.err();
        if service.is_provisioned_throughput_exceeded_exception()
            || service.is_request_limit_exceeded()
        {
            return StorageError::Throttled(detail);
        }
        return StorageError::Rejected(detail);
    }

    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            StorageError::Unreachable(detail)
        }
        _ => StorageError::Rejected(detail),
    }
}

/// In-process store. Each key is updated under its own shard lock.
#[derive(Debug, Default)]
pub struct MemoryHitStore {
    hits: DashMap<String, u64>,
}

impl MemoryHitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.hits.get(key).map(|entry| *entry.value())
    }

    /// Snapshot of every record, ordered by path.
    pub fn records(&self) -> Vec<HitRecord> {
        let mut records: Vec<HitRecord> = self
            .hits
            .iter()
            .map(|entry| HitRecord {
                path: entry.key().clone(),
                hits: *entry.value(),
            })
            .collect();
        records.sort();
        records
    }
}

#[async_trait]
impl StoreClient for MemoryHitStore {
    async fn increment(&self, key: &str) -> Result<u64, StorageError> {
        let mut hits = self.hits.entry(key.to_owned()).or_insert(0);
        *hits += 1;
        Ok(*hits)
    }
}
