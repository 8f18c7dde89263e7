use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

pub const PATH_ATTRIBUTE: &str = "path";
pub const HITS_ATTRIBUTE: &str = "hits";

/// One row of the hits table: how many times a path has been requested.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HitRecord {
    pub path: String,
    pub hits: u64,
}

impl HitRecord {
    /// Reads a record out of a DynamoDB item, `None` if either attribute is missing or mistyped.
    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Option<Self> {
        let path = item.get(PATH_ATTRIBUTE)?.as_s().ok()?.clone();
        let hits = item.get(HITS_ATTRIBUTE)?.as_n().ok()?.parse::<u64>().ok()?;

        Some(Self { path, hits })
    }
}
