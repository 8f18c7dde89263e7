//! Hit counting proxy for Lambda functions.
//!
//! [`CountingProxy`] sits between the request router and a downstream function.
//! For every invocation it bumps a persistent counter keyed by the request path,
//! forwards the untouched event to the downstream function and hands back
//! whatever that function returned.
//!
//! The only synchronisation point is the atomic add performed by the
//! [`StoreClient`]. The proxy holds no mutable state of its own, so any number of
//! instances may run side by side.

pub mod config;
pub mod downstream;
pub mod error;
pub mod event;
pub mod proxy;
pub mod record;
pub mod store;

pub use config::Config;
pub use downstream::{DownstreamInvoker, LambdaDownstream};
pub use error::{DownstreamError, HandleError, ProxyError, StorageError};
pub use event::counting_key;
pub use proxy::CountingProxy;
pub use record::HitRecord;
pub use store::{DynamoHitStore, MemoryHitStore, StoreClient};
