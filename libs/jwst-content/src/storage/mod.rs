mod memory;

pub use memory::MemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::*;

/// The storage layer that runs mutation batches and serves related records.
#[async_trait]
pub trait MutationStore: Send + Sync {
    /// Run every `(path, action, entries)` of `batches` on behalf of the
    /// record `owner`. Results are positional: the n-th result of an action
    /// belongs to its n-th entry.
    async fn execute(&self, owner: &str, batches: &MutationBatches) -> ContentResult<ExecutedMutations>;

    /// Records of each path, for the requested join ids.
    async fn fetch(&self, ids: &BTreeMap<String, Vec<Value>>) -> ContentResult<FetchedRecords>;
}
