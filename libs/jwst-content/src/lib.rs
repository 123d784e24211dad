mod block;
mod blocks;
mod content;
mod storage;
mod types;
mod walker;

pub mod constants;

pub use block::{Block, BlockRegistry, SerializedBlock};
pub use blocks::{ImageBlock, RelationshipBlock, StructuralBlock};
pub use content::{ContentField, ContentRecord, PersistedContent, ResolvedContent, SerializedContent};
pub use storage::{MemoryStore, MutationStore};
pub use tracing::{debug, error, info, trace, warn};
pub use types::{
    join_id, lookup, ActionResults, ContentConfig, ContentError, ContentResult, Document, Element, ErrorKind,
    ExecutedMutations, FetchedRecords, MutationAction, MutationBatch, MutationBatches, MutationPath, Mutations, Node,
    ResultMergePolicy, Text,
};
pub use walker::{Visit, Visitor, Walker};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
