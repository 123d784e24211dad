mod config;
mod error;
mod mutation;
mod node;

pub use config::{ContentConfig, ResultMergePolicy};
pub use error::{ContentError, ContentResult, ErrorKind};
pub use mutation::{
    join_id, lookup, ActionResults, ExecutedMutations, FetchedRecords, MutationAction, MutationBatch,
    MutationBatches, MutationPath, Mutations,
};
pub(crate) use mutation::parse_paths;
pub use node::{Document, Element, Node, Text};
