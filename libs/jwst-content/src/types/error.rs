use thiserror::Error;

/// Coarse classification of [ContentError], used by callers to decide how
/// a failure surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Block registration or serialize/resolve phases are out of sync.
    Configuration,
    /// A block handler returned something that is not a node.
    ContractViolation,
    /// The caller did not supply a required argument.
    Precondition,
    /// The document exceeds a configured limit.
    Limit,
    /// Failure raised outside of the transform itself.
    External,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("block type `{0}` is registered more than once")]
    DuplicateBlockType(String),
    #[error("block `{0}` returned mutations without a node to attach them to")]
    MutationsWithoutNode(String),
    #[error("block `{0}` returned mutations but declares no mutation path")]
    MissingBlockPath(String),
    #[error("no block registered for type `{0}`")]
    UnknownBlockType(String),
    #[error("mutation path `{0}` did not resolve to a result")]
    DanglingMutationPath(String),
    #[error("mutation results for `{0}` are provided by more than one block")]
    ConflictingMutationResult(String),
    #[error("malformed mutation path `{0}`")]
    MalformedMutationPath(String),
    #[error("block `{block_type}` deserialized into an invalid node: {reason}")]
    InvalidNode { block_type: String, reason: String },
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),
    #[error("document nesting exceeds max depth {0}")]
    DepthExceeded(usize),
    #[error("json error")]
    Json(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("block `{block_type}` failed: {message}")]
    Block { block_type: String, message: String },
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateBlockType(_)
            | Self::MutationsWithoutNode(_)
            | Self::MissingBlockPath(_)
            | Self::UnknownBlockType(_)
            | Self::DanglingMutationPath(_)
            | Self::ConflictingMutationResult(_)
            | Self::MalformedMutationPath(_) => ErrorKind::Configuration,
            Self::InvalidNode { .. } => ErrorKind::ContractViolation,
            Self::MissingArgument(_) | Self::InvalidDocument(_) => ErrorKind::Precondition,
            Self::DepthExceeded(_) => ErrorKind::Limit,
            Self::Json(_) | Self::Storage(_) | Self::Block { .. } => ErrorKind::External,
        }
    }
}

pub type ContentResult<T, E = ContentError> = Result<T, E>;
