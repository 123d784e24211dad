/// Keys written into a block's `data` by the transforms.
pub mod data {
    /// `_mutationPaths`
    pub const MUTATION_PATHS: &str = "_mutationPaths";

    /// `_joinIds`
    pub const JOIN_IDS: &str = "_joinIds";
}

pub mod batch {
    /// `disconnectAll`
    pub const DISCONNECT_ALL: &str = "disconnectAll";
}

/// Field carrying a record's identity in results and fetched records.
pub const ID: &str = "id";
