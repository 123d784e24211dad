mod registry;

pub use registry::BlockRegistry;

use super::*;

/// What a block handler hands back for one node during serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializedBlock {
    /// `None` drops the block from the serialized document.
    pub node: Option<Element>,
    pub mutations: Mutations,
}

impl SerializedBlock {
    pub fn new(node: Element) -> Self {
        Self {
            node: Some(node),
            mutations: Mutations::new(),
        }
    }

    pub fn dropped() -> Self {
        Self::default()
    }

    pub fn with_mutations(mut self, mutations: Mutations) -> Self {
        self.mutations = mutations;
        self
    }
}

/// A pluggable handler owning one block type, subtree included.
pub trait Block: Send + Sync {
    /// Unique tag matched against a block's `type`.
    fn block_type(&self) -> &str;

    /// Batch key for the mutations this block performs. Blocks that never
    /// return mutations may leave it unset.
    fn path(&self) -> Option<&str> {
        None
    }

    /// Turn one rich block into its serializable form plus the relational
    /// mutations it needs. `document` is the whole tree being serialized.
    fn serialize(&self, _document: &Document, node: &Element) -> ContentResult<SerializedBlock> {
        Ok(SerializedBlock::new(node.clone()))
    }

    /// Rebuild a rich node from its persisted form. `joins` is parallel to
    /// the node's `_joinIds`, with `None` where no record was fetched.
    /// Returning `None` defers to structural handling.
    fn deserialize(&self, _node: &Element, _joins: &[Option<Value>]) -> ContentResult<Option<Value>> {
        Ok(None)
    }

    /// This block's share of the executed mutation results, keyed by the
    /// paths its mutation paths refer to.
    fn mutation_results(&self, executed: &ExecutedMutations) -> ExecutedMutations {
        self.path()
            .and_then(|path| executed.get_key_value(path))
            .map(|(path, results)| (path.clone(), results.clone()))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_blocks {
    use super::*;

    /// Block that creates one entry from its data and rebuilds it from the join.
    pub struct FileBlock {
        pub kind: &'static str,
        pub path: Option<&'static str>,
    }

    impl FileBlock {
        pub fn new(kind: &'static str, path: &'static str) -> Self {
            Self { kind, path: Some(path) }
        }
    }

    impl Block for FileBlock {
        fn block_type(&self) -> &str {
            self.kind
        }

        fn path(&self) -> Option<&str> {
            self.path
        }

        fn serialize(&self, _document: &Document, node: &Element) -> ContentResult<SerializedBlock> {
            Ok(SerializedBlock::new(Element::new(self.kind))
                .with_mutations(Mutations::new().with(MutationAction::Create, Value::Object(node.data.clone()))))
        }

        fn deserialize(&self, _node: &Element, joins: &[Option<Value>]) -> ContentResult<Option<Value>> {
            Ok(joins.first().cloned().flatten().map(|mut record| {
                if let Value::Object(map) = &mut record {
                    map.remove("id");
                }
                serde_json::json!({ "object": "block", "type": self.kind, "data": record })
            }))
        }
    }
}
