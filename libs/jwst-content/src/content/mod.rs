mod deserialize;
mod resolve;
mod serialize;

pub use deserialize::PersistedContent;
pub use resolve::ResolvedContent;
pub use serialize::SerializedContent;

use std::collections::BTreeMap;

use super::*;

/// The persisted form of a document: one JSON blob plus the reverse
/// reference to the record that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub owner: String,
    pub document: Document,
}

impl ContentRecord {
    pub fn to_blob(&self) -> ContentResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_blob(blob: &str) -> ContentResult<Self> {
        Ok(serde_json::from_str(blob)?)
    }
}

/// A rich-text field: the registered blocks plus the transform options.
#[derive(Debug, Clone)]
pub struct ContentField {
    registry: BlockRegistry,
    config: ContentConfig,
}

impl ContentField {
    pub fn new(registry: BlockRegistry) -> Self {
        Self {
            registry,
            config: ContentConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ContentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Extract relational data of every handled block into mutation batches.
    pub fn serialize(&self, document: &Document) -> ContentResult<SerializedContent> {
        serialize::serialize(document, &self.registry, &self.config)
    }

    /// Replace mutation paths with the join ids the executed mutations produced.
    pub fn resolve(&self, document: Document, executed: &ExecutedMutations) -> ContentResult<ResolvedContent> {
        resolve::resolve(document, executed, &self.registry, &self.config)
    }

    /// Rebuild the rich document from its persisted form and fetched records.
    pub fn deserialize(&self, content: PersistedContent) -> ContentResult<Document> {
        deserialize::deserialize(content, &self.registry, &self.config)
    }

    /// Join ids of every handled block, grouped by the handler's path.
    pub fn join_ids(&self, document: &Document) -> ContentResult<BTreeMap<String, Vec<Value>>> {
        fn collect(
            registry: &BlockRegistry,
            nodes: &[Node],
            depth: usize,
            max_depth: usize,
            out: &mut BTreeMap<String, Vec<Value>>,
        ) -> ContentResult<()> {
            if depth > max_depth {
                return Err(ContentError::DepthExceeded(max_depth));
            }
            for node in nodes {
                if let Node::Block(block) = node {
                    if let Some(handler) = registry.handler_for(block) {
                        if let Some(path) = handler.path() {
                            out.entry(path.to_owned()).or_default().extend(block.join_ids());
                        }
                        continue;
                    }
                }
                if let Some(children) = node.element().and_then(|e| e.nodes.as_deref()) {
                    collect(registry, children, depth + 1, max_depth, out)?;
                }
            }
            Ok(())
        }

        let mut ids = BTreeMap::new();
        collect(&self.registry, &document.nodes, 1, self.config.max_depth, &mut ids)?;
        Ok(ids)
    }

    /// serialize, execute the batches, then resolve.
    pub async fn save<S>(&self, owner: &str, document: &Document, store: &S) -> ContentResult<ContentRecord>
    where
        S: MutationStore + ?Sized,
    {
        let SerializedContent { document, batches } = self.serialize(document)?;
        info!("save content of {}: {} mutation batches", owner, batches.len());

        let executed = store.execute(owner, &batches).await?;
        let ResolvedContent { document } = self.resolve(document, &executed)?;

        Ok(ContentRecord {
            owner: owner.to_owned(),
            document,
        })
    }

    /// Fetch the records a persisted document joins to, then deserialize.
    pub async fn load<S>(&self, record: &ContentRecord, store: &S) -> ContentResult<Document>
    where
        S: MutationStore + ?Sized,
    {
        let ids = self.join_ids(&record.document)?;
        info!("load content of {}: {} joined paths", record.owner, ids.len());

        let records = store.fetch(&ids).await?;
        self.deserialize(PersistedContent::new(record.document.to_value()?, records))
    }
}
