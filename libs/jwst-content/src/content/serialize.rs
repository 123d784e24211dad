use super::*;

/// A document rewritten to reference its mutations, plus those mutations
/// batched per block path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedContent {
    pub document: Document,
    #[serde(flatten)]
    pub batches: MutationBatches,
}

struct Serializer<'a> {
    registry: &'a BlockRegistry,
    document: &'a Document,
    batches: MutationBatches,
}

impl Visitor for Serializer<'_> {
    fn visit_block(&mut self, block: &Element) -> ContentResult<Visit> {
        let registry = self.registry;
        let Some(handler) = registry.handler_for(block) else {
            return Ok(Visit::Defer);
        };
        let kind = handler.block_type();

        let SerializedBlock { node, mutations } = handler.serialize(self.document, block)?;
        if mutations.is_empty() {
            return Ok(match node {
                Some(node) => Visit::Replace(Node::Block(node)),
                None => Visit::Drop,
            });
        }

        let mut node = node.ok_or_else(|| ContentError::MutationsWithoutNode(kind.to_owned()))?;
        let path = handler
            .path()
            .ok_or_else(|| ContentError::MissingBlockPath(kind.to_owned()))?;

        let batch = self.batches.entry(path.to_owned()).or_insert_with(|| {
            debug!("create mutation batch: {}", path);
            MutationBatch::default()
        });
        for (action, entry) in mutations.into_entries() {
            let index = batch.append(action, entry);
            node.push_mutation_path(MutationPath::new(path, action, index).to_string());
        }
        trace!("serialized block {}: {:?}", kind, node.data.get(constants::data::MUTATION_PATHS));

        Ok(Visit::Replace(Node::Block(node)))
    }
}

pub(super) fn serialize(
    document: &Document,
    registry: &BlockRegistry,
    config: &ContentConfig,
) -> ContentResult<SerializedContent> {
    let mut serializer = Serializer {
        registry,
        document,
        batches: MutationBatches::new(),
    };
    let document = Walker::new(config.max_depth).walk_document(&mut serializer, document.clone())?;

    Ok(SerializedContent {
        document,
        batches: serializer.batches,
    })
}
