use super::*;

/// A persisted document together with the related records fetched for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
    #[serde(flatten)]
    pub records: FetchedRecords,
}

impl PersistedContent {
    pub fn new(document: Value, records: FetchedRecords) -> Self {
        Self {
            document: Some(document),
            records,
        }
    }
}

struct Deserializer<'a> {
    registry: &'a BlockRegistry,
    records: &'a FetchedRecords,
}

impl Deserializer<'_> {
    fn joins(&self, handler: &dyn Block, block: &Element) -> Vec<Option<Value>> {
        let records = handler
            .path()
            .and_then(|path| self.records.get(path))
            .map(Vec::as_slice)
            .unwrap_or_default();

        block
            .join_ids()
            .iter()
            .map(|join_id| {
                records
                    .iter()
                    .find(|record| record.get(constants::ID) == Some(join_id))
                    .cloned()
            })
            .collect()
    }
}

impl Visitor for Deserializer<'_> {
    fn visit_block(&mut self, block: &Element) -> ContentResult<Visit> {
        let registry = self.registry;
        let Some(handler) = registry.handler_for(block) else {
            return Ok(Visit::Defer);
        };
        let kind = handler.block_type();

        let joins = self.joins(handler.as_ref(), block);
        let Some(value) = handler.deserialize(block, &joins)? else {
            return Ok(Visit::Defer);
        };

        let invalid = |reason: String| ContentError::InvalidNode {
            block_type: kind.to_owned(),
            reason,
        };
        match serde_json::from_value::<Node>(value) {
            Ok(Node::Document(_)) => Err(invalid("a document cannot replace a block".into())),
            Ok(node) => Ok(Visit::Replace(node)),
            Err(e) => Err(invalid(e.to_string())),
        }
    }
}

pub(super) fn deserialize(
    content: PersistedContent,
    registry: &BlockRegistry,
    config: &ContentConfig,
) -> ContentResult<Document> {
    let PersistedContent { document, records } = content;
    let document = Document::from_value(document.ok_or(ContentError::MissingArgument("document"))?)?;

    let mut deserializer = Deserializer {
        registry,
        records: &records,
    };
    Walker::new(config.max_depth).walk_document(&mut deserializer, document)
}
