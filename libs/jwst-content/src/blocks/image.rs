use super::*;

/// Image block: every save creates the image record from the block data,
/// and the block is rebuilt from that record on read.
#[derive(Debug, Clone)]
pub struct ImageBlock {
    kind: String,
    path: String,
}

impl Default for ImageBlock {
    fn default() -> Self {
        Self::new("image", "images")
    }
}

impl ImageBlock {
    pub fn new<K, P>(kind: K, path: P) -> Self
    where
        K: Into<String>,
        P: Into<String>,
    {
        Self {
            kind: kind.into(),
            path: path.into(),
        }
    }
}

impl Block for ImageBlock {
    fn block_type(&self) -> &str {
        &self.kind
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn serialize(&self, _document: &Document, node: &Element) -> ContentResult<SerializedBlock> {
        let data = plain_data(node);
        if data.is_empty() {
            warn!("{} block without data, skipped", self.kind);
            return Ok(SerializedBlock::dropped());
        }

        Ok(SerializedBlock::new(Element::new(self.kind.as_str()))
            .with_mutations(Mutations::new().with(MutationAction::Create, Value::Object(data))))
    }

    fn deserialize(&self, _node: &Element, joins: &[Option<Value>]) -> ContentResult<Option<Value>> {
        let Some(Some(record)) = joins.first() else {
            return Ok(None);
        };
        let Value::Object(record) = record else {
            return Err(ContentError::Block {
                block_type: self.kind.clone(),
                message: format!("expected an object record, found {record}"),
            });
        };

        let data = record
            .iter()
            .filter(|(key, _)| key.as_str() != constants::ID)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Map<_, _>>();

        let node = Element::new(self.kind.as_str()).with_data(data);
        Ok(Some(Node::block(node).to_value()?))
    }
}
