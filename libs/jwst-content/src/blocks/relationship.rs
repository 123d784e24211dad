use super::*;

/// Block referencing an existing record of another collection by `data.id`.
#[derive(Debug, Clone)]
pub struct RelationshipBlock {
    kind: String,
    path: String,
}

impl RelationshipBlock {
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

impl Block for RelationshipBlock {
    fn block_type(&self) -> &str {
        &self.kind
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn serialize(&self, _document: &Document, node: &Element) -> ContentResult<SerializedBlock> {
        let id = match node.data.get(constants::ID) {
            Some(id @ (Value::String(_) | Value::Number(_))) => id.clone(),
            _ => {
                warn!("{} block without a related id, skipped", self.kind);
                return Ok(SerializedBlock::dropped());
            }
        };

        let mut connect = Map::new();
        connect.insert(constants::ID.into(), id);

        Ok(SerializedBlock::new(Element::new(self.kind.as_str()))
            .with_mutations(Mutations::new().with(MutationAction::Connect, Value::Object(connect))))
    }

    fn deserialize(&self, node: &Element, joins: &[Option<Value>]) -> ContentResult<Option<Value>> {
        let Some(Some(record)) = joins.first() else {
            return Ok(None);
        };
        let Value::Object(record) = record else {
            return Err(ContentError::Block {
                block_type: self.kind.clone(),
                message: format!("expected an object record, found {record}"),
            });
        };

        let mut rebuilt = node.clone().with_data(record.clone());
        rebuilt.nodes = None;
        Ok(Some(Node::block(rebuilt).to_value()?))
    }
}
