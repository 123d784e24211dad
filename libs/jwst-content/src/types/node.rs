use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ContentError, ContentResult};
use crate::constants::data;

/// A node of the rich-text tree, tagged by its `object` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    Document(Element),
    Block(Element),
    Inline(Element),
    Text(Text),
}

/// Shared shape of document, block and inline nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,
    /// Keys this model does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Text leaves are opaque to the transforms and kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Element {
    pub fn new<S: Into<String>>(kind: S) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// `data._mutationPaths`, if present. Anything but an array of strings
    /// is malformed.
    pub fn mutation_paths(&self) -> ContentResult<Option<Vec<&str>>> {
        let Some(value) = self.data.get(data::MUTATION_PATHS) else {
            return Ok(None);
        };
        let malformed = || ContentError::MalformedMutationPath(value.to_string());

        value
            .as_array()
            .ok_or_else(malformed)?
            .iter()
            .map(|path| path.as_str().ok_or_else(malformed))
            .collect::<ContentResult<Vec<_>>>()
            .map(Some)
    }

    /// `data._joinIds`, empty if absent.
    pub fn join_ids(&self) -> Vec<Value> {
        match self.data.get(data::JOIN_IDS) {
            Some(Value::Array(ids)) => ids.clone(),
            _ => vec![],
        }
    }

    pub(crate) fn push_mutation_path(&mut self, path: String) {
        let entry = self
            .data
            .entry(data::MUTATION_PATHS)
            .or_insert_with(|| Value::Array(vec![]));
        match entry {
            Value::Array(paths) => paths.push(Value::String(path)),
            other => *other = Value::Array(vec![Value::String(path)]),
        }
    }
}

impl Node {
    pub fn block(element: Element) -> Self {
        Self::Block(element)
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        let mut fields = Map::new();
        fields.insert("text".into(), Value::String(text.into()));
        Self::Text(Text { fields })
    }

    /// Parse a JSON value into a node, failing if it is not one.
    pub fn from_value(value: Value) -> ContentResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> ContentResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Document(e) | Self::Block(e) | Self::Inline(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Document(e) | Self::Block(e) | Self::Inline(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.element().and_then(|e| e.kind())
    }

    pub fn object(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Block(_) => "block",
            Self::Inline(_) => "inline",
            Self::Text(_) => "text",
        }
    }
}

/// The root of a rich-text tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Node", into = "Node")]
pub struct Document {
    pub data: Map<String, Value>,
    pub nodes: Vec<Node>,
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> ContentResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> ContentResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn into_node(self) -> Node {
        self.into()
    }

    pub fn from_node(node: Node) -> ContentResult<Self> {
        Self::try_from(node).map_err(ContentError::InvalidDocument)
    }
}

impl TryFrom<Node> for Document {
    type Error = String;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Document(e) => Ok(Self {
                data: e.data,
                nodes: e.nodes.unwrap_or_default(),
                extra: e.extra,
            }),
            other => Err(format!("expected a document node, found `{}`", other.object())),
        }
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        Node::Document(Element {
            kind: None,
            data: doc.data,
            nodes: Some(doc.nodes),
            extra: doc.extra,
        })
    }
}
