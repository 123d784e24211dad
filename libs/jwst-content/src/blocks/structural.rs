use super::*;

/// Block without relational data (paragraphs, headings, lists, ...). The
/// node is kept as-is on both directions.
#[derive(Debug, Clone)]
pub struct StructuralBlock {
    kind: String,
}

impl StructuralBlock {
    pub fn new<S: Into<String>>(kind: S) -> Self {
        Self { kind: kind.into() }
    }
}

impl Block for StructuralBlock {
    fn block_type(&self) -> &str {
        &self.kind
    }
}
