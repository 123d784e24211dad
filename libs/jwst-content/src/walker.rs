//! Generic traversal of a rich-text tree.
//!
//! Blocks are offered to [Visitor::visit_block] first. A block the visitor
//! claims is replaced (or removed) as a whole and its children are never
//! visited. Everything else goes through [Visitor::visit_default], which
//! decides whether to descend via the [Walker] it is handed.

use super::*;

/// Outcome of offering a block to a [Visitor].
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    /// The visitor owns the block: replace it, subtree included.
    Replace(Node),
    /// The visitor owns the block and removes it from its parent.
    Drop,
    /// Not handled here; fall through to [Visitor::visit_default].
    Defer,
}

pub trait Visitor {
    fn visit_block(&mut self, block: &Element) -> ContentResult<Visit>;

    /// Structural recursion: children are walked in order, leaves pass through.
    fn visit_default(&mut self, node: Node, walker: Walker) -> ContentResult<Node> {
        walker.descend(self, node)
    }
}

/// Re-entrant walk state handed to [Visitor::visit_default].
#[derive(Debug, Clone, Copy)]
pub struct Walker {
    depth: usize,
    max_depth: usize,
}

impl Walker {
    pub fn new(max_depth: usize) -> Self {
        Self { depth: 0, max_depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Walk one node, returning `None` when the visitor removed it.
    pub fn walk<V>(self, visitor: &mut V, node: Node) -> ContentResult<Option<Node>>
    where
        V: Visitor + ?Sized,
    {
        if self.depth > self.max_depth {
            return Err(ContentError::DepthExceeded(self.max_depth));
        }

        if let Node::Block(block) = &node {
            match visitor.visit_block(block)? {
                Visit::Replace(replaced) => return Ok(Some(replaced)),
                Visit::Drop => {
                    trace!("drop block: {:?}", block.kind());
                    return Ok(None);
                }
                Visit::Defer => {}
            }
        }

        visitor.visit_default(node, self).map(Some)
    }

    /// Walk the children of `node` one level deeper, keeping their order.
    pub fn descend<V>(self, visitor: &mut V, mut node: Node) -> ContentResult<Node>
    where
        V: Visitor + ?Sized,
    {
        if let Some(element) = node.element_mut() {
            if let Some(children) = element.nodes.take() {
                let walker = Self {
                    depth: self.depth + 1,
                    ..self
                };
                let mut walked = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(child) = walker.walk(visitor, child)? {
                        walked.push(child);
                    }
                }
                element.nodes = Some(walked);
            }
        }

        Ok(node)
    }

    /// Walk a whole document; the root itself is never a block.
    pub fn walk_document<V>(self, visitor: &mut V, document: Document) -> ContentResult<Document>
    where
        V: Visitor + ?Sized,
    {
        let root = visitor.visit_default(document.into_node(), self)?;
        Document::from_node(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        Document::from_value(json!({
            "object": "document",
            "data": {},
            "nodes": [
                { "object": "block", "type": "image", "data": {}, "nodes": [
                    { "object": "block", "type": "caption", "data": {} }
                ]},
                { "object": "block", "type": "paragraph", "data": {}, "nodes": [
                    { "object": "text", "text": "hello" },
                    { "object": "block", "type": "quote", "data": {} }
                ]},
                { "object": "block", "type": "spam", "data": {} }
            ]
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl Visitor for Recorder {
        fn visit_block(&mut self, block: &Element) -> ContentResult<Visit> {
            let kind = block.kind().unwrap_or_default().to_string();
            self.seen.push(kind.clone());
            Ok(match kind.as_str() {
                "image" => Visit::Replace(Node::block(Element::new("figure"))),
                "spam" => Visit::Drop,
                _ => Visit::Defer,
            })
        }
    }

    #[test]
    fn test_walk_dispatch() {
        let mut recorder = Recorder::default();
        let walked = Walker::new(16).walk_document(&mut recorder, sample()).unwrap();

        // children of a replaced block are never visited
        assert_eq!(recorder.seen, vec!["image", "paragraph", "quote", "spam"]);

        let kinds = walked.nodes.iter().map(|n| n.kind().unwrap()).collect::<Vec<_>>();
        assert_eq!(kinds, vec!["figure", "paragraph"]);
        assert_eq!(
            walked.nodes[1].to_value().unwrap(),
            json!({ "object": "block", "type": "paragraph", "data": {}, "nodes": [
                { "object": "text", "text": "hello" },
                { "object": "block", "type": "quote", "data": {} }
            ]})
        );
    }

    #[test]
    fn test_walk_leaves_input_untouched() {
        let doc = sample();
        let mut recorder = Recorder::default();
        Walker::new(16).walk_document(&mut recorder, doc.clone()).unwrap();
        assert_eq!(doc, sample());
    }

    #[test]
    fn test_walk_max_depth() {
        let mut recorder = Recorder::default();
        let err = Walker::new(1).walk_document(&mut recorder, sample()).unwrap_err();
        assert!(matches!(err, ContentError::DepthExceeded(1)));
        assert_eq!(err.kind(), ErrorKind::Limit);

        let mut recorder = Recorder::default();
        assert!(Walker::new(2).walk_document(&mut recorder, sample()).is_ok());
    }
}
