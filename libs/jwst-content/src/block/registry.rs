use std::{collections::HashMap, fmt, sync::Arc};

use super::*;

/// Block handlers keyed by the type tag they own, built once per field
/// configuration.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    blocks: HashMap<String, Arc<dyn Block>>,
    /// Registration order, used wherever merge order matters.
    order: Vec<String>,
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry").field("blocks", &self.order).finish()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks<I>(blocks: I) -> ContentResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn Block>>,
    {
        let mut registry = Self::new();
        for block in blocks {
            registry.register(block)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, block: Arc<dyn Block>) -> ContentResult<&mut Self> {
        let kind = block.block_type().to_owned();
        if self.blocks.contains_key(&kind) {
            return Err(ContentError::DuplicateBlockType(kind));
        }

        debug!("register block: {}, path: {:?}", kind, block.path());
        self.order.push(kind.clone());
        self.blocks.insert(kind, block);
        Ok(self)
    }

    /// Builder form of [BlockRegistry::register].
    pub fn with<B: Block + 'static>(mut self, block: B) -> ContentResult<Self> {
        self.register(Arc::new(block))?;
        Ok(self)
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn Block>> {
        self.blocks.get(kind)
    }

    /// Handler owning `block`, if its `type` is registered.
    pub fn handler_for(&self, block: &Element) -> Option<&Arc<dyn Block>> {
        block.kind().and_then(|kind| self.get(kind))
    }

    pub fn path_of(&self, kind: &str) -> Option<&str> {
        self.get(kind).and_then(|b| b.path())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Block>> {
        self.order.iter().filter_map(|kind| self.blocks.get(kind))
    }
}
