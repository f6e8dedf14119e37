use std::collections::HashMap;
use tracing::debug;

use rete_core::NodeId;

/// Lazily allocated per-node memory objects.
///
/// Each node gets exactly one `M`, created with `M::default()` the first time
/// it is requested and kept for the lifetime of the registry. Memories are
/// boxed so a memory's address does not move when the registry grows.
#[derive(Debug)]
pub struct NodeMemoryRegistry<M> {
    memories: HashMap<NodeId, Box<M>>,
}

impl<M> Default for NodeMemoryRegistry<M> {
    fn default() -> Self {
        Self {
            memories: HashMap::new(),
        }
    }
}

impl<M: Default> NodeMemoryRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            memories: HashMap::with_capacity(nodes),
        }
    }

    /// The memory for `node`, allocated on first request.
    pub fn get_or_create(&mut self, node: NodeId) -> &mut M {
        self.memories
            .entry(node)
            .or_insert_with(|| {
                debug!(%node, "node memory allocated");
                Box::default()
            })
            .as_mut()
    }
}

impl<M> NodeMemoryRegistry<M> {
    /// The memory for `node` if one was already allocated.
    pub fn get(&self, node: NodeId) -> Option<&M> {
        self.memories.get(&node).map(|memory| memory.as_ref())
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter(u32);

    #[test]
    fn test_created_on_first_request() {
        let mut registry: NodeMemoryRegistry<Counter> = NodeMemoryRegistry::new();
        assert!(registry.get(NodeId(1)).is_none());
        registry.get_or_create(NodeId(1)).0 += 1;
        assert_eq!(registry.get(NodeId(1)).map(|c| c.0), Some(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_state_survives_growth() {
        let mut registry: NodeMemoryRegistry<Counter> = NodeMemoryRegistry::with_capacity(1);
        let first = registry.get_or_create(NodeId(0)) as *const Counter;
        for n in 1..100 {
            registry.get_or_create(NodeId(n));
        }
        let again = registry.get_or_create(NodeId(0)) as *const Counter;
        assert!(std::ptr::eq(first, again));
        assert_eq!(registry.len(), 100);
    }
}
