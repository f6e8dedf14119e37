use tracing::debug;

use rete_core::{Fact, FactObject, NodeId, ObjectId};

use crate::nested::NestedMap;

/// Per-node record of the facts a network node has already folded into its
/// partial matches.
///
/// Unlike [`FactIndex`](crate::FactIndex), every operation here is total: a
/// node asking about a fact it has never seen is the normal case during
/// incremental evaluation. A node's map exists only while it tracks at least
/// one fact.
#[derive(Debug, Default)]
pub struct InternalFactIndex {
    nodes: NestedMap<NodeId, ObjectId, Fact>,
}

impl InternalFactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: NestedMap::with_capacity(nodes),
        }
    }

    pub fn get(&self, node: NodeId, object: &FactObject) -> Option<&Fact> {
        self.nodes.get(&node, &object.id())
    }

    /// Look up several objects at once. The result lines up with `objects`
    /// position by position; untracked objects yield `None` in place.
    pub fn get_many<'o, I>(&self, node: NodeId, objects: I) -> Vec<Option<&Fact>>
    where
        I: IntoIterator<Item = &'o FactObject>,
    {
        let tracked = self.nodes.inner(&node);
        objects
            .into_iter()
            .map(|object| tracked.and_then(|facts| facts.get(&object.id())))
            .collect()
    }

    pub fn add(&mut self, node: NodeId, fact: Fact) {
        if self.nodes.insert(node, fact.object_id(), fact).1 {
            debug!(%node, "internal fact map created");
        }
    }

    /// Same as `add`: replaces the tracked fact if there is one and tracks it
    /// otherwise.
    pub fn update(&mut self, node: NodeId, fact: Fact) {
        self.add(node, fact);
    }

    /// Stop tracking `fact` for `node`. No-op if it wasn't tracked.
    pub fn remove(&mut self, node: NodeId, fact: &Fact) -> Option<Fact> {
        let (removed, pruned) = self.nodes.remove(&node, &fact.object_id())?;
        if pruned {
            debug!(%node, "internal fact map dropped");
        }
        Some(removed)
    }

    /// Facts tracked for one node.
    pub fn facts(&self, node: NodeId) -> impl Iterator<Item = &Fact> {
        self.nodes.inner(&node).into_iter().flat_map(|facts| facts.values())
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_outer(&node)
    }

    /// Number of nodes currently tracking at least one fact.
    pub fn node_count(&self) -> usize {
        self.nodes.outer_len()
    }

    pub fn fact_count(&self) -> usize {
        self.nodes.total_len()
    }
}
