use tracing::debug;

use rete_core::{ActivationId, Fact, LinkKey};

use crate::nested::NestedMap;

/// Facts an activation derived while firing, keyed by an application-chosen
/// [`LinkKey`].
///
/// Reads are public. Mutation is crate-private: every linked fact must also be
/// asserted in the primary index, so links are only made and broken through
/// [`WorkingMemory`](crate::WorkingMemory), which updates both together.
#[derive(Debug, Default)]
pub struct LinkedFactIndex {
    activations: NestedMap<ActivationId, LinkKey, Fact>,
}

impl LinkedFactIndex {
    pub fn with_capacity(activations: usize) -> Self {
        Self {
            activations: NestedMap::with_capacity(activations),
        }
    }

    /// Keys linked to `activation`, lazily. Empty if nothing is linked.
    pub fn keys(&self, activation: ActivationId) -> impl Iterator<Item = &LinkKey> {
        self.activations
            .inner(&activation)
            .into_iter()
            .flat_map(|links| links.keys())
    }

    pub fn get(&self, activation: ActivationId, key: &LinkKey) -> Option<&Fact> {
        self.activations.get(&activation, key)
    }

    pub fn len(&self, activation: ActivationId) -> usize {
        self.activations
            .inner(&activation)
            .map_or(0, |links| links.len())
    }

    pub fn contains_activation(&self, activation: ActivationId) -> bool {
        self.activations.contains_outer(&activation)
    }

    /// Number of activations with at least one linked fact.
    pub fn activation_count(&self) -> usize {
        self.activations.outer_len()
    }

    pub fn fact_count(&self) -> usize {
        self.activations.total_len()
    }

    /// Link `fact` under `(activation, key)`, replacing any earlier link.
    pub(crate) fn link(&mut self, activation: ActivationId, key: LinkKey, fact: Fact) {
        if self.activations.insert(activation, key, fact).1 {
            debug!(%activation, "linked fact map created");
        }
    }

    pub(crate) fn unlink(&mut self, activation: ActivationId, key: &LinkKey) -> Option<Fact> {
        let (fact, pruned) = self.activations.remove(&activation, key)?;
        if pruned {
            debug!(%activation, "linked fact map dropped");
        }
        Some(fact)
    }
}
