use serde::Serialize;
use tracing::{debug, trace};

use rete_config::WorkingMemoryConfig;
use rete_core::{ActivationId, Fact, FactObject, LinkKey, NodeId, ReteError, Result};

use crate::internal::InternalFactIndex;
use crate::linked::LinkedFactIndex;
use crate::primary::FactIndex;
use crate::registry::NodeMemoryRegistry;

/// Every fact index for one evaluation session.
///
/// The matching network and the scheduler drive it; it never acts on its own.
/// `A` and `B` are the network's alpha and beta node memories. Working memory
/// only allocates them and hands them back, it never looks inside.
///
/// All mutation goes through `&mut self`: there is no internal locking, and a
/// session shared across threads needs an outer lock.
#[derive(Debug)]
pub struct WorkingMemory<A, B> {
    facts: FactIndex,
    internal: InternalFactIndex,
    linked: LinkedFactIndex,
    alpha: NodeMemoryRegistry<A>,
    beta: NodeMemoryRegistry<B>,
    trace_mutations: bool,
}

/// Snapshot of index sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkingMemoryStats {
    pub facts: usize,
    pub internal_nodes: usize,
    pub internal_facts: usize,
    pub activations: usize,
    pub linked_facts: usize,
    pub alpha_memories: usize,
    pub beta_memories: usize,
}

impl<A: Default, B: Default> Default for WorkingMemory<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Default, B: Default> WorkingMemory<A, B> {
    pub fn new() -> Self {
        Self::with_config(&WorkingMemoryConfig::default())
    }

    pub fn with_config(config: &WorkingMemoryConfig) -> Self {
        debug!(
            fact_capacity = config.fact_capacity,
            node_capacity = config.node_capacity,
            "creating working memory"
        );
        Self {
            facts: FactIndex::with_capacity(config.fact_capacity),
            internal: InternalFactIndex::with_capacity(config.node_capacity),
            linked: LinkedFactIndex::with_capacity(config.activation_capacity),
            alpha: NodeMemoryRegistry::with_capacity(config.node_capacity),
            beta: NodeMemoryRegistry::with_capacity(config.node_capacity),
            trace_mutations: config.trace_mutations,
        }
    }

    // ── Node memories ──────────────────────────────────────────

    /// Memory of an alpha node, allocated on first request.
    pub fn alpha_memory(&mut self, node: NodeId) -> &mut A {
        self.alpha.get_or_create(node)
    }

    /// Memory of a beta node, allocated on first request.
    pub fn beta_memory(&mut self, node: NodeId) -> &mut B {
        self.beta.get_or_create(node)
    }
}

impl<A, B> WorkingMemory<A, B> {
    // ── Primary facts ──────────────────────────────────────────

    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.facts()
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn fact(&self, object: &FactObject) -> Option<&Fact> {
        self.facts.get(object)
    }

    /// Assert a fact. See [`FactIndex::add`].
    pub fn add_fact(&mut self, fact: Fact) -> Result<()> {
        if self.trace_mutations {
            trace!(object = %fact.object_id(), type_name = fact.type_name(), "assert");
        }
        self.facts.add(fact)
    }

    /// See [`FactIndex::update`].
    pub fn update_fact(&mut self, fact: Fact) -> Result<()> {
        if self.trace_mutations {
            trace!(object = %fact.object_id(), type_name = fact.type_name(), "update");
        }
        self.facts.update(fact)
    }

    /// Retract a fact. See [`FactIndex::remove`].
    pub fn remove_fact(&mut self, fact: &Fact) -> Result<Fact> {
        if self.trace_mutations {
            trace!(object = %fact.object_id(), type_name = fact.type_name(), "retract");
        }
        self.facts.remove(fact)
    }

    pub fn fact_index(&self) -> &FactIndex {
        &self.facts
    }

    // ── Internal facts ─────────────────────────────────────────

    pub fn internal_fact(&self, node: NodeId, object: &FactObject) -> Option<&Fact> {
        self.internal.get(node, object)
    }

    pub fn internal_facts<'o, I>(&self, node: NodeId, objects: I) -> Vec<Option<&Fact>>
    where
        I: IntoIterator<Item = &'o FactObject>,
    {
        self.internal.get_many(node, objects)
    }

    pub fn add_internal_fact(&mut self, node: NodeId, fact: Fact) {
        if self.trace_mutations {
            trace!(%node, object = %fact.object_id(), "track internal fact");
        }
        self.internal.add(node, fact);
    }

    pub fn update_internal_fact(&mut self, node: NodeId, fact: Fact) {
        if self.trace_mutations {
            trace!(%node, object = %fact.object_id(), "refresh internal fact");
        }
        self.internal.update(node, fact);
    }

    pub fn remove_internal_fact(&mut self, node: NodeId, fact: &Fact) {
        if self.trace_mutations {
            trace!(%node, object = %fact.object_id(), "untrack internal fact");
        }
        self.internal.remove(node, fact);
    }

    pub fn internal_index(&self) -> &InternalFactIndex {
        &self.internal
    }

    // ── Linked facts ───────────────────────────────────────────

    pub fn linked_keys(&self, activation: ActivationId) -> impl Iterator<Item = &LinkKey> {
        self.linked.keys(activation)
    }

    pub fn linked_fact(&self, activation: ActivationId, key: &LinkKey) -> Option<&Fact> {
        self.linked.get(activation, key)
    }

    /// Assert a fact derived by `activation` and link it under `key`.
    ///
    /// If its object is already asserted the call fails with
    /// [`ReteError::DuplicateFact`] and nothing is linked. A different fact
    /// already linked under the same key is retracted along with its link, so
    /// every fact an activation derived stays reachable from it.
    pub fn add_linked_fact(
        &mut self,
        activation: ActivationId,
        key: LinkKey,
        fact: Fact,
    ) -> Result<()> {
        if self.trace_mutations {
            trace!(%activation, %key, object = %fact.object_id(), "assert linked fact");
        }
        let displaced = self.displaced_link(activation, &key, &fact)?;
        self.facts.add(fact.clone())?;
        self.retract_displaced(activation, &key, displaced)?;
        self.linked.link(activation, key, fact);
        Ok(())
    }

    /// Re-link a derived fact after its activation fired again, possibly with
    /// a new object.
    ///
    /// When `object` is a different allocation from `fact.object`, the fact is
    /// re-keyed in the primary index and `fact.object` is replaced. The link
    /// under `(activation, key)` is refreshed either way, whether or not it
    /// existed before. A different fact linked under the same key is
    /// retracted, as in [`add_linked_fact`](Self::add_linked_fact).
    ///
    /// Fails with [`ReteError::DuplicateFact`] if the new object is already
    /// asserted, or [`ReteError::FactNotFound`] if `fact` is not. On failure
    /// neither the indices nor `fact` are modified.
    pub fn update_linked_fact(
        &mut self,
        activation: ActivationId,
        key: LinkKey,
        fact: &mut Fact,
        object: FactObject,
    ) -> Result<()> {
        let displaced = self.displaced_link(activation, &key, fact)?;
        if !fact.object.ptr_eq(&object) {
            if self.facts.contains(&object) {
                return Err(ReteError::duplicate_fact(&object));
            }
            self.facts.remove(fact)?;
            debug!(
                %activation,
                %key,
                from = %fact.object_id(),
                to = %object.id(),
                "linked fact object replaced"
            );
            fact.object = object;
            self.facts.add(fact.clone())?;
        } else if self.trace_mutations {
            trace!(%activation, %key, object = %fact.object_id(), "refresh linked fact");
        }
        self.retract_displaced(activation, &key, displaced)?;
        self.linked.link(activation, key, fact.clone());
        Ok(())
    }

    /// Unlink a derived fact and retract it.
    ///
    /// Returns `Ok(None)` without touching the primary index if nothing at
    /// all is linked to `activation`. Otherwise the link is dropped and the
    /// retracted fact returned; a fact that is linked but no longer asserted
    /// is reported as [`ReteError::FactNotFound`].
    pub fn remove_linked_fact(
        &mut self,
        activation: ActivationId,
        key: &LinkKey,
        fact: &Fact,
    ) -> Result<Option<Fact>> {
        if !self.linked.contains_activation(activation) {
            return Ok(None);
        }
        if self.trace_mutations {
            trace!(%activation, %key, object = %fact.object_id(), "retract linked fact");
        }
        self.linked.unlink(activation, key);
        self.facts.remove(fact).map(Some)
    }

    pub fn linked_index(&self) -> &LinkedFactIndex {
        &self.linked
    }

    /// The fact that would lose its link if `fact` took over `(activation, key)`.
    /// It has to be asserted so it can be retracted with the link.
    fn displaced_link(
        &self,
        activation: ActivationId,
        key: &LinkKey,
        fact: &Fact,
    ) -> Result<Option<Fact>> {
        match self.linked.get(activation, key) {
            Some(previous) if previous.id != fact.id && !previous.object.ptr_eq(&fact.object) => {
                if !self.facts.contains(&previous.object) {
                    return Err(ReteError::fact_not_found(&previous.object));
                }
                Ok(Some(previous.clone()))
            }
            _ => Ok(None),
        }
    }

    fn retract_displaced(
        &mut self,
        activation: ActivationId,
        key: &LinkKey,
        displaced: Option<Fact>,
    ) -> Result<()> {
        if let Some(previous) = displaced {
            debug!(%activation, %key, object = %previous.object_id(), "retracting displaced linked fact");
            self.facts.remove(&previous)?;
        }
        Ok(())
    }

    // ── Diagnostics ────────────────────────────────────────────

    pub fn stats(&self) -> WorkingMemoryStats {
        WorkingMemoryStats {
            facts: self.facts.len(),
            internal_nodes: self.internal.node_count(),
            internal_facts: self.internal.fact_count(),
            activations: self.linked.activation_count(),
            linked_facts: self.linked.fact_count(),
            alpha_memories: self.alpha.len(),
            beta_memories: self.beta.len(),
        }
    }
}
