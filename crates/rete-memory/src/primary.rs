use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

use rete_core::{Fact, FactObject, ObjectId, ReteError, Result};

/// The primary fact index: object identity → fact.
///
/// This is the single source of truth for whether an object is currently
/// asserted. Insertion and removal are strict: asserting an object twice or
/// retracting one that isn't there means a caller lost track of its own state,
/// so both fail instead of being absorbed.
#[derive(Debug, Default)]
pub struct FactIndex {
    facts: HashMap<ObjectId, Fact>,
}

impl FactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            facts: HashMap::with_capacity(capacity),
        }
    }

    /// Look up the fact asserted for `object`.
    pub fn get(&self, object: &FactObject) -> Option<&Fact> {
        self.facts.get(&object.id())
    }

    pub fn contains(&self, object: &FactObject) -> bool {
        self.facts.contains_key(&object.id())
    }

    /// Assert a fact. Fails with [`ReteError::DuplicateFact`] if its object is
    /// already asserted, even under a different fact wrapper.
    pub fn add(&mut self, fact: Fact) -> Result<()> {
        match self.facts.entry(fact.object_id()) {
            Entry::Occupied(_) => {
                warn!(object = %fact.object_id(), type_name = fact.type_name(), "object already asserted");
                Err(ReteError::duplicate_fact(&fact.object))
            }
            Entry::Vacant(slot) => {
                slot.insert(fact);
                Ok(())
            }
        }
    }

    /// Replace the stored fact for an asserted object. Strict like `remove`:
    /// fails with [`ReteError::FactNotFound`] if the object is not asserted.
    pub fn update(&mut self, fact: Fact) -> Result<()> {
        self.remove(&fact)?;
        self.add(fact)
    }

    /// Retract the fact for `fact.object`, returning what was stored.
    pub fn remove(&mut self, fact: &Fact) -> Result<Fact> {
        self.facts.remove(&fact.object_id()).ok_or_else(|| {
            warn!(object = %fact.object_id(), type_name = fact.type_name(), "object not asserted");
            ReteError::fact_not_found(&fact.object)
        })
    }

    /// All asserted facts, in no particular order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.values()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
