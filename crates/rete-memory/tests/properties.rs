//! Property-based tests for the working memory indices.
//!
//! Random operation sequences are replayed against both the real indices and
//! a plain set-based model, checking that:
//!
//! - the primary index accepts an object at most once and rejects removal of
//!   anything not asserted
//! - internal per-node maps never linger once empty
//! - every linked fact stays asserted in the primary index

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::collections::{BTreeMap, BTreeSet};

    use rete_core::{ActivationId, Fact, FactObject, LinkKey, NodeId};
    use rete_memory::{FactIndex, InternalFactIndex, WorkingMemory};

    const POOL: usize = 6;

    fn pool() -> Vec<Fact> {
        (0..POOL).map(|i| Fact::new(FactObject::new(i))).collect()
    }

    #[derive(Debug, Clone)]
    enum PrimaryOp {
        Add(usize),
        Update(usize),
        Remove(usize),
    }

    fn primary_op() -> impl Strategy<Value = PrimaryOp> {
        prop_oneof![
            (0..POOL).prop_map(PrimaryOp::Add),
            (0..POOL).prop_map(PrimaryOp::Update),
            (0..POOL).prop_map(PrimaryOp::Remove),
        ]
    }

    // =========================================================================
    // Primary index
    // =========================================================================

    proptest! {
        /// The index agrees with a set model on every outcome.
        #[test]
        fn primary_index_matches_model(ops in prop::collection::vec(primary_op(), 0..64)) {
            let facts = pool();
            let mut index = FactIndex::new();
            let mut model = BTreeSet::new();

            for op in ops {
                match op {
                    PrimaryOp::Add(i) => {
                        let result = index.add(facts[i].clone());
                        prop_assert_eq!(result.is_ok(), model.insert(i));
                    }
                    PrimaryOp::Update(i) => {
                        let result = index.update(facts[i].clone());
                        prop_assert_eq!(result.is_ok(), model.contains(&i));
                    }
                    PrimaryOp::Remove(i) => {
                        let result = index.remove(&facts[i]);
                        prop_assert_eq!(result.is_ok(), model.remove(&i));
                    }
                }
                prop_assert_eq!(index.len(), model.len());
                for (i, fact) in facts.iter().enumerate() {
                    prop_assert_eq!(index.get(&fact.object).is_some(), model.contains(&i));
                }
            }
        }

        /// A second wrapper around an asserted object is always rejected.
        #[test]
        fn primary_index_rejects_same_object(value in any::<u64>()) {
            let object = FactObject::new(value);
            let mut index = FactIndex::new();
            index.add(Fact::new(object.clone())).unwrap();
            prop_assert!(index.add(Fact::new(object)).is_err());
            prop_assert_eq!(index.len(), 1);
        }
    }

    // =========================================================================
    // Internal index
    // =========================================================================

    proptest! {
        /// Node maps exist exactly for the nodes that track something.
        #[test]
        fn internal_index_prunes_empty_nodes(
            ops in prop::collection::vec((any::<bool>(), 0u64..4, 0..POOL), 0..64)
        ) {
            let facts = pool();
            let mut index = InternalFactIndex::new();
            let mut model: BTreeMap<u64, BTreeSet<usize>> = BTreeMap::new();

            for (add, node, i) in ops {
                if add {
                    index.add(NodeId(node), facts[i].clone());
                    model.entry(node).or_default().insert(i);
                } else {
                    index.remove(NodeId(node), &facts[i]);
                    if let Some(tracked) = model.get_mut(&node) {
                        tracked.remove(&i);
                        if tracked.is_empty() {
                            model.remove(&node);
                        }
                    }
                }
                prop_assert_eq!(index.node_count(), model.len());
                for node in 0..4 {
                    prop_assert_eq!(index.contains_node(NodeId(node)), model.contains_key(&node));
                }
            }
        }
    }

    // =========================================================================
    // Linked facts
    // =========================================================================

    proptest! {
        /// Every linked fact is also asserted and every asserted fact is linked,
        /// after any sequence of links, re-links and unlinks.
        #[test]
        fn linked_facts_stay_asserted(
            ops in prop::collection::vec((any::<bool>(), 0u64..3, 0usize..3), 0..64)
        ) {
            let mut wm: WorkingMemory<(), ()> = WorkingMemory::new();

            for (add, activation, key) in ops {
                let activation = ActivationId(activation);
                let key = LinkKey::Index(key);
                if add {
                    let fact = Fact::new(FactObject::new(key.clone()));
                    wm.add_linked_fact(activation, key, fact).unwrap();
                } else if let Some(fact) = wm.linked_fact(activation, &key).cloned() {
                    let removed = wm.remove_linked_fact(activation, &key, &fact).unwrap();
                    prop_assert_eq!(removed, Some(fact));
                }

                for activation in (0..3).map(ActivationId) {
                    let keys: Vec<LinkKey> = wm.linked_keys(activation).cloned().collect();
                    prop_assert_eq!(wm.linked_index().contains_activation(activation), !keys.is_empty());
                    for key in keys {
                        let fact = wm.linked_fact(activation, &key).unwrap();
                        prop_assert_eq!(wm.fact(&fact.object), Some(fact));
                    }
                }
                prop_assert_eq!(wm.fact_count(), wm.linked_index().fact_count());
            }
        }
    }
}
