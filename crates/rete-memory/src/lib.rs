//! # rete-memory
//!
//! Working memory for a RETE-style rules engine:
//!
//! - **Primary fact index**: every asserted fact, keyed by object identity.
//! - **Internal fact index**: per node, the facts it has already processed,
//!   so joins can be evaluated incrementally.
//! - **Linked fact index**: per activation, the facts it derived while firing,
//!   so they can be updated or retracted along with it.
//! - **Node memory registries**: one lazily created alpha or beta memory per
//!   network node.
//!
//! Everything is owned by a single [`WorkingMemory`] for the duration of an
//! evaluation session.

mod nested;

pub mod internal;
pub mod linked;
pub mod primary;
pub mod registry;
pub mod working;

pub use internal::InternalFactIndex;
pub use linked::LinkedFactIndex;
pub use primary::FactIndex;
pub use registry::NodeMemoryRegistry;
pub use working::{WorkingMemory, WorkingMemoryStats};
