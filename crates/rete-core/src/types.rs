use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a fact wrapper (not for the object it wraps).
pub type FactId = Uuid;

/// Opaque identity of a node in the matching network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Opaque identity of one firing instance of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationId(pub u64);

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for ActivationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "activation#{}", self.0)
    }
}

/// Application-chosen key under which an activation links a derived fact,
/// e.g. the position of the fact in the rule action's output list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkKey {
    Index(usize),
    Name(String),
}

impl From<usize> for LinkKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for LinkKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for LinkKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKey::Index(i) => write!(f, "{}", i),
            LinkKey::Name(n) => f.write_str(n),
        }
    }
}
