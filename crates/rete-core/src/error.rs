use thiserror::Error;

use crate::fact::{FactObject, ObjectId};

/// Unified error type for the rete workspace.
#[derive(Error, Debug)]
pub enum ReteError {
    // ── Working memory contract violations ─────────────────────
    #[error("duplicate fact: object {object} ({type_name}) is already asserted")]
    DuplicateFact {
        object: ObjectId,
        type_name: &'static str,
    },

    #[error("fact not found: object {object} ({type_name}) is not asserted")]
    FactNotFound {
        object: ObjectId,
        type_name: &'static str,
    },

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReteError {
    pub fn duplicate_fact(object: &FactObject) -> Self {
        Self::DuplicateFact {
            object: object.id(),
            type_name: object.type_name(),
        }
    }

    pub fn fact_not_found(object: &FactObject) -> Self {
        Self::FactNotFound {
            object: object.id(),
            type_name: object.type_name(),
        }
    }

    /// True for errors that indicate a caller broke an index contract
    /// rather than an environmental failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::DuplicateFact { .. } | Self::FactNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReteError>;
