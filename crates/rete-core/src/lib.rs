//! # rete-core
//!
//! Core types and primitives shared by every crate in the rete workspace:
//! the `Fact` wrapper and its identity handle, the opaque identifiers handed
//! to working memory by the matching network and the scheduler, and the
//! unified error type.

pub mod error;
pub mod fact;
pub mod types;

pub use error::{ReteError, Result};
pub use fact::{Fact, FactObject, ObjectId};
pub use types::*;
