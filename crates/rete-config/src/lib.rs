//! # rete-config
//!
//! Configuration for the rete working memory. Reads from `rete.toml` and
//! environment variables, in that precedence order (env wins).

pub mod loader;
pub mod logging;
pub mod schema;

pub use loader::ConfigLoader;
pub use logging::init_tracing;
pub use schema::{ConfigWarning, LoggingConfig, ReteConfig, WarningSeverity, WorkingMemoryConfig};
