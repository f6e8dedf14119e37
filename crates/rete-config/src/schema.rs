use serde::{Deserialize, Serialize};

/// Root configuration, maps to `rete.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReteConfig {
    pub memory: WorkingMemoryConfig,
    pub logging: LoggingConfig,
}

// ── Working memory ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingMemoryConfig {
    /// Initial capacity of the primary fact index.
    pub fact_capacity: usize,
    /// Initial capacity of the per-node maps (internal index, node memories).
    pub node_capacity: usize,
    /// Initial capacity of the per-activation linked-fact map.
    pub activation_capacity: usize,
    /// Emit a `trace` event for every fact insert/remove.
    pub trace_mutations: bool,
}

impl Default for WorkingMemoryConfig {
    fn default() -> Self {
        Self {
            fact_capacity: 1024,
            node_capacity: 256,
            activation_capacity: 64,
            trace_mutations: false,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const VALID_LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Capacities above this are almost certainly a typo (bytes vs entries).
const CAPACITY_WARN_LIMIT: usize = 10_000_000;

// ── Validation ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Info => "info",
        };
        write!(f, "[{}] {}: {}", label, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl ReteConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Capacities ───
        let capacities = [
            ("memory.fact_capacity", self.memory.fact_capacity),
            ("memory.node_capacity", self.memory.node_capacity),
            ("memory.activation_capacity", self.memory.activation_capacity),
        ];
        for (field, value) in capacities {
            if value > CAPACITY_WARN_LIMIT {
                warnings.push(ConfigWarning {
                    field: field.into(),
                    message: format!("capacity {} preallocates a very large map", value),
                    severity: WarningSeverity::Warning,
                    hint: Some("Capacities count entries, not bytes".into()),
                });
            }
        }
        if self.memory.fact_capacity == 0 {
            warnings.push(ConfigWarning {
                field: "memory.fact_capacity".into(),
                message: "no preallocation, the fact index grows on demand".into(),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }

        // ── Trace flag vs level ───
        if self.memory.trace_mutations && self.logging.level != "trace" {
            warnings.push(ConfigWarning {
                field: "memory.trace_mutations".into(),
                message: format!(
                    "mutation tracing is on but logging.level is '{}'",
                    self.logging.level
                ),
                severity: WarningSeverity::Info,
                hint: Some("Set logging.level = \"trace\" to see the events".into()),
            });
        }

        // ── Logging ───
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Error,
                hint: Some(format!("Valid values: {}", VALID_LOG_LEVELS.join(", "))),
            });
        }
        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Error,
                hint: Some(format!("Valid values: {}", VALID_LOG_FORMATS.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
