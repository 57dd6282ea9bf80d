//! Tracing setup and outline diagnostics
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=structure_outline::update=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/structure-outline/logs/structure-outline.log`
//! with daily rotation. File logging uses debug level by default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::outline::{OutlineSnapshot, StructureNode};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`). Console output goes to
/// stderr so it never mixes with a printed outline.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "structure-outline.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight summary of a published outline, for diffing between publishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineSummary {
    pub generation: u64,
    pub roots: usize,
    pub symbols: usize,
    pub annotations: usize,
}

impl OutlineSummary {
    pub fn from_snapshot(snapshot: &OutlineSnapshot) -> Self {
        fn count(nodes: &[StructureNode], summary: &mut OutlineSummary) {
            for node in nodes {
                if node.kind.is_annotation() {
                    summary.annotations += 1;
                } else {
                    summary.symbols += 1;
                }
                count(&node.children, summary);
            }
        }

        let mut summary = Self {
            generation: snapshot.generation,
            roots: snapshot.roots.len(),
            ..Self::default()
        };
        count(&snapshot.roots, &mut summary);
        summary
    }

    /// Describe what changed between two publishes, `None` if the shape is equal
    pub fn diff(&self, other: &OutlineSummary) -> Option<String> {
        let mut changes = Vec::new();
        if self.roots != other.roots {
            changes.push(format!("roots: {} → {}", self.roots, other.roots));
        }
        if self.symbols != other.symbols {
            changes.push(format!("symbols: {} → {}", self.symbols, other.symbols));
        }
        if self.annotations != other.annotations {
            changes.push(format!(
                "annotations: {} → {}",
                self.annotations, other.annotations
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
