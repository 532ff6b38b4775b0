//! Application context — the production ports wired together for one run.
//!
//! `AppContext` is built once in `Cli::run()` after arguments, privilege and
//! configuration have been validated.

use crate::domain::SiteupConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalSiteStore;
use crate::infra::lock::FlockRunLock;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Unified application context for a provisioning run.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Runs nginx, systemctl and the ACME client.
    pub runner: TokioCommandRunner,
    /// Reads and writes the nginx site directories.
    pub store: LocalSiteStore,
    /// Refuses a second concurrent run for the same domain.
    pub lock: FlockRunLock,
    /// Loaded configuration.
    pub config: SiteupConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(output: OutputContext, mode: OutputMode, config: SiteupConfig) -> Self {
        let lock = FlockRunLock::new(config.lock_dir.clone());
        Self {
            output,
            mode,
            runner: TokioCommandRunner,
            store: LocalSiteStore,
            lock,
            config,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
