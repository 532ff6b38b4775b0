//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`
//! or `crate::output`.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{LinkState, LockError, SiteupConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// No timeout is imposed: a hung program hangs the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned. The underlying
    /// `std::io::Error` must stay reachable through the error chain so callers
    /// can tell a missing binary apart from other spawn failures.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

// ── Site Store Port ───────────────────────────────────────────────────────────

/// Filesystem operations on the proxy's available/enabled directories.
///
/// Returns raw `std::io::Error`s so the activator can classify them.
pub trait SiteStore {
    /// Create or fully overwrite the site definition at `path`.
    fn write_config(&self, path: &Path, text: &str) -> std::io::Result<()>;
    /// Inspect what currently occupies `link`, relative to the expected `target`.
    fn probe_link(&self, link: &Path, target: &Path) -> std::io::Result<LinkState>;
    /// Create a symlink at `link` pointing to `target`.
    fn create_link(&self, target: &Path, link: &Path) -> std::io::Result<()>;
    /// Remove the symlink at `link` (never its target).
    fn remove_link(&self, link: &Path) -> std::io::Result<()>;
}

// ── Run Lock Port ─────────────────────────────────────────────────────────────

/// Refuses concurrent runs for the same domain.
pub trait RunLock {
    /// Take the lock for `domain` without blocking.
    ///
    /// Returns a guard that releases the lock when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Held`] if another run holds the lock.
    fn acquire(&self, domain: &str) -> Result<Box<dyn Any>, LockError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads the siteup configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<SiteupConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> PathBuf;
}
