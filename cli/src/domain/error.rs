//! Typed domain error enums.
//!
//! Stage errors are split by severity: `ActivationError` ends a run,
//! `IssuanceError` only degrades it.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Argument errors ───────────────────────────────────────────────────────────

/// Errors raised while building a `SiteSpec` from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteError {
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: &'static str },

    #[error("Invalid port {0}: must be between 1 and 65535")]
    InvalidPort(u32),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Command must not be empty")]
    EmptyCommand,

    #[error("No contact email configured. Pass --email, set SITEUP_EMAIL, or add `email:` to the config file.")]
    MissingEmail,

    #[error("Invalid contact email '{0}'")]
    InvalidEmail(String),
}

// ── Lock errors ───────────────────────────────────────────────────────────────

/// Errors acquiring the per-domain run lock.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Another siteup run for '{domain}' is in progress (lock held on {})", path.display())]
    Held { domain: String, path: PathBuf },

    #[error("Cannot open lock file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Activation errors ─────────────────────────────────────────────────────────

/// Fatal failures of the HTTP activation chain (write, link, validate, reload).
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("Cannot write site definition {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot enable site at {}: {source}", path.display())]
    Link {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("nginx rejected the configuration (`{command}`):\n{detail}")]
    Validation { command: String, detail: String },

    #[error("nginx reload failed (`{command}`):\n{detail}")]
    Reload { command: String, detail: String },

    #[error("{cause}\nAdditionally failed to remove {}: {source}", link.display())]
    RollbackFailed {
        cause: Box<ActivationError>,
        link: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Anything that ends a run in the Failed state.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Activation(#[from] ActivationError),
}

// ── Issuance errors ───────────────────────────────────────────────────────────

/// Recoverable failures of the certificate stage.
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("{program} is not installed")]
    ToolMissing { program: String },

    /// `detail` already ends with the exit status.
    #[error("{program} failed:\n{detail}")]
    Protocol {
        program: String,
        code: Option<i32>,
        detail: String,
    },
}

impl IssuanceError {
    /// Manual remediation advice for the operator.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::ToolMissing { .. } => {
                "Install it with: sudo apt install certbot python3-certbot-nginx"
            }
            Self::Protocol { .. } => {
                "Make sure ports 80/443 are reachable and DNS for the domain points at this server."
            }
        }
    }
}
