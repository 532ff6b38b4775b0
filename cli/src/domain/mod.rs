//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `crate::output` or `tokio`.
//! All functions are synchronous and take data in, returning data out.

pub mod activation;
pub mod config;
pub mod error;
pub mod outcome;
pub mod site;
pub mod vhost;

pub use activation::{ActivationRecord, ActivationState, LinkState};
pub use config::{AcmeConfig, CommandSpec, EmailSource, NginxConfig, SiteupConfig, resolve_email};
pub use error::{ActivationError, ConfigError, IssuanceError, LockError, ProvisionError, SiteError};
pub use outcome::{ExitReason, IssuanceOutcome, ProvisionOutcome};
pub use site::SiteSpec;
