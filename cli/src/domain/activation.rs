//! Activation record — lifecycle of one site activation within a single run.
//!
//! Nothing here is persisted. The files and links on disk are the source of
//! truth for idempotency across runs.

use std::fmt;
use std::path::PathBuf;

/// Where an activation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    Drafted,
    Written,
    Linked,
    Validated,
    Reloaded,
    RolledBack,
}

impl ActivationState {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// The happy path is strictly linear. Rollback is only reachable once a
    /// link exists and before the reload has been confirmed.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Drafted, Self::Written)
                | (Self::Written, Self::Linked)
                | (Self::Linked, Self::Validated)
                | (Self::Validated, Self::Reloaded)
                | (Self::Linked | Self::Validated, Self::RolledBack)
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drafted => "drafted",
            Self::Written => "written",
            Self::Linked => "linked",
            Self::Validated => "validated",
            Self::Reloaded => "reloaded",
            Self::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What occupied the enabled-link path before this run touched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing at the link path.
    Absent,
    /// A symlink pointing at this domain's config file.
    PresentValid,
    /// Something else: a regular file, a directory, or a symlink elsewhere.
    PresentForeign,
}

/// One activation attempt for one domain.
#[derive(Debug, Clone)]
pub struct ActivationRecord {
    pub domain: String,
    pub config_path: PathBuf,
    pub link_path: PathBuf,
    pub state: ActivationState,
    /// Result of probing the link path, once probed.
    pub link_probe: Option<LinkState>,
    /// `true` only if this run created the link. Rollback is limited to that case.
    pub created_link: bool,
}

impl ActivationRecord {
    #[must_use]
    pub fn draft(domain: &str, config_path: PathBuf, link_path: PathBuf) -> Self {
        Self {
            domain: domain.to_string(),
            config_path,
            link_path,
            state: ActivationState::Drafted,
            link_probe: None,
            created_link: false,
        }
    }

    /// Move to `next`. Illegal transitions are a programming error.
    pub fn advance(&mut self, next: ActivationState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal activation transition {} -> {next}",
            self.state
        );
        self.state = next;
    }

    /// Whether the site is being served over HTTP after this activation.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state == ActivationState::Reloaded
    }
}
