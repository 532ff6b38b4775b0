//! Terminal outcomes of a provisioning run and their exit codes.

use std::fmt;

use crate::domain::activation::ActivationRecord;
use crate::domain::error::{IssuanceError, ProvisionError};
use crate::domain::site::SiteSpec;

/// Process exit reasons. The numeric values are part of the CLI contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitReason {
    /// HTTPS active.
    Succeeded = 0,
    /// HTTP active, TLS failed.
    Degraded = 1,
    /// Failed before any site became reachable.
    Failed = 2,
    InvalidArguments = 3,
    InsufficientPrivilege = 4,
}

impl ExitReason {
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitReason> for std::process::ExitCode {
    fn from(reason: ExitReason) -> Self {
        Self::from(reason.code())
    }
}

/// Result of the certificate stage. Produced once, never retried.
#[derive(Debug)]
pub struct IssuanceOutcome {
    pub domain: String,
    pub detail: String,
    pub error: Option<IssuanceError>,
}

impl IssuanceOutcome {
    #[must_use]
    pub fn succeeded(domain: &str, detail: impl Into<String>) -> Self {
        Self {
            domain: domain.to_string(),
            detail: detail.into(),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(domain: &str, error: IssuanceError) -> Self {
        Self {
            domain: domain.to_string(),
            detail: error.to_string(),
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum ProvisionOutcome {
    /// Site served over HTTPS.
    Succeeded {
        site: SiteSpec,
        activation: ActivationRecord,
        issuance: IssuanceOutcome,
    },
    /// Site served over HTTP only; the certificate stage failed.
    Degraded {
        site: SiteSpec,
        activation: ActivationRecord,
        issuance: IssuanceOutcome,
    },
    /// Nothing became reachable. `activation` is `None` if the run stopped
    /// before the activator started.
    Failed {
        site: SiteSpec,
        activation: Option<ActivationRecord>,
        error: ProvisionError,
    },
}

impl ProvisionOutcome {
    #[must_use]
    pub fn site(&self) -> &SiteSpec {
        match self {
            Self::Succeeded { site, .. } | Self::Degraded { site, .. } | Self::Failed { site, .. } => {
                site
            }
        }
    }

    #[must_use]
    pub fn activation(&self) -> Option<&ActivationRecord> {
        match self {
            Self::Succeeded { activation, .. } | Self::Degraded { activation, .. } => {
                Some(activation)
            }
            Self::Failed { activation, .. } => activation.as_ref(),
        }
    }

    #[must_use]
    pub fn exit_reason(&self) -> ExitReason {
        match self {
            Self::Succeeded { .. } => ExitReason::Succeeded,
            Self::Degraded { .. } => ExitReason::Degraded,
            Self::Failed { .. } => ExitReason::Failed,
        }
    }

    #[must_use]
    pub fn http_active(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn https_active(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Public URL the site is reachable on, if any.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        let domain = self.site().domain();
        match self {
            Self::Succeeded { .. } => Some(format!("https://{domain}")),
            Self::Degraded { .. } => Some(format!("http://{domain}")),
            Self::Failed { .. } => None,
        }
    }

    /// Human-readable description of what went wrong, if anything.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Degraded { issuance, .. } => Some(issuance.detail.clone()),
            Self::Failed { error, .. } => Some(error.to_string()),
        }
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Succeeded { .. } => "succeeded",
            Self::Degraded { .. } => "degraded",
            Self::Failed { .. } => "failed",
        })
    }
}
