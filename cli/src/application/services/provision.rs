//! Application service — provisioning orchestrator.
//!
//! `Render → Activate → IssueCertificate`, each stage exactly once:
//! - lock or activation failure ends in `Failed` (nothing reachable)
//! - issuance failure ends in `Degraded` (HTTP stays up, no rollback)
//! - otherwise `Succeeded`
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use tracing::info;

use crate::application::ports::{CommandRunner, ProgressReporter, RunLock, SiteStore};
use crate::application::services::{certificate, site_activation};
use crate::domain::vhost::render;
use crate::domain::{ProvisionOutcome, SiteSpec, SiteupConfig};

/// Everything one run needs besides its ports.
pub struct ProvisionRequest<'a> {
    pub site: &'a SiteSpec,
    pub email: &'a str,
    pub config: &'a SiteupConfig,
}

/// Run the full provisioning workflow for one site.
///
/// Never returns an error: every failure is folded into the outcome so the
/// caller can map it to an exit status.
pub async fn provision(
    runner: &impl CommandRunner,
    store: &impl SiteStore,
    lock: &impl RunLock,
    reporter: &impl ProgressReporter,
    request: ProvisionRequest<'_>,
) -> ProvisionOutcome {
    let ProvisionRequest { site, email, config } = request;
    let domain = site.domain();

    let _guard = match lock.acquire(domain) {
        Ok(guard) => guard,
        Err(error) => {
            return ProvisionOutcome::Failed {
                site: site.clone(),
                activation: None,
                error: error.into(),
            };
        }
    };

    info!(domain, stage = "render", "rendering virtual host");
    let text = render(domain, site.port());

    info!(domain, stage = "activate", "activating HTTP site");
    let activation =
        match site_activation::activate(runner, store, &config.nginx, reporter, domain, &text)
            .await
        {
            Ok(record) => record,
            Err(failure) => {
                info!(domain, state = "failed", "activation failed, stopping");
                return ProvisionOutcome::Failed {
                    site: site.clone(),
                    activation: Some(failure.record),
                    error: failure.error.into(),
                };
            }
        };

    info!(domain, stage = "issue_certificate", "requesting certificate");
    let issuance = certificate::issue(runner, &config.acme, reporter, domain, email).await;

    if issuance.is_success() {
        info!(domain, state = "succeeded", "HTTPS active");
        ProvisionOutcome::Succeeded {
            site: site.clone(),
            activation,
            issuance,
        }
    } else {
        info!(domain, state = "degraded", "HTTP active, HTTPS failed");
        ProvisionOutcome::Degraded {
            site: site.clone(),
            activation,
            issuance,
        }
    }
}
