//! Human-readable terminal renderer.

use crate::domain::{ActivationState, EmailSource, ProvisionOutcome, SiteSpec};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Announce what the run is about to do.
    pub fn render_banner(&self, site: &SiteSpec, email: &str, source: EmailSource) {
        self.ctx.header(&format!("Configuring reverse proxy: {site}"));
        if source == EmailSource::Config {
            self.ctx.warn(&format!(
                "using the configured contact email {email}; pass --email to override"
            ));
        }
    }

    /// Render the final state of a run.
    pub fn render_outcome(&self, outcome: &ProvisionOutcome) {
        let site = outcome.site();
        match outcome {
            ProvisionOutcome::Succeeded { .. } => {
                self.ctx.blank();
                self.ctx.success(&format!(
                    "https://{} -> {} is live",
                    site.domain(),
                    site.upstream()
                ));
            }
            ProvisionOutcome::Degraded { issuance, .. } => {
                self.ctx.error(&issuance.detail);
                if let Some(err) = &issuance.error {
                    self.ctx.info(err.hint());
                }
                self.ctx.blank();
                self.ctx.warn(&format!(
                    "nginx is active for http://{} but only over HTTP",
                    site.domain()
                ));
            }
            ProvisionOutcome::Failed {
                error, activation, ..
            } => {
                self.ctx.error(&error.to_string());
                if let Some(record) = activation
                    .as_ref()
                    .filter(|r| r.state != ActivationState::Drafted)
                {
                    self.ctx.kv(
                        "Site definition kept:",
                        &record.config_path.display().to_string(),
                    );
                }
                self.ctx
                    .error("stopped before the site became reachable; nothing is being served");
            }
        }
    }
}
