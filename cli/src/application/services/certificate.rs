//! Application service — TLS certificate issuance use-case.
//!
//! Delegates the ACME exchange and the nginx rewrite to the external client.
//! There is no rollback here: a failed or half-finished run of the client is
//! reported as-is for manual remediation.

use tracing::{debug, info, warn};

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::application::services::{command_detail, is_not_found};
use crate::domain::{AcmeConfig, IssuanceError, IssuanceOutcome};

/// Arguments for the ACME client: nginx installer, non-interactive, accept the
/// terms, register `email`, redirect HTTP to HTTPS.
#[must_use]
pub fn acme_args(domain: &str, email: &str, verbose: bool) -> Vec<String> {
    let mut args: Vec<String> = [
        "run",
        "--nginx",
        "-d",
        domain,
        "--non-interactive",
        "--agree-tos",
        "--email",
        email,
        "--redirect",
    ]
    .iter()
    .map(|a| (*a).to_string())
    .collect();
    if verbose {
        args.push("-v".to_string());
    }
    args
}

/// Obtain and install a certificate for `domain`. Runs the client exactly once.
pub async fn issue(
    runner: &impl CommandRunner,
    acme: &AcmeConfig,
    reporter: &impl ProgressReporter,
    domain: &str,
    email: &str,
) -> IssuanceOutcome {
    let program = acme.client.as_str();
    let args = acme_args(domain, email, acme.verbose);
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();

    reporter.step(&format!("requesting TLS certificate for {domain}..."));
    debug!(program, ?argv, "running ACME client");

    let error = match runner.run(program, &argv).await {
        Ok(output) if output.status.success() => {
            info!(domain, "certificate installed");
            reporter.success(&format!("certificate obtained and installed for {domain}"));
            reporter.success("nginx configuration updated to HTTPS");
            return IssuanceOutcome::succeeded(
                domain,
                "certificate installed, HTTP redirects to HTTPS",
            );
        }
        Ok(output) => IssuanceError::Protocol {
            program: program.to_string(),
            code: output.status.code(),
            detail: command_detail(&output),
        },
        Err(err) if is_not_found(&err) => IssuanceError::ToolMissing {
            program: program.to_string(),
        },
        Err(err) => IssuanceError::Protocol {
            program: program.to_string(),
            code: None,
            detail: format!("{err:#}"),
        },
    };

    warn!(domain, error = %error, "certificate issuance failed");
    reporter.warn(&format!("certificate issuance failed: {error}"));
    IssuanceOutcome::failed(domain, error)
}
