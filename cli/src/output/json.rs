//! JSON output helpers.
//!
//! One object per run on stdout: either an outcome report or, for runs that
//! never reached the orchestrator, an error object.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::ProvisionOutcome;

/// Machine-readable summary of a provisioning run.
#[derive(Debug, Serialize)]
pub struct OutcomeReport {
    pub domain: String,
    pub port: u16,
    pub state: String,
    pub http_active: bool,
    pub https_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub exit_code: u8,
}

impl From<&ProvisionOutcome> for OutcomeReport {
    fn from(outcome: &ProvisionOutcome) -> Self {
        let site = outcome.site();
        let activation = outcome.activation();
        let hint = match outcome {
            ProvisionOutcome::Degraded { issuance, .. } => {
                issuance.error.as_ref().map(|e| e.hint().to_string())
            }
            _ => None,
        };
        Self {
            domain: site.domain().to_string(),
            port: site.port(),
            state: outcome.to_string(),
            http_active: outcome.http_active(),
            https_active: outcome.https_active(),
            url: outcome.url(),
            config_path: activation.map(|a| a.config_path.display().to_string()),
            link_path: activation.map(|a| a.link_path.display().to_string()),
            activation_state: activation.map(|a| a.state.to_string()),
            error: outcome.error_message(),
            hint,
            exit_code: outcome.exit_reason().code(),
        }
    }
}

/// Serialize a run outcome.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_outcome(outcome: &ProvisionOutcome) -> Result<String> {
    serde_json::to_string_pretty(&OutcomeReport::from(outcome)).context("JSON serialization failed")
}

/// Format a JSON error object for runs rejected before provisioning.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "...",
///   "exit_code": 3
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str, exit_code: u8) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
        "exit_code": exit_code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
