//! Application service — HTTP site activation use-case.
//!
//! Write the definition, enable it, validate, reload. On a validate or
//! reload failure the link is removed again, but only if this run created it.
//! The written definition always stays on disk.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use tracing::{debug, info, warn};

use crate::application::ports::{CommandRunner, ProgressReporter, SiteStore};
use crate::application::services::command_detail;
use crate::domain::{
    ActivationError, ActivationRecord, ActivationState, CommandSpec, LinkState, NginxConfig,
};

/// A failed activation, with the record as it stood when the chain stopped.
#[derive(Debug)]
pub struct ActivationFailure {
    pub record: ActivationRecord,
    pub error: ActivationError,
}

/// Activate the HTTP site for `domain` with definition `text`.
///
/// # Errors
///
/// Returns an [`ActivationFailure`] if writing, linking, validating or
/// reloading fails. Any link created by this call has been removed by then.
pub async fn activate(
    runner: &impl CommandRunner,
    store: &impl SiteStore,
    nginx: &NginxConfig,
    reporter: &impl ProgressReporter,
    domain: &str,
    text: &str,
) -> Result<ActivationRecord, ActivationFailure> {
    let mut record =
        ActivationRecord::draft(domain, nginx.config_path(domain), nginx.link_path(domain));

    reporter.step(&format!("writing {}...", record.config_path.display()));
    if let Err(source) = store.write_config(&record.config_path, text) {
        let error = ActivationError::Write {
            path: record.config_path.clone(),
            source,
        };
        return Err(ActivationFailure { record, error });
    }
    record.advance(ActivationState::Written);
    debug!(path = %record.config_path.display(), "site definition written");

    if let Err(source) = enable(store, reporter, &mut record) {
        let error = ActivationError::Link {
            path: record.link_path.clone(),
            source,
        };
        return Err(ActivationFailure { record, error });
    }
    record.advance(ActivationState::Linked);

    reporter.step("checking nginx configuration...");
    if let Err(detail) = run_checked(runner, &nginx.test_command).await {
        let error = ActivationError::Validation {
            command: nginx.test_command.to_string(),
            detail,
        };
        return Err(roll_back(store, reporter, record, error));
    }
    record.advance(ActivationState::Validated);
    reporter.success("nginx configuration is valid");

    reporter.step("reloading nginx...");
    if let Err(detail) = run_checked(runner, &nginx.reload_command).await {
        let error = ActivationError::Reload {
            command: nginx.reload_command.to_string(),
            detail,
        };
        return Err(roll_back(store, reporter, record, error));
    }
    record.advance(ActivationState::Reloaded);
    reporter.success("nginx reloaded, HTTP reverse proxy active");
    info!(domain, "site activated over HTTP");

    Ok(record)
}

/// Probe the enabled link and create it when absent.
fn enable(
    store: &impl SiteStore,
    reporter: &impl ProgressReporter,
    record: &mut ActivationRecord,
) -> std::io::Result<()> {
    let probe = store.probe_link(&record.link_path, &record.config_path)?;
    record.link_probe = Some(probe);
    let link = record.link_path.display().to_string();
    match probe {
        LinkState::Absent => {
            store.create_link(&record.config_path, &record.link_path)?;
            record.created_link = true;
            reporter.success(&format!("enabled site: {link}"));
        }
        LinkState::PresentValid => {
            reporter.step(&format!("site already enabled ({link}), keeping link"));
        }
        LinkState::PresentForeign => {
            warn!(link = %link, "enabled path exists but does not point at the site definition");
            reporter.warn(&format!(
                "{link} exists and does not point at {}; leaving it untouched",
                record.config_path.display()
            ));
        }
    }
    Ok(())
}

/// Undo the link if this run created it, then hand back the failure.
fn roll_back(
    store: &impl SiteStore,
    reporter: &impl ProgressReporter,
    mut record: ActivationRecord,
    error: ActivationError,
) -> ActivationFailure {
    if !record.created_link {
        return ActivationFailure { record, error };
    }
    match store.remove_link(&record.link_path) {
        Ok(()) => {
            record.advance(ActivationState::RolledBack);
            warn!(link = %record.link_path.display(), "removed link after failed activation");
            reporter.warn(&format!("removed {}", record.link_path.display()));
            ActivationFailure { record, error }
        }
        Err(source) => {
            let error = ActivationError::RollbackFailed {
                cause: Box::new(error),
                link: record.link_path.clone(),
                source,
            };
            ActivationFailure { record, error }
        }
    }
}

/// Run `cmd`; `Err` carries the captured output (or spawn error) on failure.
async fn run_checked(runner: &impl CommandRunner, cmd: &CommandSpec) -> Result<(), String> {
    debug!(command = %cmd, "running");
    match runner.run(cmd.program(), &cmd.args()).await {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(command_detail(&output)),
        Err(err) => Err(format!("{err:#}")),
    }
}
