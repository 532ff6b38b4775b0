//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra` or `crate::output`.

pub mod certificate;
pub mod provision;
pub mod site_activation;

#[cfg(test)]
pub(crate) mod test_support;

use std::process::Output;

/// Captured output of a failed command, stderr first, for error messages.
pub(crate) fn command_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let status = output
        .status
        .code()
        .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
    let captured = [stderr.trim(), stdout.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if captured.is_empty() {
        status
    } else {
        format!("{captured}\n({status})")
    }
}

/// Whether a spawn failure means the program is not installed.
pub(crate) fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    })
}
