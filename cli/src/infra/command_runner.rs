//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Commands run to completion with no timeout;
//! stdin is closed so an unexpected prompt fails instead of blocking on a TTY.

use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        debug!(program, ?args, "spawning");
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to spawn {program}"))?;
        debug!(program, status = %output.status, "finished");
        Ok(output)
    }
}
