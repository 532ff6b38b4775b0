//! Shared test helpers for service tests.
//!
//! Provides cross-platform `exit_status()`, canned `Output` constructors and
//! hand-written port doubles.

#![allow(clippy::expect_used)]

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProgressReporter, RunLock};
use crate::domain::{LockError, NginxConfig, SiteupConfig};

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn output(code: i32, stdout: &[u8], stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.to_vec(),
        stderr: stderr.to_vec(),
    }
}

/// Canned behaviour for one program.
#[derive(Clone)]
pub enum Reply {
    Exit { code: i32, stderr: &'static str },
    NotInstalled,
}

impl Reply {
    pub fn ok() -> Self {
        Self::Exit { code: 0, stderr: "" }
    }

    pub fn fail(stderr: &'static str) -> Self {
        Self::Exit { code: 1, stderr }
    }
}

/// `CommandRunner` that answers per program and records every call.
///
/// Programs without a scripted reply succeed. When `watch` is set, each call
/// also records whether that path existed at the time of the call.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, Reply>,
    pub calls: RefCell<Vec<Vec<String>>>,
    watch: Option<PathBuf>,
    pub watched: RefCell<Vec<bool>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reply(mut self, program: &str, reply: Reply) -> Self {
        self.replies.insert(program.to_string(), reply);
        self
    }

    #[must_use]
    pub fn watch(mut self, path: &Path) -> Self {
        self.watch = Some(path.to_path_buf());
        self
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|argv| argv.first().cloned())
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.calls.borrow_mut().push(
            std::iter::once(program)
                .chain(args.iter().copied())
                .map(str::to_string)
                .collect(),
        );
        if let Some(path) = &self.watch {
            self.watched.borrow_mut().push(path.symlink_metadata().is_ok());
        }
        match self.replies.get(program).cloned().unwrap_or_else(Reply::ok) {
            Reply::Exit { code, stderr } => Ok(output(code, b"", stderr.as_bytes())),
            Reply::NotInstalled => Err(std::io::Error::from(std::io::ErrorKind::NotFound))
                .with_context(|| format!("failed to spawn {program}")),
        }
    }
}

/// Reporter that remembers every message.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
}

/// Lock that is always free.
pub struct FreeLock;

impl RunLock for FreeLock {
    fn acquire(&self, _: &str) -> Result<Box<dyn Any>, LockError> {
        Ok(Box::new(()))
    }
}

/// Lock that is always held by someone else.
pub struct HeldLock;

impl RunLock for HeldLock {
    fn acquire(&self, domain: &str) -> Result<Box<dyn Any>, LockError> {
        Err(LockError::Held {
            domain: domain.to_string(),
            path: PathBuf::from(format!("/run/siteup/{domain}.lock")),
        })
    }
}

/// Temporary available/enabled directory pair.
pub struct SiteDirs {
    _dir: tempfile::TempDir,
    pub config: SiteupConfig,
}

impl SiteDirs {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let available = dir.path().join("sites-available");
        let enabled = dir.path().join("sites-enabled");
        std::fs::create_dir_all(&available).expect("create available");
        std::fs::create_dir_all(&enabled).expect("create enabled");
        let config = SiteupConfig {
            email: Some("ops@example.com".to_string()),
            nginx: NginxConfig {
                available_dir: available,
                enabled_dir: enabled,
                ..NginxConfig::default()
            },
            lock_dir: dir.path().join("lock"),
            ..SiteupConfig::default()
        };
        Self { _dir: dir, config }
    }

    pub fn nginx(&self) -> &NginxConfig {
        &self.config.nginx
    }
}
