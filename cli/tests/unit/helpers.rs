//! Shared test helpers: port doubles and a temporary nginx layout.

#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};
use siteup_cli::application::ports::{CommandRunner, ProgressReporter};
use siteup_cli::domain::{NginxConfig, SiteupConfig};
use tempfile::TempDir;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Shared mock implementations ──────────────────────────────────────────────

/// What a fake program does when invoked.
#[derive(Clone, Copy)]
pub enum Behaviour {
    Succeed,
    Fail(i32, &'static str),
    Missing,
}

/// Records every invocation; unscripted programs succeed.
#[derive(Default)]
pub struct FakeHost {
    behaviours: HashMap<&'static str, Behaviour>,
    pub invocations: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, program: &'static str, behaviour: Behaviour) -> Self {
        self.behaviours.insert(program, behaviour);
        self
    }

    pub fn ran(&self, program: &str) -> bool {
        self.invocations
            .borrow()
            .iter()
            .any(|line| line.split(' ').next() == Some(program))
    }

    pub fn command_line(&self, program: &str) -> Option<String> {
        self.invocations
            .borrow()
            .iter()
            .find(|line| line.split(' ').next() == Some(program))
            .cloned()
    }
}

impl CommandRunner for FakeHost {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.invocations.borrow_mut().push(line);
        match self
            .behaviours
            .get(program)
            .copied()
            .unwrap_or(Behaviour::Succeed)
        {
            Behaviour::Succeed => Ok(ok_output(b"")),
            Behaviour::Fail(code, stderr) => Ok(err_output(code, stderr.as_bytes())),
            Behaviour::Missing => Err(std::io::Error::from(std::io::ErrorKind::NotFound))
                .with_context(|| format!("failed to spawn {program}")),
        }
    }
}

/// Discards progress messages.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

// ── Filesystem fixture ───────────────────────────────────────────────────────

/// A throwaway `sites-available` / `sites-enabled` / lock directory layout.
pub struct NginxLayout {
    pub root: TempDir,
    pub config: SiteupConfig,
}

impl NginxLayout {
    pub fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let available = root.path().join("sites-available");
        let enabled = root.path().join("sites-enabled");
        std::fs::create_dir_all(&available).expect("mkdir available");
        std::fs::create_dir_all(&enabled).expect("mkdir enabled");
        let config = SiteupConfig {
            email: Some("ops@example.com".to_string()),
            nginx: NginxConfig {
                available_dir: available,
                enabled_dir: enabled,
                ..NginxConfig::default()
            },
            lock_dir: root.path().join("run"),
            ..SiteupConfig::default()
        };
        Self { root, config }
    }

    pub fn config_file(&self, domain: &str) -> PathBuf {
        self.config.nginx.config_path(domain)
    }

    pub fn link(&self, domain: &str) -> PathBuf {
        self.config.nginx.link_path(domain)
    }

    pub fn link_exists(&self, domain: &str) -> bool {
        self.link(domain).symlink_metadata().is_ok()
    }

    pub fn enabled_entries(&self) -> usize {
        std::fs::read_dir(&self.config.nginx.enabled_dir)
            .expect("read enabled")
            .count()
    }

    pub fn available_entries(&self) -> usize {
        std::fs::read_dir(&self.config.nginx.available_dir)
            .expect("read available")
            .count()
    }
}
