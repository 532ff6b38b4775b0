//! Domain types and validators for siteup configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_CONFIG_PATH: &str = "/etc/siteup/config.yaml";
pub const DEFAULT_AVAILABLE_DIR: &str = "/etc/nginx/sites-available";
pub const DEFAULT_ENABLED_DIR: &str = "/etc/nginx/sites-enabled";
pub const DEFAULT_LOCK_DIR: &str = "/run/siteup";
pub const DEFAULT_ACME_CLIENT: &str = "certbot";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `/etc/siteup/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteupConfig {
    /// Default contact address for certificate registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub nginx: NginxConfig,
    pub acme: AcmeConfig,
    /// Directory holding per-domain run lock files.
    pub lock_dir: PathBuf,
}

impl Default for SiteupConfig {
    fn default() -> Self {
        Self {
            email: None,
            nginx: NginxConfig::default(),
            acme: AcmeConfig::default(),
            lock_dir: PathBuf::from(DEFAULT_LOCK_DIR),
        }
    }
}

/// nginx layout and service commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NginxConfig {
    pub available_dir: PathBuf,
    pub enabled_dir: PathBuf,
    /// Syntax check over the full configuration set.
    pub test_command: CommandSpec,
    /// In-place reload of the running service.
    pub reload_command: CommandSpec,
}

impl Default for NginxConfig {
    fn default() -> Self {
        Self {
            available_dir: PathBuf::from(DEFAULT_AVAILABLE_DIR),
            enabled_dir: PathBuf::from(DEFAULT_ENABLED_DIR),
            test_command: CommandSpec::new("nginx", &["-t"]),
            reload_command: CommandSpec::new("systemctl", &["reload", "nginx"]),
        }
    }
}

impl NginxConfig {
    /// `<available-dir>/<domain>.conf`
    #[must_use]
    pub fn config_path(&self, domain: &str) -> PathBuf {
        site_file(&self.available_dir, domain)
    }

    /// `<enabled-dir>/<domain>.conf`
    #[must_use]
    pub fn link_path(&self, domain: &str) -> PathBuf {
        site_file(&self.enabled_dir, domain)
    }
}

fn site_file(dir: &Path, domain: &str) -> PathBuf {
    dir.join(format!("{domain}.conf"))
}

/// ACME client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcmeConfig {
    /// Client binary, looked up on `PATH`.
    pub client: String,
    /// Pass `-v` to the client.
    pub verbose: bool,
}

impl Default for AcmeConfig {
    fn default() -> Self {
        Self {
            client: DEFAULT_ACME_CLIENT.to_string(),
            verbose: true,
        }
    }
}

/// A non-empty argv: program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl TryFrom<Vec<String>> for CommandSpec {
    type Error = ConfigError;

    fn try_from(argv: Vec<String>) -> Result<Self, Self::Error> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::EmptyCommand)?;
        Ok(Self {
            program,
            args: argv.collect(),
        })
    }
}

impl From<CommandSpec> for Vec<String> {
    fn from(cmd: CommandSpec) -> Self {
        std::iter::once(cmd.program).chain(cmd.args).collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ── Contact email ────────────────────────────────────────────────────────────

/// Where the contact email came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailSource {
    /// `--email` or `SITEUP_EMAIL`.
    Argument,
    /// `email:` in the config file.
    Config,
}

/// Pick the contact email: explicit argument first, then config.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEmail`] if neither is set, or
/// [`ConfigError::InvalidEmail`] if the chosen value is not an address.
pub fn resolve_email(
    argument: Option<&str>,
    config: &SiteupConfig,
) -> Result<(String, EmailSource), ConfigError> {
    let (email, source) = match argument.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => (email, EmailSource::Argument),
        None => match config.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => (email, EmailSource::Config),
            None => return Err(ConfigError::MissingEmail),
        },
    };
    validate_email(email)?;
    Ok((email.to_string(), source))
}

/// Minimal shape check: one `@` with non-empty local part and a dotted host.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEmail`] if the shape check fails.
pub fn validate_email(email: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidEmail(email.to_string());
    let (local, host) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || host.contains('@')
        || !host.contains('.')
        || host.starts_with('.')
        || host.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
