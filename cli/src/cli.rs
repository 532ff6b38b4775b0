//! CLI argument parsing with clap derive

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::app::{AppContext, OutputMode};
use crate::application::ports::ConfigStore;
use crate::application::services::provision::{ProvisionRequest, provision};
use crate::domain::{
    ConfigError, EmailSource, ExitReason, SiteError, SiteSpec, SiteupConfig, resolve_email,
};
use crate::infra::config::YamlConfigStore;
use crate::infra::privilege::is_privileged;
use crate::output::{HumanRenderer, OutputContext, json};

/// Put a local service behind nginx with a Let's Encrypt certificate
#[derive(Parser, Debug)]
#[command(name = "siteup", version)]
pub struct Cli {
    /// Public domain name to serve (e.g. app.example.com)
    pub domain: String,

    /// Local port the service listens on
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Contact email for the certificate authority
    #[arg(short, long, env = "SITEUP_EMAIL")]
    pub email: Option<String>,

    /// Configuration file
    #[arg(long, env = "SITEUP_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Reasons a run is rejected before anything is touched.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("siteup must run as root to manage nginx (try: sudo siteup {domain} {port})")]
    NotPrivileged { domain: String, port: u16 },

    #[error("{0:#}")]
    ConfigFile(anyhow::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CliError {
    #[must_use]
    pub fn exit_reason(&self) -> ExitReason {
        match self {
            Self::NotPrivileged { .. } => ExitReason::InsufficientPrivilege,
            Self::Site(_) | Self::ConfigFile(_) | Self::Config(_) => ExitReason::InvalidArguments,
        }
    }

    /// Stable machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Site(_) => "INVALID_ARGUMENTS",
            Self::NotPrivileged { .. } => "NOT_ROOT",
            Self::ConfigFile(_) => "INVALID_CONFIG",
            Self::Config(ConfigError::MissingEmail | ConfigError::InvalidEmail(_)) => {
                "INVALID_EMAIL"
            }
            Self::Config(ConfigError::EmptyCommand) => "INVALID_CONFIG",
        }
    }
}

/// A validated invocation, ready to hand to the orchestrator.
#[derive(Debug)]
pub struct Invocation {
    pub site: SiteSpec,
    pub email: String,
    pub email_source: EmailSource,
    pub config: SiteupConfig,
}

impl Cli {
    /// Validate arguments, privilege and configuration, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first [`CliError`] encountered; nothing on disk has been
    /// touched at that point.
    pub fn prepare(
        &self,
        privileged: bool,
        configs: &impl ConfigStore,
    ) -> Result<Invocation, CliError> {
        let site = SiteSpec::new(&self.domain, self.port)?;
        if !privileged {
            return Err(CliError::NotPrivileged {
                domain: site.domain().to_string(),
                port: site.port(),
            });
        }
        let config = configs.load().map_err(CliError::ConfigFile)?;
        let (email, email_source) = resolve_email(self.email.as_deref(), &config)?;
        Ok(Invocation {
            site,
            email,
            email_source,
            config,
        })
    }

    /// Execute one provisioning run and return how it ended.
    pub async fn run(self) -> ExitReason {
        let mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        // JSON mode keeps stdout for the single report object.
        let output = OutputContext::new(self.no_color, self.quiet || self.json);

        let configs = YamlConfigStore::new(self.config.clone());
        let invocation = match self.prepare(is_privileged(), &configs) {
            Ok(invocation) => invocation,
            Err(e) => {
                report_rejection(&output, mode, &e);
                return e.exit_reason();
            }
        };
        tracing::debug!(config = %configs.path().display(), "configuration loaded");

        let Invocation {
            site,
            email,
            email_source,
            config,
        } = invocation;
        let app = AppContext::new(output, mode, config);

        if !app.is_json() {
            HumanRenderer::new(&app.output).render_banner(&site, &email, email_source);
        }

        let reporter = app.terminal_reporter();
        let outcome = provision(
            &app.runner,
            &app.store,
            &app.lock,
            &reporter,
            ProvisionRequest {
                site: &site,
                email: &email,
                config: &app.config,
            },
        )
        .await;

        match app.mode {
            OutputMode::Human => HumanRenderer::new(&app.output).render_outcome(&outcome),
            OutputMode::Json => match json::format_outcome(&outcome) {
                Ok(report) => println!("{report}"),
                Err(e) => app.output.error(&format!("{e:#}")),
            },
        }
        outcome.exit_reason()
    }
}

fn report_rejection(output: &OutputContext, mode: OutputMode, error: &CliError) {
    match mode {
        OutputMode::Human => output.error(&error.to_string()),
        OutputMode::Json => {
            match json::format_error(&error.to_string(), error.code(), error.exit_reason().code())
            {
                Ok(obj) => println!("{obj}"),
                Err(e) => output.error(&format!("{e:#}")),
            }
        }
    }
}
