//! Site identity: the validated domain/port pair a run provisions.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::SiteError;

/// One DNS label: letters, digits and hyphens, no leading or trailing hyphen.
pub static DNS_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex")
});

/// Maximum length of a fully qualified domain name, without the root dot.
pub const MAX_DOMAIN_LEN: usize = 253;

/// The domain/port pair a single invocation provisions.
///
/// Immutable once constructed. The domain is stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSpec {
    domain: String,
    port: u16,
}

impl SiteSpec {
    /// Validate and build a site spec.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidDomain`] if `domain` is not valid DNS name
    /// syntax, or [`SiteError::InvalidPort`] if `port` is zero.
    pub fn new(domain: &str, port: u16) -> Result<Self, SiteError> {
        let domain = validate_domain(domain)?;
        if port == 0 {
            return Err(SiteError::InvalidPort(u32::from(port)));
        }
        Ok(Self { domain, port })
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Local upstream the proxy forwards to.
    #[must_use]
    pub fn upstream(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

impl fmt::Display for SiteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://{} -> {}", self.domain, self.upstream())
    }
}

/// Check DNS name syntax and return the normalised (lowercase) domain.
///
/// # Errors
///
/// Returns [`SiteError::InvalidDomain`] naming the first rule violated.
pub fn validate_domain(raw: &str) -> Result<String, SiteError> {
    let invalid = |reason| SiteError::InvalidDomain {
        domain: raw.to_string(),
        reason,
    };
    if raw.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if raw.len() > MAX_DOMAIN_LEN {
        return Err(invalid("longer than 253 characters"));
    }
    let domain = raw.to_ascii_lowercase();
    for label in domain.split('.') {
        if label.is_empty() {
            return Err(invalid("contains an empty label"));
        }
        if !DNS_LABEL_RE.is_match(label) {
            return Err(invalid(
                "labels must be 1-63 letters, digits or hyphens and not start or end with a hyphen",
            ));
        }
    }
    Ok(domain)
}
