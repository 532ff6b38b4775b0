//! Unit tests for siteup CLI
//!
//! These tests use faked external programs and temporary directories and run
//! without root, nginx or certbot.

mod architecture;
mod helpers;
