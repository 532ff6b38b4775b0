//! Privilege probe.

/// Whether the process runs with an effective uid of root.
#[must_use]
pub fn is_privileged() -> bool {
    nix::unistd::geteuid().is_root()
}
