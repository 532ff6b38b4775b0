//! Filesystem infrastructure — implements `SiteStore` over the real
//! available/enabled directories.

use std::io;
use std::path::{Path, PathBuf};

use crate::application::ports::SiteStore;
use crate::domain::LinkState;

/// Production filesystem implementation of `SiteStore`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSiteStore;

impl SiteStore for LocalSiteStore {
    fn write_config(&self, path: &Path, text: &str) -> io::Result<()> {
        std::fs::write(path, text)
    }

    fn probe_link(&self, link: &Path, target: &Path) -> io::Result<LinkState> {
        let meta = match std::fs::symlink_metadata(link) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkState::Absent),
            Err(e) => return Err(e),
        };
        if !meta.file_type().is_symlink() {
            return Ok(LinkState::PresentForeign);
        }
        let dest = resolve_link_target(link, std::fs::read_link(link)?);
        if same_file(&dest, target) {
            Ok(LinkState::PresentValid)
        } else {
            Ok(LinkState::PresentForeign)
        }
    }

    #[cfg(unix)]
    fn create_link(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(not(unix))]
    fn create_link(&self, _target: &Path, _link: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinked site activation requires a unix host",
        ))
    }

    fn remove_link(&self, link: &Path) -> io::Result<()> {
        std::fs::remove_file(link)
    }
}

/// Relative link targets are relative to the directory holding the link.
fn resolve_link_target(link: &Path, dest: PathBuf) -> PathBuf {
    if dest.is_absolute() {
        return dest;
    }
    link.parent().map_or(dest.clone(), |dir| dir.join(&dest))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
