//! Advisory per-domain run lock backed by `flock` (via `fs2`).
//!
//! A second run for the same domain is refused rather than queued.

use std::any::Any;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use fs2::FileExt;
use tracing::debug;

use crate::application::ports::RunLock;
use crate::domain::LockError;

/// Lock files live at `<dir>/<domain>.lock`.
#[derive(Debug, Clone)]
pub struct FlockRunLock {
    dir: PathBuf,
}

impl FlockRunLock {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

/// Held lock. Released on drop; the file itself is left in place.
struct SiteLockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for SiteLockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        debug!(path = %self.path.display(), "released run lock");
    }
}

impl RunLock for FlockRunLock {
    fn acquire(&self, domain: &str) -> Result<Box<dyn Any>, LockError> {
        let path = self.dir.join(format!("{domain}.lock"));
        let io_err = |source| LockError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(io_err)?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(LockError::Held {
                    domain: domain.to_string(),
                    path,
                });
            }
            return Err(io_err(e));
        }
        debug!(path = %path.display(), "acquired run lock");
        Ok(Box::new(SiteLockGuard { file, path }))
    }
}
