//! Job-exclusive staging directories.
//!
//! A [`ScratchDir`] is removed when dropped. Live scratch directories are also
//! tracked in a process-wide registry so that [`install_interrupt_cleanup`]
//! can remove them when the process is interrupted, where no destructor runs.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, Once};
use tempfile::TempDir;

const PREFIX: &str = "mirror-fetch-";

static LIVE: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
static HANDLER: Once = Once::new();

fn live() -> MutexGuard<'static, Vec<PathBuf>> {
    // A poisoned registry still holds valid paths.
    LIVE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a uniquely named directory under `root`, creating `root` first
    /// if needed.
    pub fn create_in(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix(PREFIX).tempdir_in(root)?;
        live().push(dir.path().to_path_buf());
        tracing::debug!("created scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let path = self.dir.path();
        live().retain(|p| p != path);
        tracing::debug!("removing scratch directory {}", path.display());
        // TempDir's own drop removes the tree.
    }
}

/// Paths of scratch directories that are currently alive.
pub fn live_scratch_dirs() -> Vec<PathBuf> {
    live().clone()
}

/// Removes every live scratch directory. Called from the interrupt handler.
pub fn remove_live_scratch_dirs() {
    remove_live_scratch_dirs_where(|_| true);
}

fn remove_live_scratch_dirs_where(matches: impl Fn(&Path) -> bool) {
    let mut registry = live();
    let (doomed, kept): (Vec<PathBuf>, Vec<PathBuf>) =
        registry.drain(..).partition(|p| matches(p));
    *registry = kept;
    drop(registry);

    for path in doomed {
        if let Err(e) = std::fs::remove_dir_all(&path) {
            tracing::warn!("could not remove scratch directory {}: {e}", path.display());
        }
    }
}

/// Installs a handler for SIGINT, SIGTERM and SIGHUP that removes live
/// scratch directories and exits with status 130. Safe to call more than once.
pub fn install_interrupt_cleanup() -> anyhow::Result<()> {
    let mut result = Ok(());
    HANDLER.call_once(|| {
        result = ctrlc::set_handler(|| {
            eprintln!("Interrupted, removing scratch files");
            remove_live_scratch_dirs();
            std::process::exit(130);
        })
        .map_err(|e| anyhow::anyhow!("Could not install the signal handler: {e}"));
    });
    result
}
