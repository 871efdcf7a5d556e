use crate::core::download::{extract_tar_gz, Transport};
use crate::core::manifest::ArchiveSpec;
use crate::core::scratch::ScratchDir;
use crate::error::{FetchError, Result};
use crate::utils::fs;
use std::path::PathBuf;

/// One fetch-and-extract run.
#[derive(Debug, Clone)]
pub struct FetchJob {
    pub specs: Vec<ArchiveSpec>,
    /// Parent of the job's scratch directory.
    pub scratch_root: PathBuf,
    pub output_dir: PathBuf,
}

impl FetchJob {
    pub fn new(specs: Vec<ArchiveSpec>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            specs,
            scratch_root: std::env::temp_dir(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_scratch_root(mut self, scratch_root: impl Into<PathBuf>) -> Self {
        self.scratch_root = scratch_root.into();
        self
    }
}

pub struct ArchiveFetcher<T: Transport> {
    transport: T,
}

impl<T: Transport> ArchiveFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Downloads every archive of `job` into a fresh scratch directory, then
    /// extracts them in order into the output directory.
    ///
    /// Extraction only starts once every download produced a file. The
    /// scratch directory is gone when this returns, whatever the outcome.
    pub fn fetch(&self, job: &FetchJob) -> Result<()> {
        fs::ensure_dir_exists(&job.output_dir)?;

        let scratch =
            ScratchDir::create_in(&job.scratch_root).map_err(|e| FetchError::ScratchDir {
                path: job.scratch_root.clone(),
                source: e,
            })?;

        let total = job.specs.len();

        for (i, spec) in job.specs.iter().enumerate() {
            let destination = scratch.join(&spec.name);
            println!("[{}/{total}] Downloading {}...", i + 1, spec.name);

            if let Err(e) = self.transport.retrieve(&spec.url(), &destination) {
                tracing::warn!("transfer of {} reported an error: {e:#}", spec.name);
            }

            // Existence is the only success signal; size is not checked.
            if !destination.exists() {
                println!("[{}/{total}] Failed to download {}", i + 1, spec.name);
                return Err(FetchError::DownloadFailed {
                    name: spec.name.clone(),
                });
            }

            println!("[{}/{total}] Downloaded {}", i + 1, spec.name);
        }

        for (i, spec) in job.specs.iter().enumerate() {
            println!(
                "[{}/{total}] Extracting {} to {}...",
                i + 1,
                spec.name,
                job.output_dir.display()
            );

            extract_tar_gz(&scratch.join(&spec.name), &job.output_dir).map_err(|e| {
                FetchError::ExtractFailed {
                    name: spec.name.clone(),
                    source: e,
                }
            })?;

            println!("[{}/{total}] Extracted {}", i + 1, spec.name);
        }

        tracing::info!(
            "fetched {total} archive(s) into {}",
            job.output_dir.display()
        );
        Ok(())
    }
}
