use crate::error::{FetchError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN_MANIFEST: &str = include_str!("../../mirror.toml");

/// One remote archive: its file name and the base URL it is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    pub name: String,
    pub base_url: String,
}

impl ArchiveSpec {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }

    /// Download URL: base URL and name joined by a single `/`, verbatim.
    pub fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.name)
    }
}

/// Ordered archive list matching the manifest.toml format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub base_url: String,
    pub archives: Vec<String>,
}

impl Manifest {
    /// Load a manifest from a file path
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FetchError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a manifest from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(content).map_err(|e| FetchError::manifest_error(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FetchError::manifest_error(e.to_string()))
    }

    /// The archive set shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_MANIFEST)
    }

    /// Picks the manifest to use: an explicit path, then the user's
    /// config-dir manifest, then the builtin one.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        if let Some(user_manifest) = user_manifest_path().filter(|p| p.exists()) {
            tracing::debug!("using manifest {}", user_manifest.display());
            return Self::load(&user_manifest);
        }

        Self::builtin()
    }

    /// Archive list of one mirror release: the metadata chunk first, then
    /// package chunks `1..=package_chunks`.
    pub fn mirror_release(base_url: &str, date: &str, package_chunks: usize) -> Result<Self> {
        NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| {
            FetchError::manifest_error(format!("Invalid release date '{date}', expected YYYYMMDD"))
        })?;

        let mut archives = Vec::with_capacity(package_chunks + 1);
        archives.push(format!("mirror-{date}-metadata.tar.gz"));
        archives.extend((1..=package_chunks).map(|i| format!("mirror-{date}-packages-{i}.tar.gz")));

        let manifest = Self {
            base_url: base_url.to_string(),
            archives,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn specs(&self) -> Vec<ArchiveSpec> {
        self.archives
            .iter()
            .map(|name| ArchiveSpec::new(name.clone(), self.base_url.clone()))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(FetchError::manifest_error("Base URL is required"));
        }

        if self.archives.is_empty() {
            return Err(FetchError::manifest_error("At least one archive is required"));
        }

        // Names double as scratch file names.
        for name in &self.archives {
            if name.is_empty()
                || name == "."
                || name == ".."
                || name.contains('/')
                || name.contains('\\')
            {
                return Err(FetchError::manifest_error(format!(
                    "Archive name '{name}' must be a plain file name"
                )));
            }
        }

        Ok(())
    }
}

fn user_manifest_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mirror-fetch").join("manifest.toml"))
}
