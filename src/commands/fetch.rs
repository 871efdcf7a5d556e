use crate::core::download::{CurlTransport, Transport};
use crate::core::fetcher::{ArchiveFetcher, FetchJob};
use crate::core::manifest::Manifest;
use crate::error::{FetchError, Result};
use crate::utils::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct FetchOptions {
    pub output_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub base_url: Option<String>,
    pub release: Option<String>,
    pub package_chunks: Option<usize>,
    pub scratch_root: Option<PathBuf>,
    pub curl: Option<PathBuf>,
}

/// Resolves the manifest, then applies `--base-url` and `--release`.
pub fn effective_manifest(options: &FetchOptions) -> Result<Manifest> {
    let mut manifest = Manifest::resolve(options.manifest.as_deref())?;

    if let Some(base_url) = &options.base_url {
        manifest = manifest.with_base_url(base_url.clone());
    }

    match (&options.release, options.package_chunks) {
        (Some(date), Some(chunks)) => {
            manifest = Manifest::mirror_release(&manifest.base_url, date, chunks)?;
        }
        (None, None) => {}
        _ => {
            return Err(FetchError::manifest_error(
                "--release and --package-chunks must be given together",
            ))
        }
    }

    manifest.validate()?;
    Ok(manifest)
}

pub fn print_manifest(options: &FetchOptions) -> Result<()> {
    let manifest = effective_manifest(options)?;
    print!("{}", manifest.to_toml()?);
    Ok(())
}

pub fn fetch_mirror(options: &FetchOptions) -> Result<()> {
    let transport = match &options.curl {
        Some(curl) => CurlTransport::with_binary(curl),
        None => CurlTransport::new().map_err(|e| FetchError::TransportUnavailable {
            message: e.to_string(),
        })?,
    };
    fetch_mirror_with(options, transport)
}

/// Runs the fetch with an explicit transport and reports the resulting layout.
pub fn fetch_mirror_with<T: Transport>(options: &FetchOptions, transport: T) -> Result<()> {
    let manifest = effective_manifest(options)?;
    let output_dir = fs::output_dir_or_cwd(options.output_dir.as_deref())?;

    let mut job = FetchJob::new(manifest.specs(), &output_dir);
    if let Some(scratch_root) = &options.scratch_root {
        job = job.with_scratch_root(scratch_root);
    }

    println!(
        "Fetching {} archive(s) from {}",
        job.specs.len(),
        manifest.base_url
    );

    ArchiveFetcher::new(transport).fetch(&job)?;

    println!();
    println!("Mirror unpacked into {}:", output_dir.display());
    for entry in fs::list_top_level(&output_dir)? {
        println!("  {entry}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest_file(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("manifest.toml");
        std::fs::write(
            &path,
            "base_url = \"https://example.org/r\"\narchives = [\"a.tar.gz\"]\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_base_url_override() {
        let temp = tempfile::tempdir().unwrap();
        let options = FetchOptions {
            manifest: Some(manifest_file(temp.path())),
            base_url: Some("https://mirror.example.net".to_string()),
            ..Default::default()
        };

        let manifest = effective_manifest(&options).unwrap();
        assert_eq!(manifest.base_url, "https://mirror.example.net");
        assert_eq!(manifest.archives, vec!["a.tar.gz".to_string()]);
    }

    #[test]
    fn test_release_replaces_archive_list() {
        let temp = tempfile::tempdir().unwrap();
        let options = FetchOptions {
            manifest: Some(manifest_file(temp.path())),
            release: Some("20240101".to_string()),
            package_chunks: Some(1),
            ..Default::default()
        };

        let manifest = effective_manifest(&options).unwrap();
        assert_eq!(manifest.base_url, "https://example.org/r");
        assert_eq!(
            manifest.archives,
            vec![
                "mirror-20240101-metadata.tar.gz".to_string(),
                "mirror-20240101-packages-1.tar.gz".to_string(),
            ]
        );
    }

    #[test]
    fn test_release_requires_chunk_count() {
        let temp = tempfile::tempdir().unwrap();
        let options = FetchOptions {
            manifest: Some(manifest_file(temp.path())),
            release: Some("20240101".to_string()),
            ..Default::default()
        };

        assert!(effective_manifest(&options).is_err());
    }
}
