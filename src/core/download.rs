use anyhow::Result;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use tar::Archive;

const USER_AGENT: &str = concat!("mirror-fetch/", env!("CARGO_PKG_VERSION"));

/// Retrieves a single URL into a file.
///
/// Implementations follow redirects and must not leave a file at
/// `destination` when the server answers with an HTTP error.
pub trait Transport {
    fn retrieve(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Transport backed by the `curl` executable.
pub struct CurlTransport {
    curl: PathBuf,
}

impl CurlTransport {
    /// Looks `curl` up on `PATH`.
    pub fn new() -> Result<Self> {
        let curl = which::which("curl")
            .map_err(|e| anyhow::anyhow!("curl is required but was not found on PATH: {e}"))?;
        Ok(Self { curl })
    }

    pub fn with_binary(curl: impl Into<PathBuf>) -> Self {
        Self { curl: curl.into() }
    }
}

impl Transport for CurlTransport {
    fn retrieve(&self, url: &str, destination: &Path) -> Result<()> {
        tracing::debug!("GET {url} -> {}", destination.display());

        let output = Command::new(&self.curl)
            .arg("-L") // Follow redirects
            .arg("-s") // Silent
            .arg("-S") // ...but still report errors
            .arg("-f") // No body on HTTP errors
            .arg("-A")
            .arg(USER_AGENT)
            .arg("-o")
            .arg(destination)
            .arg(url)
            .output()?;

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "curl exited with status {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(())
    }
}

/// Unpacks a gzip-compressed tar archive into `destination`, overwriting
/// existing files.
pub fn extract_tar_gz(archive_path: &Path, destination: &Path) -> std::io::Result<()> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);
    archive.set_overwrite(true);
    archive.unpack(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn write_archive(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, body) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, body.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_merges_and_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let out = temp.path().join("out");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("keep.txt"), "untouched").unwrap();

        let first = temp.path().join("first.tar.gz");
        let second = temp.path().join("second.tar.gz");
        write_archive(&first, &[("mirror/a.txt", "one")]);
        write_archive(&second, &[("mirror/a.txt", "two"), ("mirror/b.txt", "b")]);

        extract_tar_gz(&first, &out).unwrap();
        extract_tar_gz(&second, &out).unwrap();

        assert_eq!(std::fs::read_to_string(out.join("mirror/a.txt")).unwrap(), "two");
        assert_eq!(std::fs::read_to_string(out.join("mirror/b.txt")).unwrap(), "b");
        assert_eq!(std::fs::read_to_string(out.join("keep.txt")).unwrap(), "untouched");
    }

    #[test]
    fn test_extract_rejects_corrupt_gzip() {
        let temp = tempfile::tempdir().unwrap();
        let bogus = temp.path().join("bogus.tar.gz");
        std::fs::write(&bogus, b"definitely not gzip").unwrap();

        assert!(extract_tar_gz(&bogus, temp.path()).is_err());
    }

    #[test]
    fn test_missing_curl_binary_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let transport = CurlTransport::with_binary(temp.path().join("no-such-curl"));
        let dest = temp.path().join("a.tar.gz");

        assert!(transport.retrieve("http://127.0.0.1:9/a.tar.gz", &dest).is_err());
        assert!(!dest.exists());
    }
}
