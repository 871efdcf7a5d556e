#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use mirror_fetch::Transport;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Gzip-compressed tar holding `files` at its root.
pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, body) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, body.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Serves archives from memory. Unknown URLs behave like an HTTP 404 with
/// `curl -f`: an error and no file.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for &FakeTransport {
    fn retrieve(&self, url: &str, destination: &Path) -> anyhow::Result<()> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some(body) => {
                std::fs::write(destination, body)?;
                Ok(())
            }
            None => Err(anyhow::anyhow!("404 Not Found: {url}")),
        }
    }
}

pub fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}
