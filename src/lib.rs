//! Mirror Fetch Library
//!
//! Downloads the release archives of a package mirror into a scratch
//! directory and unpacks them over an output directory.

pub mod commands;
pub mod core;
pub mod error;
pub mod logging;
pub mod utils;

pub use crate::core::download::{CurlTransport, Transport};
pub use crate::core::fetcher::{ArchiveFetcher, FetchJob};
pub use crate::core::manifest::{ArchiveSpec, Manifest};
pub use crate::error::{FetchError, Result};
