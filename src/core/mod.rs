pub mod download;
pub mod fetcher;
pub mod manifest;
pub mod scratch;
