use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use mirror_fetch::{commands, core, logging};

#[derive(Parser)]
#[clap(name = "mirror-fetch")]
#[clap(about = "Download package mirror archives and unpack them into a directory")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory to unpack the mirror into (default: current directory)
    output_dir: Option<PathBuf>,
    /// Manifest listing the archives to fetch
    #[clap(long)]
    manifest: Option<PathBuf>,
    /// Base URL the archives are served under
    #[clap(long)]
    base_url: Option<String>,
    /// Fetch the archives of this mirror release (YYYYMMDD)
    #[clap(long, requires = "package_chunks")]
    release: Option<String>,
    /// Number of package chunks in the release
    #[clap(long, requires = "release")]
    package_chunks: Option<usize>,
    /// Where to create the scratch directory (default: system temp dir)
    #[clap(long)]
    scratch_root: Option<PathBuf>,
    /// curl binary to download with
    #[clap(long)]
    curl: Option<PathBuf>,
    /// Print the effective manifest and exit
    #[clap(long)]
    print_manifest: bool,
    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let options = commands::fetch::FetchOptions {
        output_dir: cli.output_dir,
        manifest: cli.manifest,
        base_url: cli.base_url,
        release: cli.release,
        package_chunks: cli.package_chunks,
        scratch_root: cli.scratch_root,
        curl: cli.curl,
    };

    let result = if cli.print_manifest {
        commands::fetch::print_manifest(&options).map_err(|e| anyhow::anyhow!(e))
    } else {
        core::scratch::install_interrupt_cleanup()
            .and_then(|()| commands::fetch::fetch_mirror(&options).map_err(|e| anyhow::anyhow!(e)))
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
