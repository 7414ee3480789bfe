//! `gleam-pkg` - maintains the Gleam release-hash manifest.
//!
//! Two independent pipelines, one per subcommand:
//!
//! - `fetch` lists the upstream releases, hashes every supported archive
//!   and writes `gleam_hashes.json`.
//! - `readme` renders `README.md` from that manifest and a template.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gleam_core::config::{
    DEFAULT_MANIFEST_PATH, DEFAULT_NIGHTLY_BASE_URL, DEFAULT_PACKAGE_PREFIX, DEFAULT_README_PATH,
    DEFAULT_RELEASES_URL, DEFAULT_TEMPLATE_PATH,
};
use gleam_core::{FetchConfig, ReadmeConfig};
use tracing_subscriber::EnvFilter;

/// Command-line interface.
#[derive(Parser)]
#[command(name = "gleam-pkg", version)]
#[command(about = "Gleam release-hash manifest maintainer", long_about = None)]
struct Cli {
    /// Pipeline to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available pipelines.
#[derive(Subcommand)]
enum Commands {
    /// Fetch releases, hash their archives and write the manifest
    Fetch {
        /// Releases listing endpoint
        #[arg(long, env = "GLEAM_RELEASES_URL", default_value = DEFAULT_RELEASES_URL)]
        releases_url: String,
        /// Download base of the nightly archives
        #[arg(long, env = "GLEAM_NIGHTLY_BASE_URL", default_value = DEFAULT_NIGHTLY_BASE_URL)]
        nightly_base_url: String,
        /// Skip the nightly entry
        #[arg(long)]
        no_nightly: bool,
        /// Output path for the manifest
        #[arg(short, long, env = "GLEAM_MANIFEST", default_value = DEFAULT_MANIFEST_PATH)]
        output: PathBuf,
        /// Program used to prefetch and hash archives
        #[arg(long, env = "GLEAM_NIX_PROGRAM", default_value = "nix")]
        nix_program: PathBuf,
    },
    /// Render the README from the manifest
    Readme {
        /// Manifest to read
        #[arg(short, long, env = "GLEAM_MANIFEST", default_value = DEFAULT_MANIFEST_PATH)]
        manifest: PathBuf,
        /// Handlebars template
        #[arg(short, long, env = "GLEAM_README_TEMPLATE", default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,
        /// Output path for the rendered README
        #[arg(short, long, default_value = DEFAULT_README_PATH)]
        output: PathBuf,
        /// Prefix of generated package names
        #[arg(long, default_value = DEFAULT_PACKAGE_PREFIX)]
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Fetch {
            releases_url,
            nightly_base_url,
            no_nightly,
            output,
            nix_program,
        } => {
            let config = FetchConfig {
                releases_url,
                nightly_base_url: (!no_nightly).then_some(nightly_base_url),
                manifest_path: output,
                nix_program,
            };
            gleam_core::indexer::generate_manifest(&config).await?;
        }
        Commands::Readme {
            manifest,
            template,
            output,
            prefix,
        } => {
            let config = ReadmeConfig {
                manifest_path: manifest,
                template_path: template,
                output_path: output,
                package_prefix: prefix,
            };
            gleam_core::readme::generate_readme(&config)?;
        }
    }

    Ok(())
}
