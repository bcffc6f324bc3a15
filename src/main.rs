// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use shutter::DestinationSelection;
use shutter::pipelines::photo::EncodingQuality;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "shutter")]
#[command(about = "Camera preview and photo capture with selectable destinations")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the output destinations
    Destinations {
        /// Destination shown as selected
        #[arg(short, long, default_value_t = DestinationSelection::LocalFile)]
        destination: DestinationSelection,
    },

    /// Take photos with the synthetic camera
    Capture {
        /// Where photos are written
        #[arg(short, long, default_value_t = DestinationSelection::LocalFile)]
        destination: DestinationSelection,

        /// Number of captures triggered back to back
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Directory holding files/, cache/ and media/ (default: platform data dir)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Bind the front camera instead of the back one
        #[arg(long)]
        front: bool,

        /// Serve this image instead of the test pattern
        #[arg(long)]
        source_image: Option<PathBuf>,

        /// JPEG quality preset
        #[arg(short, long, value_enum, default_value_t = Quality::High)]
        quality: Quality,

        /// Simulate the user refusing the camera permission
        #[arg(long, conflicts_with = "check_devices")]
        deny_permission: bool,

        /// Grant the camera only if a /dev/video* node is accessible
        #[arg(long)]
        check_devices: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Quality {
    Low,
    Medium,
    High,
    Maximum,
}

impl From<Quality> for EncodingQuality {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Low => EncodingQuality::Low,
            Quality::Medium => EncodingQuality::Medium,
            Quality::High => EncodingQuality::High,
            Quality::Maximum => EncodingQuality::Maximum,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=shutter=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Destinations { destination } => cli::list_destinations(destination),
        Commands::Capture {
            destination,
            count,
            root,
            front,
            source_image,
            quality,
            deny_permission,
            check_devices,
        } => cli::capture(cli::CaptureArgs {
            destination,
            count,
            root,
            front,
            source_image,
            quality: quality.into(),
            deny_permission,
            check_devices,
        }),
    }
}
