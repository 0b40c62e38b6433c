mod commands;
mod store;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringcrop", about = "Circular profile photo cropper")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image dimensions and how it fits a container
    Info(commands::info::InfoArgs),
    /// Crop an image into a circular profile picture
    Crop(commands::crop::CropArgs),
    /// List previously cropped originals
    Gallery(commands::gallery::GalleryArgs),
    /// Render an original again from its saved crop
    Rerender(commands::rerender::RerenderArgs),
    /// Print or save the default cropper config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Crop(args) => commands::crop::run(args),
        Commands::Gallery(args) => commands::gallery::run(args),
        Commands::Rerender(args) => commands::rerender::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
