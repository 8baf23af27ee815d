use albumdo_core::{Config, LogLevel, PhotoLibrary};
use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "albumdo")]
#[command(about = "Browse, rate and trash local photos")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the images under a root, newest first, with their ratings
    Scan {
        /// Photo root
        root: PathBuf,
    },

    /// Rate an image with 1 to 3 stars
    Rate {
        path: PathBuf,

        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        stars: u8,
    },

    /// Show the rating of an image
    Rating { path: PathBuf },

    /// Remove the rating of an image
    Clear { path: PathBuf },

    /// Move an image of the library to the trash
    Delete {
        /// Photo root
        root: PathBuf,

        /// Position in the library (0 = newest)
        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Render directory cover tiles as PNG files
    Tiles {
        /// Photo root
        root: Option<PathBuf>,

        /// Output directory for the covers
        #[arg(long, default_value = "covers")]
        out: PathBuf,

        /// Render the rating buckets instead of a photo root
        #[arg(long)]
        ratings: bool,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "albumdo.json")]
        path: PathBuf,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::default(),
    };

    // Set log level based on verbosity
    config.log_level = match cli.verbose {
        0 => config.log_level,
        1 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };

    match &cli.log_dir {
        Some(dir) => albumdo_core::logging::init_logger(dir, config.log_level)
            .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?,
        None => env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_env(albumdo_core::logging::LOG_ENV_VAR)
            .init(),
    }

    match cli.command {
        Commands::Scan { root } => {
            let mut library = PhotoLibrary::new(config)?;
            let len = library.load_library(&root)?;
            println!("{} images in {}", len, library.library_root().display());
            for (i, record) in library.index().records().iter().enumerate() {
                let stars = library
                    .current_rating(&record.path)?
                    .map(|r| r.stars())
                    .unwrap_or_default();
                println!("{:>5}  {:<3}  {}", i, stars, record.path.display());
            }
            Ok(())
        }

        Commands::Rate { path, stars } => {
            let mut library = PhotoLibrary::new(config)?;
            let rating = library.rate(&path, stars)?;
            println!("{}  {}", rating.stars(), path.display());
            Ok(())
        }

        Commands::Rating { path } => {
            let library = PhotoLibrary::new(config)?;
            match library.current_rating(&path)? {
                Some(rating) => println!("{}  {}", rating.stars(), path.display()),
                None => println!("unrated  {}", path.display()),
            }
            Ok(())
        }

        Commands::Clear { path } => {
            let mut library = PhotoLibrary::new(config)?;
            match library.clear_rating(&path)? {
                Some(previous) => println!("Cleared {} from {}", previous.stars(), path.display()),
                None => println!("{} was not rated", path.display()),
            }
            Ok(())
        }

        Commands::Delete { root, index } => {
            let mut library = PhotoLibrary::new(config)?;
            library.load_library(&root)?;
            library.jump_to_image(index)?;
            let entry = library.delete_current()?;
            println!(
                "Moved {} to {}",
                entry.original.display(),
                entry.trashed.display()
            );
            if let Some(previous) = entry.cleared_rating {
                println!("Cleared rating {}", previous.stars());
            }
            Ok(())
        }

        Commands::Tiles { root, out, ratings } => {
            let library = PhotoLibrary::new(config)?;
            let tiles = if ratings {
                library.list_rating_tiles()?
            } else {
                let root = root.context("A photo root is required unless --ratings is given")?;
                library.list_directory_tiles(&root)?
            };
            write_tiles(&tiles, &out)
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

fn write_tiles(tiles: &[albumdo_core::DirectoryTile], out: &Path) -> Result<(), anyhow::Error> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let progress_bar = ProgressBar::new(tiles.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    for (i, tile) in tiles.iter().enumerate() {
        let name = format!("{:03}-{}.png", i, albumdo_core::ratings::flatten_path(&tile.directory));
        let target = out.join(name);
        tile.cover
            .image
            .save(&target)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        progress_bar.set_message(tile.label().replace('\n', " "));
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message("done");
    info!("Wrote {} covers to {}", tiles.len(), out.display());
    Ok(())
}
