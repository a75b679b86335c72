use clap::{Parser, Subcommand};
use folio_ingest::ingest::{IngestResponse, Pipeline, handle_upload};
use folio_ingest::types::{Category, UploadedImage};
use folio_ingest::{config, output};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "folio-ingest")]
#[command(about = "Center-crop and store portfolio images")]
#[command(long_about = "\
Center-crop and store portfolio images

Every upload is cropped around its center to the aspect ratio of its
category's target size, resized to exactly that size, and written to
<upload_root>/<category>/<sanitized-name>. The printed path
(uploads/<category>/<name>) is what the content database stores.

Layout:

  static/uploads/
  ├── projects/          # 450x350 by default
  └── clients/           # 450x350 by default

Only .png, .jpg, .jpeg and .gif uploads are accepted. Re-uploading a file
with the same name replaces the stored image.

Run 'folio-ingest gen-config' to generate a documented ingest.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "ingest.toml", global = true)]
    config: PathBuf,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct IngestArgs {
    /// Destination category
    #[arg(long, value_enum)]
    category: Category,

    /// Print one JSON response per file instead of the summary
    #[arg(long)]
    json: bool,

    /// Image files to ingest
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Create the upload root and category folders
    Init,
    /// Crop, resize, and store images into a category
    Ingest(IngestArgs),
    /// Load and validate the config, print effective settings
    CheckConfig,
    /// Print a stock ingest.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Init => {
            let config = config::load_config(&cli.config)?;
            let pipeline = Pipeline::new(config);
            pipeline.store().ensure_layout()?;
            println!("==> Upload layout ready: {}", pipeline.store().root().display());
        }
        Command::Ingest(args) => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);
            let pipeline = Pipeline::new(config);
            pipeline.store().ensure_layout()?;

            let results: Vec<(String, IngestResponse)> = args
                .files
                .par_iter()
                .map(|path| {
                    let upload = read_upload(path);
                    let response = handle_upload(&pipeline, args.category, upload.as_ref());
                    (path.display().to_string(), response)
                })
                .collect();

            if args.json {
                for (_, response) in &results {
                    println!("{}", serde_json::to_string(response)?);
                }
            } else {
                let target = pipeline.config().target_size(args.category);
                output::print_ingest_results(args.category, target, &results);
            }

            let failed = results.iter().filter(|(_, r)| !r.success).count();
            if failed > 0 {
                return Err(format!("{failed} of {} uploads failed", results.len()).into());
            }
        }
        Command::CheckConfig => {
            println!("==> Checking {}", cli.config.display());
            let config = config::load_config(&cli.config)?;
            output::print_config(&config);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "folio_ingest=debug".to_string()
        } else {
            "folio_ingest=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Read a file from disk as if it arrived in a multipart form field.
///
/// An unreadable file is treated like a missing file field.
fn read_upload(path: &Path) -> Option<UploadedImage> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    match std::fs::read(path) {
        Ok(data) => Some(UploadedImage::new(filename, data)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read upload");
            None
        }
    }
}
