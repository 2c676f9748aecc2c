//! Command-line front end for the podcast asset pipelines.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (default on first run) and overlay
//!    secrets from the environment.
//! 3. Build the generation and storage clients from config.
//! 4. Run one audio or image cycle and print the resolved URL.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use podcast_assets::{
    asset::LocalFile,
    config::AppConfig,
    generation::{ApiGenerationClient, GenerationClient, Voice},
    notify::{LogNotifier, Notifier},
    pipeline::{AudioPipeline, ImagePipeline, ImageSource},
    storage::{HttpStorageClient, StorageClient, StorageReference},
};

#[derive(Debug, Parser)]
#[command(name = "podcast-assets", version, about = "Generate and publish podcast audio and thumbnails")]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, env = "PODCAST_ASSETS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate narrated audio from a text prompt.
    Audio {
        /// Narration voice (alloy, echo, fable, onyx, nova, shimmer).
        #[arg(long)]
        voice: Option<Voice>,
        /// Text to narrate.
        prompt: String,
    },
    /// Generate a thumbnail or upload an existing image.
    Image {
        /// Prompt for an AI-generated thumbnail.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        prompt: Option<String>,
        /// Local image to upload as-is.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn print_result(url: &str, storage: Option<StorageReference>) {
    let storage_id = storage.map(|s| s.storage_id).unwrap_or_default();
    println!("url:        {url}");
    println!("storage id: {storage_id}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // 2. Configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    config.apply_env();

    // 3. Clients
    let generation: Arc<dyn GenerationClient> =
        Arc::new(ApiGenerationClient::from_config(&config.generation));
    let storage: Arc<dyn StorageClient> = Arc::new(HttpStorageClient::from_config(&config.storage));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

    // 4. Run
    match cli.command {
        Command::Audio { voice, prompt } => {
            let pipeline = AudioPipeline::new(generation, storage, notifier)
                .with_default_voice(config.generation.default_voice);
            let url = pipeline.generate(&prompt, voice).await?;
            print_result(&url, pipeline.storage_reference());
        }
        Command::Image { prompt, file } => {
            let source = match (prompt, file) {
                (Some(prompt), _) => ImageSource::AiGenerated { prompt },
                (None, Some(path)) => ImageSource::DirectUpload(LocalFile::from_path(path)),
                (None, None) => anyhow::bail!("either --prompt or --file is required"),
            };
            let pipeline = ImagePipeline::new(generation, storage, notifier);
            let url = pipeline.run(source).await?;
            print_result(&url, pipeline.storage_reference());
        }
    }

    Ok(())
}
