use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slidesketch_core::{Config, OpenAiBackend};
use tracing_subscriber::EnvFilter;

mod image;
mod output;

use output::ColorMode;

/// Sketch to Slide - Turn a photo of a hand-drawn slide into a clean outline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a slide outline from an image file
    Extract {
        /// Path to the image (.png, .jpg, .jpeg, .gif or .webp)
        image_path: PathBuf,

        /// Model identifier (overrides MODEL)
        #[arg(long)]
        model: Option<String>,

        /// OpenAI API key (overrides OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Base URL of the chat-completions API (overrides OPENAI_API_BASE)
        #[arg(long)]
        api_base: Option<String>,

        /// Request timeout in seconds (overrides OPENAI_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the slide as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Config => {
            let config = Config::load();
            output::print_config(&mut std::io::stdout(), &config)?;
            Ok(())
        }
        Command::Extract {
            image_path,
            model,
            api_key,
            api_base,
            timeout,
            json,
            no_color,
        } => {
            // Resolve configuration: CLI flags > env vars > config files > defaults
            let mut config = Config::load();
            if let Some(key) = api_key {
                config.api_key = Some(key);
            }
            if let Some(model) = model {
                config.model = model;
            }
            if let Some(base) = api_base {
                config.api_base = base;
            }
            if timeout.is_some() {
                config.timeout_secs = timeout;
            }
            extract(image_path, config, json, no_color).await
        }
    }
}

async fn extract(
    image_path: PathBuf,
    config: Config,
    json: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    let data_url = image::data_url_from_path(&image_path)?;
    let backend = OpenAiBackend::from_config(&config);

    let slide = slidesketch_core::extract_slide(Some(&data_url), &config, &backend).await?;

    let mut stdout = std::io::stdout();
    if json {
        output::print_slide_json(&mut stdout, &slide)?;
    } else {
        output::print_slide(&mut stdout, &slide, ColorMode(!no_color))?;
    }
    stdout.flush()?;
    Ok(())
}
