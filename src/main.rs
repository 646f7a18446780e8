use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wiregen::PipelineConfig;

#[derive(Parser)]
#[command(name = "wiregen", version, about = "Turn wireframe sketches into HTML prototypes")]
struct Cli {
    /// Directory for intermediate and final artifacts
    #[arg(long, default_value = "files", global = true)]
    files_dir: PathBuf,

    /// Plain-text file holding the API key on its first line
    #[arg(long, default_value = "gemini_key.txt", global = true)]
    key_file: PathBuf,

    /// Hosted model identifier
    #[arg(long, default_value = wiregen::gemini::DEFAULT_MODEL, global = true)]
    model: String,

    /// Base URL of the model endpoint
    #[arg(long, default_value = wiregen::gemini::DEFAULT_API_BASE, global = true)]
    api_base: String,

    /// HTTP timeout for model calls, in milliseconds
    #[arg(long, default_value_t = 60_000, global = true)]
    timeout_ms: u64,

    /// Containment tolerance in pixels for the hierarchy builder
    #[arg(long, default_value_t = 2.0, global = true)]
    tolerance: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline on a wireframe image
    Generate {
        /// Path to the wireframe image (JPEG or PNG)
        image: PathBuf,

        /// Override the detection prompt with a file
        #[arg(long)]
        detection_prompt: Option<PathBuf>,

        /// Override the generation prompt with a file
        #[arg(long)]
        generation_prompt: Option<PathBuf>,
    },

    /// Rebuild the layout document from an existing raw detection file
    Hierarchy,

    /// Revise the generated HTML with a free-text instruction
    Feedback {
        /// The instruction text
        instruction: Option<String>,

        /// Read the instruction from a file instead
        #[arg(long, conflicts_with = "instruction")]
        file: Option<PathBuf>,

        /// Override the feedback prompt with a file
        #[arg(long)]
        feedback_prompt: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig {
        files_dir: cli.files_dir,
        key_file: cli.key_file,
        model: cli.model,
        api_base: cli.api_base,
        timeout_ms: cli.timeout_ms,
        tolerance: cli.tolerance,
        ..Default::default()
    };

    match cli.command {
        Command::Generate {
            image,
            detection_prompt,
            generation_prompt,
        } => {
            config.image_path = image;
            config.detection_prompt = detection_prompt;
            config.generation_prompt = generation_prompt;
            let html = wiregen::run(&config)?;
            println!("Prototype written to {}", html.display());
        }
        Command::Hierarchy => {
            let layout = wiregen::run_hierarchy(&config)?;
            println!("Layout document written to {}", layout.display());
        }
        Command::Feedback {
            instruction,
            file,
            feedback_prompt,
        } => {
            config.feedback_prompt = feedback_prompt;
            let text = match (instruction, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read instruction file {}", path.display()))?,
                (None, None) => anyhow::bail!("provide an instruction or --file"),
            };
            let html = wiregen::run_feedback(&config, &text)?;
            println!("Revised HTML written to {}", html.display());
        }
    }

    Ok(())
}
