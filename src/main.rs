use anyhow::Result;
use clap::{Parser, Subcommand};
use image_alchemist::ai::openrouter::prompt::DEFAULT_EXPLANATION;
use image_alchemist::app::App;
use image_alchemist::aspect::AspectRatio;
use image_alchemist::gallery::Gallery;
use image_alchemist::models::{Config, GeneratedImage};
use image_alchemist::storage::FileStorage;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "image-alchemist")]
#[command(about = "Transform words into AI art")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rewrite a prompt with richer artistic detail.
    Enhance { prompt: String },
    /// Run a moderation pass over a prompt.
    Sanitize { prompt: String },
    /// Generate one image, or a batch with --batch.
    Generate {
        prompt: String,
        #[arg(long, default_value = "square", value_parser = parse_aspect_arg)]
        aspect: AspectRatio,
        #[arg(long)]
        batch: bool,
        /// Sanitize the prompt before generating.
        #[arg(long)]
        sanitize: bool,
    },
    /// Inspect or clear saved images.
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
    /// Save a gallery image to disk.
    Download {
        id: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List the available aspect ratios.
    Aspects,
}

#[derive(Debug, Subcommand)]
enum GalleryAction {
    List,
    Clear,
}

fn parse_aspect_arg(input: &str) -> std::result::Result<AspectRatio, String> {
    input.parse()
}

fn format_image(image: &GeneratedImage) -> String {
    let spec = image.aspect_ratio.spec();
    format!(
        "{}  {}  {} ({})\n    {}\n    {}",
        image.id,
        image.created_at.format("%b %-d, %H:%M"),
        spec.label,
        spec.display_ratio,
        image.prompt,
        image.url
    )
}

fn print_aspects() {
    for ratio in AspectRatio::ALL {
        let spec = ratio.spec();
        println!(
            "{:<11} {:<14} {:<5} {}",
            ratio.key(),
            spec.label,
            spec.display_ratio,
            spec.remote_size_code
        );
    }
}

fn run_gallery(action: GalleryAction) -> image_alchemist::Result<()> {
    let storage = FileStorage::new(&Config::gallery_dir_from_env());
    let mut gallery = Gallery::open(Box::new(storage));

    match action {
        GalleryAction::List => {
            if gallery.is_empty() {
                println!("No images yet");
            } else {
                println!("Generated Images ({})", gallery.len());
                for image in gallery.images() {
                    println!("{}", format_image(image));
                }
            }
        }
        GalleryAction::Clear => {
            gallery.clear()?;
            println!("Gallery cleared");
        }
    }
    Ok(())
}

async fn run(command: Command) -> image_alchemist::Result<()> {
    // Local-only commands never need credentials or batch settings.
    let command = match command {
        Command::Aspects => {
            print_aspects();
            return Ok(());
        }
        Command::Gallery { action } => return run_gallery(action),
        other => other,
    };

    let config = Config::from_env()?;
    let mut app = App::new(&config);

    match command {
        Command::Enhance { prompt } => {
            let enhancement = app.enhance_prompt(&prompt).await?;
            println!("{}", enhancement.enhanced_prompt);
            println!(
                "\n{}",
                enhancement.explanation.as_deref().unwrap_or(DEFAULT_EXPLANATION)
            );
        }
        Command::Sanitize { prompt } => {
            let sanitized = app.sanitize_prompt(&prompt).await;
            if sanitized == prompt {
                println!("Prompt is already appropriate");
            } else {
                println!("{}", sanitized);
            }
        }
        Command::Generate {
            prompt,
            aspect,
            batch,
            sanitize,
        } => {
            let prompt = if sanitize {
                app.sanitize_prompt(&prompt).await
            } else {
                prompt
            };

            if batch {
                let outcome = app
                    .generate_batch(&prompt, aspect, |progress| {
                        println!(
                            "[{}/{}] {}%",
                            progress.current,
                            progress.total,
                            progress.percent()
                        )
                    })
                    .await?;
                for image in &outcome.images {
                    println!("{}", format_image(image));
                }
                if let Some(warning) = outcome.warning() {
                    println!("{}", warning);
                }
            } else {
                let image = app.generate_single(&prompt, aspect).await?;
                println!("{}", format_image(&image));
            }
        }
        Command::Download { id, out } => {
            let path = app.download(&id, &out).await?;
            println!("{}", path.display());
        }
        Command::Aspects | Command::Gallery { .. } => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_alchemist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    info!("Starting image-alchemist");

    if let Err(e) = run(args.command).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
