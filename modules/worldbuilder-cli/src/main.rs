use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use worldbuilder_core::{load_config, World, WorldConfig, WorldExplorer, WorldGenerator};

#[derive(Parser)]
#[command(name = "worldbuilder", about = "Generate a fictional world and ask questions about it")]
struct Cli {
    /// Path to config TOML file (falls back to WORLDBUILDER_* env vars)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model name, overriding the config
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature between 0 and 1, overriding the config
    #[arg(long)]
    temperature: Option<f32>,

    /// Log full prompts and raw model output
    #[arg(long)]
    debug: bool,

    /// What kind of world to build
    #[arg(long)]
    brief: Option<String>,

    /// Explore a previously saved world instead of generating one
    #[arg(long, conflicts_with = "brief")]
    world: Option<PathBuf>,

    /// Write the generated world to this path as JSON
    #[arg(long)]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for the world and answers
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("worldbuilder_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!(config = %path.display(), "Loading config");
            load_config(path)?
        }
        None => WorldConfig::from_env()?,
    };
    if let Some(model) = cli.model.clone() {
        config = config.with_model(model);
    }
    if let Some(temperature) = cli.temperature {
        anyhow::ensure!(
            (0.0..=1.0).contains(&temperature),
            "--temperature must be between 0 and 1, got {temperature}"
        );
        config = config.with_temperature(temperature);
    }
    if cli.debug {
        config = config.with_debug_mode(true);
    }
    config.log_redacted();

    let backend = config.backend();

    let world = match &cli.world {
        Some(path) => load_world(path)?,
        None => {
            let generator = WorldGenerator::new(backend.clone(), config.clone());
            match cli.brief.as_deref() {
                Some(brief) => generator.generate_from(brief).await?,
                None => generator.generate().await?,
            }
        }
    };

    if let Some(path) = &cli.save {
        std::fs::write(path, world.to_pretty_json())
            .with_context(|| format!("Failed to write world to {}", path.display()))?;
        info!(path = %path.display(), "World saved");
    }

    println!("{world}\n");

    let Some(explorer) = WorldExplorer::create(Some(Arc::new(world)), backend, config) else {
        return Ok(());
    };

    explore(&explorer).await
}

fn load_world(path: &Path) -> Result<World> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read world file: {}", path.display()))?;
    let world: World = serde_json::from_str(&content)
        .with_context(|| format!("Invalid world file: {}", path.display()))?;
    info!(planet = world.planet(), "Loaded saved world");
    Ok(world)
}

async fn explore(explorer: &WorldExplorer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!(
        "Ask anything about {}. Commands: /history, /reset, exit",
        explorer.world().planet()
    );

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();

        match question {
            "" => continue,
            "exit" | "quit" => break,
            "/history" => {
                for (i, turn) in explorer.history().iter().enumerate() {
                    println!("[{}] Q: {}\n    A: {}", i + 1, turn.question, turn.answer);
                }
            }
            "/reset" => {
                explorer.clear_history();
                println!("History cleared.");
            }
            _ => match explorer.ask(question).await {
                Ok(answer) => println!("\n{answer}\n"),
                Err(e) => eprintln!("error: {e}"),
            },
        }
    }

    Ok(())
}
