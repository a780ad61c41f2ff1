use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use lotto_lib::{AppContext, Game, config};

#[derive(Parser, Debug)]
#[command(name = "lotto-live", about = "Fetch and store Taiwan lottery draw results")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one live fetch and print the draws as JSON
    Fetch,
    /// Fetch, merge into the local snapshot and save it
    Sync,
    /// Print stored draws for one game
    Show {
        #[arg(long)]
        game: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("🎰 Let's fetch some lottery draws.");

    let mut ctx = AppContext::new(config)?;

    match args.command {
        Command::Fetch => {
            let live = ctx.fetch().await;
            println!("{}", serde_json::to_string_pretty(&live)?);
        }
        Command::Sync => {
            let merged = ctx.sync().await?;
            let counts: serde_json::Map<_, _> = merged
                .iter()
                .map(|(game, draws)| (game.display_name().to_string(), json!(draws.len())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        Command::Show { game, limit } => {
            let game = Game::from_name(&game).ok_or_else(|| anyhow!("Unknown game: {}", game))?;
            let draws = ctx.stored_draws(game, Some(limit))?;
            if draws.is_empty() {
                println!("⚠ No stored draws for {}", game);
            }
            for draw in draws {
                let numbers = draw
                    .numbers
                    .iter()
                    .map(|n| format!("{:02}", n))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("No. {} | {} | {}", draw.period, draw.date, numbers);
            }
        }
    }

    Ok(())
}
