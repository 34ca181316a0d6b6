pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "pins")]
#[command(about = "Pins CLI - manage pinned documents, links and files")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "PINS_SERVER", default_value = "http://localhost:8000", help = "API base URL")]
    pub server: String,

    #[arg(long, global = true, env = "PINS_TOKEN", hide_env_values = true, help = "Bearer token for the API")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List pinned resources")]
    List,

    #[command(about = "Pin documents, links or files by id")]
    Pin(commands::pins::PinArgs),

    #[command(about = "Unpin a single resource")]
    Unpin(commands::pins::UnpinArgs),

    #[command(about = "Mint a development token signed with JWT_SECRET")]
    Token(commands::token::TokenArgs),

    #[command(about = "Check server health status from API /health endpoint")]
    Health,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = client::PinsClient::new(&cli.server, cli.token.clone())?;

    match cli.command {
        Commands::List => commands::pins::list(&client, output_format).await,
        Commands::Pin(args) => commands::pins::pin(&client, args, output_format).await,
        Commands::Unpin(args) => commands::pins::unpin(&client, args, output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Health => commands::server::health(&client, output_format).await,
    }
}
