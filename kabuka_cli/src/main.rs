mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kabuka_lib::ServiceConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "kabuka")]
#[command(about = "Fetch Japanese stock quotes from kabutan, with synthetic fallback")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "json", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a quote by security code
    Quote(commands::quote::QuoteArgs),
    /// Append an event to the tracking log
    Track(commands::track::TrackArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kabuka=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "table" => OutputFormat::Table,
        _ => OutputFormat::Json,
    };

    let config = ServiceConfig::from_env();

    match &cli.command {
        Commands::Quote(args) => commands::quote::run(args, config, &format).await?,
        Commands::Track(args) => commands::track::run(args, &config)?,
    }

    Ok(())
}
