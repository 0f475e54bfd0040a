use anyhow::Result;
use clap::Args;
use kabuka_lib::code::INDEX_ALIAS;
use kabuka_lib::{QuoteService, ServiceConfig};

use crate::output::{print_json, print_quote_table, OutputFormat};

#[derive(Args)]
pub struct QuoteArgs {
    /// Security code, e.g. 7203, 7203.T or ^N225
    #[arg(long, default_value = INDEX_ALIAS)]
    pub code: String,

    /// Verify the upstream TLS certificate
    #[arg(long)]
    pub verify_tls: bool,

    /// Upstream origin, e.g. https://kabutan.jp
    #[arg(long)]
    pub base_url: Option<String>,
}

pub async fn run(args: &QuoteArgs, mut config: ServiceConfig, format: &OutputFormat) -> Result<()> {
    if args.verify_tls {
        config.fetch.verify_tls = true;
    }
    if let Some(base_url) = &args.base_url {
        config.fetch.base_url = base_url.clone();
    }

    let service = QuoteService::with_config(config)?;
    let quote = service.get_quote(&args.code).await;

    match format {
        OutputFormat::Table => print_quote_table(&quote),
        OutputFormat::Json => print_json(&quote),
    }
    Ok(())
}
