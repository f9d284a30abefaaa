//! Look up one part from the command line and print it as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use semiconductor_part_lookup::{
    CredentialProvider, NoCredentialProvider, PartLookupAdapter, TerminalPrompt,
};
use semiconductor_utils::{build_env_filter, AppConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "fetch-part", version, about = "Fetch Digi-Key part information")]
struct Args {
    /// Manufacturer or Digi-Key part number
    #[arg(default_value = "RMCF0402JT10K0")]
    part_number: String,

    /// Use the Digi-Key sandbox API
    #[arg(long)]
    sandbox: bool,

    /// Directory holding the credential and token files
    #[arg(long, value_name = "DIR")]
    storage_path: Option<PathBuf>,

    /// Fail instead of prompting when credentials are missing
    #[arg(long)]
    non_interactive: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    // stdout carries the JSON document
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter("warn"))
        .with_writer(std::io::stderr)
        .init();

    if args.sandbox {
        config.digikey.sandbox = true;
    }
    if let Some(storage_path) = args.storage_path {
        config.digikey.storage_path = storage_path;
    }

    let provider: Arc<dyn CredentialProvider> = if args.non_interactive {
        Arc::new(NoCredentialProvider)
    } else {
        Arc::new(TerminalPrompt)
    };
    let adapter = PartLookupAdapter::new(&config.digikey, provider)?;

    match adapter.lookup(&args.part_number).await {
        Ok(record) => {
            // serde_json::Value keeps object keys sorted
            let value = serde_json::to_value(&record)?;
            let json = serde_json::to_string_pretty(&value).context("rendering part record")?;
            println!("{}", json);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Lookup failed: {} ({})", e, e.error_code());
            Ok(ExitCode::FAILURE)
        }
    }
}
