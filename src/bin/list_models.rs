use clap::Parser;
use gemini_probe::config::api_key::load_api_key;
use gemini_probe::utils::{logger, validation::Validate};
use gemini_probe::{GeminiClient, HarnessConfig};
use std::time::Duration;

/// Lists the models the API makes available.
#[derive(Parser)]
#[command(name = "list-models")]
#[command(about = "List the models available on the Gemini v1beta API")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Print the full listing as pretty JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => match HarnessConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => HarnessConfig::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let api_key = load_api_key(&config.api)?;
    let client = GeminiClient::new(
        &config.api.base_url,
        &config.api.model,
        api_key,
        Duration::from_secs(config.api.timeout_seconds),
    )?;

    tracing::info!("📡 Listing models from {}", config.api.base_url);
    let list = client.list_models().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for model in &list.models {
        match &model.display_name {
            Some(display_name) => println!("{} - {}", model.name, display_name),
            None => println!("{}", model.name),
        }
    }
    println!("✅ {} model(s) available", list.models.len());

    Ok(())
}
