use clap::Parser;
use gemini_probe::config::api_key::load_api_key;
use gemini_probe::text::scenarios::{build_scenario_request, pick_scenario};
use gemini_probe::utils::{logger, validation::Validate};
use gemini_probe::{GeminiClient, HarnessConfig};
use std::time::Duration;

/// One-shot generation probe: random scenario prompts, no tools.
#[derive(Parser)]
#[command(name = "generate-content")]
#[command(about = "Probe generateContent with built-in scenario prompts")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of probes to run
    #[arg(long, default_value = "3")]
    count: usize,

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

    let mut rng = rand::thread_rng();

    for probe in 1..=args.count {
        let (instruction, prompt) = pick_scenario(&mut rng);
        tracing::info!("🔁 Probe {} of {}", probe, args.count);
        tracing::debug!("System instruction: {}", instruction);

        let request = build_scenario_request(instruction, prompt);
        let response = client.generate_content(&request).await?;

        println!("📝 Prompt: {}", prompt);
        match response.first_text() {
            Some(text) => println!("✅ Response: {}\n", text),
            None => println!("⚠️ Could not extract a text response.\n"),
        }
    }

    Ok(())
}
