use clap::Parser;
use gemini_probe::config::api_key::load_api_key;
use gemini_probe::config::payload::PayloadStore;
use gemini_probe::domain::ports::Storage;
use gemini_probe::tools::builtin_registry;
use gemini_probe::utils::{logger, validation::Validate};
use gemini_probe::{CliConfig, GeminiClient, HarnessConfig, LocalStorage, ToolCallSession};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting gemini-probe function-calling session");

    // 載入 TOML 配置(未指定時使用預設值)
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match HarnessConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => HarnessConfig::default(),
    };

    // 應用命令列覆蓋設定
    cli.apply_to(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let api_key = load_api_key(&config.api)?;

    // 選擇酬載並代換佔位符
    let store = PayloadStore::new(&config.payloads.dir);
    let mut rng = rand::thread_rng();
    let selected = store.select(config.payloads.filter.as_deref(), &mut rng)?;

    let client = GeminiClient::new(
        &config.api.base_url,
        &config.api.model,
        api_key,
        Duration::from_secs(config.api.timeout_seconds),
    )?;

    let session = ToolCallSession::new(client, builtin_registry())
        .with_max_iterations(config.session.max_iterations)
        .with_payload_logging(config.session.log_payloads);

    let report = session.run(selected.request).await?;

    // 總結輸出
    println!(
        "📝 Initial prompt: {}",
        report
            .initial_prompt
            .as_deref()
            .unwrap_or("<no user text in payload>")
    );
    match &report.final_text {
        Some(text) => println!("✅ Final response: {}", text),
        None => println!("⚠️ Could not extract the model's final response."),
    }
    println!(
        "📊 {} iteration(s), {} tool invocation(s), stopped: {:?}",
        report.iterations,
        report.invocations.len(),
        report.stop
    );

    // 寫入逐字稿
    if config.output.write_transcript {
        let transcript = report.transcript_value(
            selected.path.to_str(),
            &config.api.model,
        );
        let storage = LocalStorage::new(config.output.dir.clone());
        let filename = report.transcript_filename();
        storage
            .write_file(&filename, serde_json::to_string_pretty(&transcript)?.as_bytes())
            .await?;
        tracing::info!("💾 Transcript saved to: {}/{}", config.output.dir, filename);
    }

    Ok(())
}
