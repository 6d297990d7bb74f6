pub mod api_key;
pub mod cli;
pub mod harness_config;
pub mod payload;

use crate::config::harness_config::HarnessConfig;
use clap::Parser;

/// 主程式的命令列參數。TOML 設定檔先載入,這裡的旗標再逐項覆蓋。
#[derive(Debug, Clone, Parser)]
#[command(name = "gemini-probe")]
#[command(about = "Probe harness for the Gemini function-calling loop")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Narrow payload selection to filenames containing this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Log full request/response payloads at debug instead of info
    #[arg(long)]
    pub quiet: bool,

    /// Directory holding fn-*.json payload files
    #[arg(long)]
    pub payload_dir: Option<String>,

    /// Model to probe, e.g. gemini-2.5-flash-preview-05-20
    #[arg(long)]
    pub model: Option<String>,

    /// Iteration ceiling for the function-calling loop
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Directory for session transcripts
    #[arg(long)]
    pub output_path: Option<String>,

    /// Skip writing the session transcript
    #[arg(long)]
    pub no_transcript: bool,

    /// File holding the API key
    #[arg(long)]
    pub key_file: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// 把命令列旗標覆蓋到載入的設定上。
    pub fn apply_to(&self, config: &mut HarnessConfig) {
        if let Some(filter) = &self.filter {
            config.payloads.filter = Some(filter.clone());
        }
        if let Some(dir) = &self.payload_dir {
            config.payloads.dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.api.model = model.clone();
        }
        if let Some(max_iterations) = self.max_iterations {
            config.session.max_iterations = max_iterations;
        }
        if let Some(output_path) = &self.output_path {
            config.output.dir = output_path.clone();
        }
        if let Some(key_file) = &self.key_file {
            config.api.key_file = key_file.clone();
        }
        if self.quiet {
            config.session.log_payloads = false;
        }
        if self.no_transcript {
            config.output.write_transcript = false;
        }
    }
}
