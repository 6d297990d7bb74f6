use crate::utils::error::{ProbeError, Result};
use crate::utils::validation::{
    self, validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 探測工具的 TOML 設定。每個欄位都有預設值,設定檔可以只寫要覆蓋的部分。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub api: ApiConfig,
    pub payloads: PayloadConfig,
    pub session: SessionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    pub key_file: String,
    pub key_env: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            key_file: ".google-gemini-apikey".to_string(),
            key_env: "GEMINI_API_KEY".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// 放置 fn-*.json 酬載檔的目錄
    pub dir: String,
    /// 以檔名子字串縮小選擇範圍
    pub filter: Option<String>,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            dir: "config".to_string(),
            filter: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 函式呼叫迴圈的迭代上限
    pub max_iterations: usize,
    /// 是否完整記錄每次的請求/回應 JSON
    pub log_payloads: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            log_payloads: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub write_transcript: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "./output".to_string(),
            write_transcript: true,
        }
    }
}

impl HarnessConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProbeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProbeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_non_empty_string("api.model", &self.api.model)?;
        validate_non_empty_string("api.key_file", &self.api.key_file)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validate_path("payloads.dir", &self.payloads.dir)?;
        validate_positive_number("session.max_iterations", self.session.max_iterations, 1)?;
        validate_path("output.dir", &self.output.dir)?;
        Ok(())
    }
}

impl validation::Validate for HarnessConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
