use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 默认配置文件路径（可用 QUIZ_CONFIG 覆盖）
pub const DEFAULT_CONFIG_FILE: &str = "quiz.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 每个文本块的最大字符数
    pub chunk_size: usize,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    /// 单次 LLM 调用超时（秒），0 表示不限制
    pub llm_timeout_secs: u64,
    /// 翻译目标语言
    pub target_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            chunk_size: 9500,
            max_upload_bytes: 25 * 1024 * 1024,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4.1-mini".to_string(),
            llm_temperature: 0.3,
            llm_timeout_secs: 0,
            target_language: "Lithuanian".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：配置文件（可选）+ 环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("QUIZ_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.merge_env())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 仅从环境变量读取
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    fn merge_env(self) -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(self.bind_addr),
            chunk_size: std::env::var("CHUNK_SIZE").ok().and_then(|v| v.parse().ok()).filter(|&n| n > 0).unwrap_or(self.chunk_size),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_upload_bytes),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            llm_api_key: std::env::var("OPENAI_API_KEY").or_else(|_| std::env::var("LLM_API_KEY")).unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.llm_temperature),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.llm_timeout_secs),
            target_language: std::env::var("TARGET_LANGUAGE").unwrap_or(self.target_language),
        }
    }
}
