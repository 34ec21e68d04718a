//! 错误类型
//!
//! 按层划分：会话 / 文本提取 / LLM / 请求 / 配置，统一汇总到 `AppError`。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 会话（分块轮换）错误
    #[error(transparent)]
    Session(#[from] SessionError),
    /// 文件文本提取错误
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// LLM 服务错误
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// 请求参数错误
    #[error(transparent)]
    Request(#[from] RequestError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 会话相关错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 输入文本为空（trim 后）
    #[error("Empty text for session.")]
    EmptyInput,
    /// 分块后没有非空块
    #[error("No non-empty chunks after splitting text.")]
    NoContent,
    /// 会话不存在
    #[error("Session not found.")]
    SessionNotFound,
    /// 会话中没有块（不应出现）
    #[error("No chunks stored for this session.")]
    NoChunks,
}

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// PDF 解析失败
    #[error("无法解析 PDF 文件: {0}")]
    Pdf(String),
    /// DOCX 解析失败
    #[error("无法解析 DOCX 文件: {0}")]
    Docx(String),
    /// 提取任务异常退出
    #[error("文本提取任务失败: {0}")]
    Worker(String),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API 调用失败 (步骤: {step}): {message}")]
    ApiCallFailed { step: String, message: String },
    /// 返回内容为空
    #[error("LLM 返回内容为空 (步骤: {step})")]
    EmptyContent { step: String },
    /// 调用超时
    #[error("LLM 调用超时 (步骤: {step}, {secs} 秒)")]
    Timeout { step: String, secs: u64 },
}

/// 请求参数错误
#[derive(Debug, Error)]
pub enum RequestError {
    /// 缺少字段
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// 字段值不合法
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    /// multipart 解析失败
    #[error("malformed multipart body: {0}")]
    Multipart(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl LlmError {
    /// 创建LLM API调用错误
    pub fn api_failed(step: impl Into<String>, source: impl std::fmt::Display) -> Self {
        LlmError::ApiCallFailed {
            step: step.into(),
            message: source.to_string(),
        }
    }
}

impl RequestError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RequestError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
