//! LLM 服务 - 业务能力层
//!
//! 只负责"调用一次模型"这一能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// 对话模型抽象
///
/// 流程层只依赖这个 trait，测试中用脚本化的假模型替换。
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// 发送一轮 system + user 消息，返回去除首尾空白的回复
    ///
    /// `step` 仅用于日志和错误信息
    async fn chat(&self, step: &str, system: &str, user: &str) -> Result<String, LlmError>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 OpenAI 兼容接口
/// - 每次调用只发一次请求，不重试
/// - 可选的单次调用超时
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    timeout: Option<Duration>,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            timeout: (config.llm_timeout_secs > 0)
                .then(|| Duration::from_secs(config.llm_timeout_secs)),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn send_to_llm(&self, step: &str, system: &str, user: &str) -> Result<String, LlmError> {
        debug!(step, model = %self.model_name, "调用 LLM API");
        debug!(step, "用户消息长度: {} 字符", user.chars().count());

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system)
            .build()
            .map_err(|e| LlmError::api_failed(step, e))?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user)
            .build()
            .map_err(|e| LlmError::api_failed(step, e))?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| LlmError::api_failed(step, e))?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!(step, "LLM API 调用失败: {}", e);
            LlmError::api_failed(step, e)
        })?;

        debug!(step, "LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                step: step.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl ChatModel for LlmService {
    async fn chat(&self, step: &str, system: &str, user: &str) -> Result<String, LlmError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send_to_llm(step, system, user))
                .await
                .map_err(|_| LlmError::Timeout {
                    step: step.to_string(),
                    secs: limit.as_secs(),
                })?,
            None => self.send_to_llm(step, system, user).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_disabled_by_default() {
        let service = LlmService::new(&Config::default());
        assert!(service.timeout.is_none());
        assert_eq!(service.model_name(), "gpt-4.1-mini");
    }

    #[test]
    fn test_timeout_from_config() {
        let config = Config {
            llm_timeout_secs: 30,
            ..Config::default()
        };
        let service = LlmService::new(&config);
        assert_eq!(service.timeout, Some(Duration::from_secs(30)));
    }

    /// 测试通用 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// OPENAI_API_KEY=... cargo test test_send_to_llm_simple -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_simple() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = LlmService::new(&Config::from_env());
        let result = service
            .chat("smoke", "Answer in one short sentence.", "What is the capital of Lithuania?")
            .await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(!response.is_empty());
            }
            Err(e) => panic!("测试失败: {}", e),
        }
    }
}
