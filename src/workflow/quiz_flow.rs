//! 测验生成流程 - 流程层
//!
//! 核心职责：定义"一个文本块 → 双语测验"的完整处理流程
//!
//! 流程顺序：
//! 1. 事实抽取
//! 2. 英文选择题生成
//! 3. 翻译 → 清洗
//!
//! 每一步都是一次阻塞的模型调用，任一步失败整个流程失败，不返回部分结果。

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::LlmError;
use crate::services::{clean_output, ChatModel};
use crate::utils::truncate_text;
use crate::workflow::prompts;
use crate::workflow::quiz_ctx::QuizCtx;

/// 测验生成流程
///
/// - 只依赖 `ChatModel` 能力
/// - 不持有会话状态
pub struct QuizFlow {
    model: Arc<dyn ChatModel>,
    target_language: String,
}

impl QuizFlow {
    pub fn new(model: Arc<dyn ChatModel>, target_language: impl Into<String>) -> Self {
        Self {
            model,
            target_language: target_language.into(),
        }
    }

    /// 生成一份双语测验文本
    pub async fn run(&self, chunk: &str, ctx: &QuizCtx) -> Result<String, LlmError> {
        debug!("{} 文本块预览: {}", ctx, truncate_text(chunk, 80));

        // ========== 步骤 1: 事实抽取 ==========
        info!("{} 🔍 抽取事实...", ctx);
        let facts = self
            .model
            .chat("facts", prompts::FACT_SYSTEM, &prompts::fact_prompt(chunk))
            .await?;

        // ========== 步骤 2: 生成选择题 ==========
        info!("{} ✍️ 生成 {} 道选择题...", ctx, ctx.question_count);
        let english_mcqs = self
            .model
            .chat(
                "mcq",
                prompts::MCQ_SYSTEM,
                &prompts::mcq_prompt(&facts, ctx.question_count, ctx.difficulty),
            )
            .await?;

        // ========== 步骤 3: 翻译 ==========
        info!("{} 🌐 翻译为 {}...", ctx, self.target_language);
        let translated = self
            .model
            .chat(
                "translate",
                &prompts::translation_system(&self.target_language),
                &prompts::translation_prompt(&english_mcqs, &self.target_language),
            )
            .await?;

        info!("{} ✓ 测验生成完成", ctx);

        Ok(clean_output(&translated))
    }
}
