//! # Bilingual Quiz
//!
//! 上传文档 → 分块 → 调用 LLM 生成双语选择题（含隐藏答案）的 HTTP 服务
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有进程内状态，只暴露能力
//! - `SessionStore` - 会话 → 文本块序列，提供不重复的分块轮换
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 单次模型调用能力（实现 `ChatModel`）
//! - `text_extractor` - txt / pdf / docx 文本提取
//! - `quiz_cleaner` - 输出清洗与标题规范化
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文本块"的完整处理流程
//! - `QuizCtx` - 上下文封装（session_id + 题数 + 难度）
//! - `QuizFlow` - 流程编排（事实抽取 → 出题 → 翻译 → 清洗）
//!
//! ### ④ 接口层（API）
//! - `api/` - `/generate` 与 `/generate_again`
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::SessionStore;
pub use models::{Difficulty, QuizItem};
pub use services::{ChatModel, LlmService};
pub use utils::logging as logger;
pub use workflow::{QuizCtx, QuizFlow};
