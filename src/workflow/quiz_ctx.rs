//! 测验生成上下文
//!
//! 封装"为哪个会话、出几道题、什么难度"这一信息

use std::fmt::Display;

use crate::models::Difficulty;

/// 测验生成上下文
#[derive(Debug, Clone)]
pub struct QuizCtx {
    /// 会话ID（仅用于日志显示）
    pub session_id: String,

    /// 题目数量（>0）
    pub question_count: u32,

    pub difficulty: Difficulty,
}

impl QuizCtx {
    pub fn new(session_id: impl Into<String>, question_count: u32, difficulty: Difficulty) -> Self {
        Self {
            session_id: session_id.into(),
            question_count,
            difficulty,
        }
    }
}

impl Display for QuizCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[会话 {} 题数#{} 难度#{}]",
            self.session_id, self.question_count, self.difficulty
        )
    }
}
