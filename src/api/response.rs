//! 响应体与错误 → HTTP 状态映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::error::{AppError, SessionError};
use crate::models::QuizItem;

/// 无法提取文本时返回给用户的提示
pub const EMPTY_TEXT_MESSAGE: &str = "Nepavyko išgauti teksto iš failo.";

/// `/generate` 与 `/generate_again` 的响应
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub quiz: String,
    pub session_id: Option<String>,
    pub items: Vec<QuizItem>,
}

impl QuizResponse {
    /// 文本为空时的兜底响应（不建会话，不调模型）
    pub fn empty_text() -> Self {
        Self {
            quiz: EMPTY_TEXT_MESSAGE.to_string(),
            session_id: None,
            items: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Session(SessionError::SessionNotFound | SessionError::NoChunks) => {
                (StatusCode::NOT_FOUND, "Session not found or expired.".to_string())
            }
            AppError::Session(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Extract(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Request(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Llm(e) => {
                error!("❌ 测验生成失败: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Quiz generation failed.".to_string(),
                )
            }
            AppError::Config(e) => {
                error!("❌ 配置错误: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        if status.is_client_error() {
            warn!(status = status.as_u16(), "⚠️ 请求失败: {}", self);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
