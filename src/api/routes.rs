//! HTTP 路由
//!
//! - `POST /generate`：上传文件 → 建会话 → 取块 → 生成
//! - `POST /generate_again`：已有会话 → 取下一块 → 生成

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::api::form::FormFields;
use crate::api::response::QuizResponse;
use crate::error::{AppResult, ExtractError, RequestError};
use crate::infrastructure::SessionStore;
use crate::models::parse_quiz;
use crate::services::extract_text;
use crate::workflow::{QuizCtx, QuizFlow};

/// 请求处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub flow: Arc<QuizFlow>,
    pub verbose_logging: bool,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>, flow: Arc<QuizFlow>) -> Self {
        Self {
            store,
            flow,
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }
}

/// 构建路由
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/generate_again", post(generate_again))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 首次生成
async fn generate(
    State(state): State<AppState>,
    req: Request,
) -> AppResult<Json<QuizResponse>> {
    let mut form = FormFields::read(req).await?;
    let file = form.take_file()?;
    let question_count = form.question_count()?;
    let difficulty = form.difficulty();

    info!(
        filename = %file.filename,
        size = file.bytes.len(),
        question_count,
        %difficulty,
        "📄 收到文件"
    );

    let content = tokio::task::spawn_blocking(move || extract_text(&file.filename, &file.bytes))
        .await
        .map_err(|e| ExtractError::Worker(e.to_string()))??;

    // 空文本直接返回提示，避免浪费一次模型调用
    if content.trim().is_empty() {
        warn!("⚠️ 未能从文件中提取到文本");
        return Ok(Json(QuizResponse::empty_text()));
    }

    let session_id = state.store.create(&content)?;
    let chunk = state.store.draw(&session_id)?;

    let ctx = QuizCtx::new(session_id, question_count, difficulty);
    run_pipeline(&state, &chunk, ctx).await
}

/// 同一会话再次生成
async fn generate_again(
    State(state): State<AppState>,
    req: Request,
) -> AppResult<Json<QuizResponse>> {
    let form = FormFields::read(req).await?;
    let session_id = form.require("session_id")?.trim().to_string();
    let question_count = form.question_count()?;
    let difficulty = form.difficulty();

    if session_id.is_empty() {
        return Err(RequestError::invalid("session_id", "must not be empty").into());
    }

    let chunk = state.store.draw(&session_id)?;

    let ctx = QuizCtx::new(session_id, question_count, difficulty);
    run_pipeline(&state, &chunk, ctx).await
}

async fn run_pipeline(
    state: &AppState,
    chunk: &str,
    ctx: QuizCtx,
) -> AppResult<Json<QuizResponse>> {
    let quiz = state.flow.run(chunk, &ctx).await?;
    let items = parse_quiz(&quiz);

    if items.len() != ctx.question_count as usize {
        warn!(
            "{} ⚠️ 解析出 {} 道题，期望 {} 道",
            ctx,
            items.len(),
            ctx.question_count
        );
    }
    if state.verbose_logging {
        info!("{} 生成结果:\n{}", ctx, quiz);
    }

    Ok(Json(QuizResponse {
        quiz,
        session_id: Some(ctx.session_id),
        items,
    }))
}
