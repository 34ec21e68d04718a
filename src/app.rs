use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{router, AppState};
use crate::config::Config;
use crate::infrastructure::SessionStore;
use crate::services::LlmService;
use crate::utils::logging::log_startup;
use crate::workflow::QuizFlow;

/// 应用主结构
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 OPENAI_API_KEY / LLM_API_KEY，模型调用将会失败");
        }

        let store = Arc::new(SessionStore::with_chunk_size(config.chunk_size));
        info!("📦 会话分块大小: {} 字符", store.chunk_size());
        let llm = Arc::new(LlmService::new(&config));
        let flow = Arc::new(QuizFlow::new(llm, config.target_language.clone()));

        let state = AppState::new(store, flow).with_verbose_logging(config.verbose_logging);

        Ok(Self { config, state })
    }

    /// 运行 HTTP 服务，直到收到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听地址: {}", self.config.bind_addr))?;

        info!("✓ 服务已启动: http://{}", listener.local_addr()?);

        let app = router(self.state, self.config.max_upload_bytes);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
}
