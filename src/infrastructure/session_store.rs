//! 会话存储 - 基础设施层
//!
//! 持有"会话 ID → 文本块序列 + 未使用块索引"的映射，提供分块轮换能力。
//!
//! ## 轮换规则
//! - 每次 `draw` 从未使用索引中均匀随机取一个并移除
//! - 未使用索引耗尽后，下一次 `draw` 先重置为全集再抽取
//! - 因此任意连续 N 次（N = 块数）抽取恰好覆盖每个块一次
//!
//! ## 并发约定
//! 单进程内存存储，进程退出即丢失。映射和随机源在同一把锁内，
//! 同一会话上的并发 `draw` 会被串行化。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;

/// 默认分块大小（字符数）
pub const CHUNK_SIZE: usize = 9500;

/// 单个文档的会话记录
#[derive(Debug)]
struct Session {
    chunks: Vec<String>,
    remaining: Vec<usize>,
    created_at: DateTime<Local>,
}

struct Inner {
    sessions: HashMap<String, Session>,
    rng: Box<dyn RngCore + Send>,
}

/// 会话存储
///
/// 在进程启动时创建一次，通过 `Arc` 注入到请求处理器中。
pub struct SessionStore {
    chunk_size: usize,
    inner: Mutex<Inner>,
}

impl SessionStore {
    /// 使用默认分块大小和系统熵随机源创建
    pub fn new() -> Self {
        Self::with_chunk_size(CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self::with_rng(chunk_size, StdRng::from_entropy())
    }

    /// 注入随机源（测试中使用固定种子）
    pub fn with_rng(chunk_size: usize, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            inner: Mutex::new(Inner {
                sessions: HashMap::new(),
                rng: Box::new(rng),
            }),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// 切分文本并创建新会话，返回会话 ID
    pub fn create(&self, full_text: &str) -> Result<String, SessionError> {
        if full_text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let chunks: Vec<String> = split_into_chunks(full_text, self.chunk_size)
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string)
            .collect();

        if chunks.is_empty() {
            return Err(SessionError::NoContent);
        }

        let session_id = Uuid::new_v4().to_string();
        let chunk_count = chunks.len();
        let session = Session {
            remaining: (0..chunk_count).collect(),
            chunks,
            created_at: Local::now(),
        };

        self.lock().sessions.insert(session_id.clone(), session);

        info!(
            session_id = %session_id,
            chunks = chunk_count,
            chars = full_text.chars().count(),
            "✓ 会话已创建"
        );

        Ok(session_id)
    }

    /// 从会话中取一个本轮尚未使用的块
    pub fn draw(&self, session_id: &str) -> Result<String, SessionError> {
        let mut guard = self.lock();
        let Inner { sessions, rng } = &mut *guard;

        let session = sessions
            .get_mut(session_id)
            .ok_or(SessionError::SessionNotFound)?;

        if session.chunks.is_empty() {
            return Err(SessionError::NoChunks);
        }

        // 一轮结束，重新开始
        if session.remaining.is_empty() {
            debug!(session_id, "所有块均已使用，重置轮换");
            session.remaining = (0..session.chunks.len()).collect();
        }

        let pick = rng.gen_range(0..session.remaining.len());
        let idx = session.remaining.swap_remove(pick);

        debug!(
            session_id,
            chunk = idx,
            left = session.remaining.len(),
            age_secs = (Local::now() - session.created_at).num_seconds(),
            "抽取文本块"
        );

        Ok(session.chunks[idx].clone())
    }

    /// 会话中的块数量
    pub fn chunk_count(&self, session_id: &str) -> Option<usize> {
        self.lock().sessions.get(session_id).map(|s| s.chunks.len())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // 锁内没有会被 panic 打断的多步不变量，中毒后直接继续使用
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 按字符数把文本切成连续的定长片段（最后一段可能较短）
///
/// 纯长度切分，可能在单词中间断开。
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (byte_idx, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(&text[start..byte_idx]);
            start = byte_idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
