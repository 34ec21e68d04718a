//! 基础设施层
//!
//! 持有进程内状态，只暴露能力

pub mod session_store;

pub use session_store::{split_into_chunks, SessionStore, CHUNK_SIZE};
