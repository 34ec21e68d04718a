//! API 模块
//!
//! 负责对外的 HTTP 接口

pub mod form;
pub mod response;
pub mod routes;

// 重新导出常用类型
pub use response::{QuizResponse, EMPTY_TEXT_MESSAGE};
pub use routes::{router, AppState};
