//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (登录 → 枚举职位 → 统计)
//!     ↓
//! workflow::ApplyFlow (处理单个职位)
//!     ↓
//! strategies (站内投递 / 站外职位)
//!     ↓
//! services (登录 / 枚举 / 记录 / 交互)
//!     ↓
//! infrastructure (HTTP 会话、Cookie、简历)
//! ```
//!
//! 只有编排层持有会话、已投递记录和简历，下层只借用

pub mod app;

pub use app::{App, Collaborators, ProcessingStats};
