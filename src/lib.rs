//! # Job Apply
//!
//! 自动搜索职位并代为投递
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 会话、Cookie、简历），只暴露能力
//! - `SessionContext` - 登录后唯一的会话，所有请求都经过它
//! - `host_format` - 站点页面格式适配，站点改版只影响这里
//!
//! ### ② 业务能力层（Services）
//! - `Authenticator` - 登录
//! - `JobEnumerator` - 分页枚举职位
//! - `Ledger` - 已投递记录
//! - `ReportWriter` - 写 report.txt
//!
//! ### ③ 投递策略（Strategies）
//! - `Dispatcher` - 按渠道标签选择策略
//! - `InApplyStrategy` - 站内投递（上传简历 → 提交）
//! - `OffsiteStrategy` - 站外职位（解析投递地址）
//!
//! ### ④ 流程层 / 编排层
//! - `workflow::ApplyFlow` - "一个职位"的完整处理流程
//! - `orchestrator::App` - 登录、枚举、统计

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod strategies;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{Resume, SessionContext, Transport};
pub use models::{ApplyOutcome, JobPosting, ProviderTag};
pub use orchestrator::{App, ProcessingStats};
pub use strategies::{ApplyStrategy, Dispatcher, StrategyRegistry};
pub use workflow::{ApplyFlow, JobCtx, ProcessResult};
