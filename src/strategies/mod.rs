//! 投递策略
//!
//! 每种投递渠道一个策略，由 `Dispatcher` 根据职位的渠道标签选择
//!
//! ```text
//! Dispatcher
//!     ├── "InApply"  → InApplyStrategy（上传简历 → 提交申请）
//!     └── 其他标签    → OffsiteStrategy（只解析站外投递地址）
//! ```

pub mod dispatcher;
pub mod in_apply;
pub mod offsite;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::infrastructure::{Resume, SessionContext};
use crate::models::{ApplyOutcome, JobPosting};

pub use dispatcher::{Dispatcher, StrategyRegistry};
pub use in_apply::InApplyStrategy;
pub use offsite::OffsiteStrategy;

/// 投递策略
#[async_trait]
pub trait ApplyStrategy: Send + Sync {
    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;

    /// 没有简历时是否无法投递
    fn requires_resume(&self) -> bool {
        false
    }

    /// 投递单个职位
    ///
    /// 网络错误体现在返回的 `ApplyOutcome` 中；返回 `Err` 表示站点格式或会话出了问题
    async fn apply(
        &self,
        session: &SessionContext,
        job: &JobPosting,
        resume: Option<&mut Resume>,
    ) -> AppResult<ApplyOutcome>;
}
