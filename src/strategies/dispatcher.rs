//! 投递分发
//!
//! 渠道标签 → 策略 的映射在启动时显式构建，再注入 `Dispatcher`

use std::collections::HashMap;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{Resume, SessionContext};
use crate::models::{ApplyOutcome, JobPosting, ProviderTag};
use crate::strategies::{ApplyStrategy, InApplyStrategy, OffsiteStrategy};

/// 策略注册表
///
/// 未注册的标签一律交给兜底策略
pub struct StrategyRegistry {
    strategies: HashMap<String, Box<dyn ApplyStrategy>>,
    fallback: Box<dyn ApplyStrategy>,
}

impl StrategyRegistry {
    pub fn new(fallback: Box<dyn ApplyStrategy>) -> Self {
        Self {
            strategies: HashMap::new(),
            fallback,
        }
    }

    /// 内置注册表：站内投递 + 站外兜底
    pub fn standard() -> Self {
        Self::new(Box::new(OffsiteStrategy)).register(ProviderTag::IN_APPLY_KEY, Box::new(InApplyStrategy))
    }

    pub fn register(mut self, key: impl Into<String>, strategy: Box<dyn ApplyStrategy>) -> Self {
        self.strategies.insert(key.into(), strategy);
        self
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    /// 根据渠道标签选择策略
    pub fn resolve(&self, tag: &ProviderTag) -> &dyn ApplyStrategy {
        self.strategies
            .get(tag.key())
            .map(|strategy| strategy.as_ref())
            .unwrap_or_else(|| self.fallback.as_ref())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// 投递分发器
pub struct Dispatcher {
    registry: StrategyRegistry,
}

impl Dispatcher {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// 为职位选择策略并投递
    pub async fn dispatch(
        &self,
        session: &SessionContext,
        job: &JobPosting,
        resume: Option<&mut Resume>,
    ) -> AppResult<ApplyOutcome> {
        let strategy = self.registry.resolve(&job.provider);
        debug!("{} 使用策略 {}", job, strategy.name());

        if strategy.requires_resume() && resume.is_none() {
            return Err(AppError::MissingResume { job_id: job.id });
        }

        strategy.apply(session, job, resume).await
    }
}
