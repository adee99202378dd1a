//! 站外职位
//!
//! 不提交任何申请，只从职位详情页解析出站外投递地址交给操作者

use async_trait::async_trait;
use tracing::warn;

use crate::error::AppResult;
use crate::infrastructure::host_format;
use crate::infrastructure::{Resume, SessionContext};
use crate::models::{ApplyOutcome, JobPosting};
use crate::strategies::ApplyStrategy;

/// 站外投递策略
#[derive(Debug, Default, Clone, Copy)]
pub struct OffsiteStrategy;

impl OffsiteStrategy {
    /// 解析站外投递地址，页面中没有或链接无效时退回职位详情页地址
    pub async fn resolve_url(&self, session: &SessionContext, job: &JobPosting) -> AppResult<String> {
        let response = session.transport().get(&job.detail_url, &[]).await?;
        if !response.is_success() {
            warn!("⚠️ 职位详情页返回状态码 {}: {}", response.status, job);
            return Ok(job.detail_url.clone());
        }

        let link = match host_format::extract_external_apply_link(&response.body) {
            Some(link) => link,
            None => {
                warn!("⚠️ 职位详情页中没有站外投递链接: {}", job);
                return Ok(job.detail_url.clone());
            }
        };

        match host_format::resolve_offsite_url(&link, &job.detail_url) {
            Ok(url) => Ok(url),
            Err(e) => {
                warn!("⚠️ 站外投递链接无效 ({}): {} {}", e, link, job);
                Ok(job.detail_url.clone())
            }
        }
    }
}

#[async_trait]
impl ApplyStrategy for OffsiteStrategy {
    fn name(&self) -> &'static str {
        "offsite"
    }

    async fn apply(
        &self,
        session: &SessionContext,
        job: &JobPosting,
        _resume: Option<&mut Resume>,
    ) -> AppResult<ApplyOutcome> {
        let url = self.resolve_url(session, job).await?;
        Ok(ApplyOutcome::offsite(url))
    }
}
