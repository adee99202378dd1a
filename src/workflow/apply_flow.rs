//! 职位处理流程 - 流程层
//!
//! 核心职责：定义"一个职位"的完整处理流程
//!
//! 流程顺序：
//! 1. 已投递 → 跳过
//! 2. 展示职位 → 询问是否投递（拒绝时按配置写入记录）
//! 3. 分发到投递策略
//! 4. 写入已投递记录 / report.txt

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::host_format::html_to_text;
use crate::infrastructure::{Resume, SessionContext};
use crate::models::{ApplyOutcome, JobPosting};
use crate::services::{ApplyConfirmer, Ledger, ReportWriter};
use crate::strategies::Dispatcher;
use crate::utils::logging::truncate_text;
use crate::workflow::job_ctx::JobCtx;

/// 职位处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 站内投递成功
    Applied,
    /// 站内投递失败
    Failed,
    /// 站外职位，已给出投递地址
    Offsite,
    /// 操作者拒绝投递
    Refused,
    /// 跳过（已投递过，或缺少简历等单个职位错误）
    Skipped,
}

impl ProcessResult {
    /// 是否算作一次投递尝试
    pub fn is_attempt(self) -> bool {
        matches!(self, ProcessResult::Applied | ProcessResult::Failed)
    }
}

/// 职位处理流程
///
/// - 决定何时询问、何时投递、何时写记录
/// - 不持有会话和简历，只借用
pub struct ApplyFlow {
    dispatcher: Dispatcher,
    confirmer: Box<dyn ApplyConfirmer>,
    report_writer: ReportWriter,
    store_no: bool,
    record_failed_attempts: bool,
}

impl ApplyFlow {
    pub fn new(config: &Config, dispatcher: Dispatcher, confirmer: Box<dyn ApplyConfirmer>) -> Self {
        Self {
            dispatcher,
            confirmer,
            report_writer: ReportWriter::with_path(config.report_file.clone()),
            store_no: config.store_no,
            record_failed_attempts: config.record_failed_attempts,
        }
    }

    pub async fn run(
        &self,
        session: &SessionContext,
        ledger: &mut Ledger,
        resume: Option<&mut Resume>,
        job: &JobPosting,
        ctx: &JobCtx,
    ) -> AppResult<ProcessResult> {
        if ledger.contains(job.id) {
            info!("{} 已处理过，跳过", ctx);
            return Ok(ProcessResult::Skipped);
        }

        self.log_job(ctx, job);

        // ========== 询问 ==========
        if !self.confirmer.confirm(job)? {
            if self.store_no {
                ledger.record(job.id)?;
                info!("{} 已拒绝，写入记录", ctx);
            } else {
                info!("{} 已拒绝", ctx);
            }
            return Ok(ProcessResult::Refused);
        }

        // ========== 投递 ==========
        let outcome = match self.dispatcher.dispatch(session, job, resume).await {
            Ok(outcome) => outcome,
            Err(e) if !e.is_fatal() => {
                warn!("{} ⚠️ 跳过: {}", ctx, e);
                self.write_report(job, &e.to_string());
                return Ok(ProcessResult::Skipped);
            }
            Err(e) => {
                error!("{} ❌ 无法继续: {}", ctx, e);
                return Err(e);
            }
        };

        self.finish(ledger, job, ctx, &outcome)
    }

    /// 根据投递结果写记录
    fn finish(
        &self,
        ledger: &mut Ledger,
        job: &JobPosting,
        ctx: &JobCtx,
        outcome: &ApplyOutcome,
    ) -> AppResult<ProcessResult> {
        if let Some(url) = &outcome.external_url {
            info!("{} 🔗 站外投递地址: {}", ctx, url);
            ledger.record(job.id)?;
            return Ok(ProcessResult::Offsite);
        }

        if outcome.success {
            info!("{} ✓ 投递成功 (状态码 {:?})", ctx, outcome.status);
            ledger.record(job.id)?;
            return Ok(ProcessResult::Applied);
        }

        let reason = match outcome.status {
            Some(status) => format!("投递失败 (状态码 {})", status),
            None => "投递中断".to_string(),
        };
        warn!("{} ⚠️ {}", ctx, reason);
        self.write_report(job, &reason);

        // 失败的投递同样写入记录，下次运行不会再尝试
        if self.record_failed_attempts {
            ledger.record(job.id)?;
        }
        Ok(ProcessResult::Failed)
    }

    fn write_report(&self, job: &JobPosting, reason: &str) {
        if let Err(e) = self.report_writer.write(job, reason) {
            warn!("⚠️ 写入 report.txt 失败: {}", e);
        }
    }

    // ========== 日志辅助方法 ==========

    /// 展示职位信息
    fn log_job(&self, ctx: &JobCtx, job: &JobPosting) {
        info!("{} title: {}", ctx, job.title);
        info!("{} company: {}", ctx, job.company);
        info!(
            "{} description: {}",
            ctx,
            truncate_text(&html_to_text(&job.description), 300)
        );
        info!("{} 渠道: {}", ctx, job.provider);
    }
}
