//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责登录、枚举职位、逐个交给投递流程。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：读取已投递记录、打开简历、登录获取会话
//! 2. **职位枚举**：按页拉取搜索结果，排除已投递和黑名单公司
//! 3. **顺序处理**：一次只处理一个职位，处理完再取下一个
//! 4. **资源管理**：持有会话、已投递记录和简历，整个运行期间只有一份
//! 5. **全局统计**：汇总所有职位的处理结果

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{HttpClient, Resume, SessionContext, Transport};
use crate::services::{
    ApplyConfirmer, Authenticator, AutoConfirm, CredentialPrompt, Credentials, FileLedgerStore,
    JobEnumerator, Ledger, RetryPolicy, SearchFilters, SearchQuery, TerminalPrompt,
};
use crate::strategies::{Dispatcher, StrategyRegistry};
use crate::utils::logging::{append_log_file, init_log_file, log_startup};
use crate::workflow::{ApplyFlow, JobCtx, ProcessResult};

/// 处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total: usize,
    pub applied: usize,
    pub failed: usize,
    pub offsite: usize,
    pub refused: usize,
    pub skipped: usize,
}

impl ProcessingStats {
    fn add(&mut self, result: ProcessResult) {
        self.total += 1;
        match result {
            ProcessResult::Applied => self.applied += 1,
            ProcessResult::Failed => self.failed += 1,
            ProcessResult::Offsite => self.offsite += 1,
            ProcessResult::Refused => self.refused += 1,
            ProcessResult::Skipped => self.skipped += 1,
        }
    }

    /// 投递尝试次数（成功 + 失败）
    pub fn attempts(&self) -> usize {
        self.applied + self.failed
    }
}

/// 应用初始化所需的外部协作者
pub struct Collaborators<'a> {
    pub transport: Box<dyn Transport>,
    pub prompt: &'a dyn CredentialPrompt,
    pub confirmer: Box<dyn ApplyConfirmer>,
    pub ledger: Ledger,
    pub registry: StrategyRegistry,
}

/// 应用主结构
pub struct App {
    config: Config,
    session: SessionContext,
    ledger: Ledger,
    resume: Option<Resume>,
    flow: ApplyFlow,
}

impl App {
    /// 使用真实网络和终端交互初始化应用
    pub async fn initialize(
        config: Config,
        credentials: Credentials,
        resume_path: Option<&Path>,
    ) -> AppResult<Self> {
        let resume = resume_path.map(Resume::open).transpose()?;
        let ledger = Ledger::open(Box::new(FileLedgerStore::new(&config.ledger_path)))?;
        let confirmer: Box<dyn ApplyConfirmer> = if config.yes_to_all {
            Box::new(AutoConfirm)
        } else {
            Box::new(TerminalPrompt)
        };

        let collaborators = Collaborators {
            transport: Box::new(HttpClient::new(&config)?),
            prompt: &TerminalPrompt,
            confirmer,
            ledger,
            registry: StrategyRegistry::standard(),
        };
        Self::initialize_with(config, credentials, resume, collaborators).await
    }

    /// 使用注入的协作者初始化应用（登录在这里完成）
    pub async fn initialize_with(
        config: Config,
        credentials: Credentials,
        resume: Option<Resume>,
        collaborators: Collaborators<'_>,
    ) -> AppResult<Self> {
        if let Err(e) = init_log_file(&config.output_log_file) {
            warn!("⚠️ 无法初始化日志文件 {}: {}", config.output_log_file, e);
        }

        match &resume {
            Some(resume) => info!("📄 简历: {}", resume.file_name()),
            None => info!("📄 未提供简历，站内投递将不附带简历"),
        }

        let authenticator = Authenticator::new(&config.base_url, collaborators.prompt);
        let session = authenticator
            .authenticate(collaborators.transport, credentials)
            .await?;

        let flow = ApplyFlow::new(
            &config,
            Dispatcher::new(collaborators.registry),
            collaborators.confirmer,
        );

        Ok(Self {
            config,
            session,
            ledger: collaborators.ledger,
            resume,
            flow,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// 运行应用主逻辑
    ///
    /// # 参数
    /// - `query`: 搜索条件
    /// - `blacklist`: 公司黑名单（精确匹配）
    pub async fn run(&mut self, query: SearchQuery, blacklist: HashSet<String>) -> AppResult<ProcessingStats> {
        log_startup(&query.keywords, &query.location, self.ledger.len());

        let filters = SearchFilters {
            exclude_ids: self.ledger.snapshot(),
            exclude_companies: blacklist,
        };
        let retry = RetryPolicy {
            max_retries: self.config.search_max_retries,
            backoff_ms: self.config.search_retry_backoff_ms,
        };
        let mut jobs = JobEnumerator::new(&self.session, query, filters, retry);

        let mut stats = ProcessingStats::default();
        while let Some(job) = jobs.next_job().await? {
            let ctx = JobCtx::new(stats.total + 1, job.id);
            let result = self
                .flow
                .run(&self.session, &mut self.ledger, self.resume.as_mut(), &job, &ctx)
                .await?;
            stats.add(result);

            if let Some(max) = self.config.max_applications {
                if stats.attempts() >= max {
                    info!("📌 已达到最多投递数量 {}，停止", max);
                    break;
                }
            }
        }

        print_final_stats(&stats, &self.config);
        Ok(stats)
    }
}

// ========== 日志辅助函数 ==========

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    let lines = [
        format!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("✅ 投递成功: {}/{}", stats.applied, stats.total),
        format!("❌ 投递失败: {}", stats.failed),
        format!("🔗 站外职位: {}", stats.offsite),
        format!("🙅 拒绝: {}", stats.refused),
        format!("⏭ 跳过: {}", stats.skipped),
    ];

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    for line in &lines {
        info!("{}", line);
    }
    info!("{}", "=".repeat(60));

    let mut report = lines.join("\n");
    report.push('\n');
    match append_log_file(&config.output_log_file, &report) {
        Ok(()) => info!("\n日志已保存至: {}", config.output_log_file),
        Err(e) => warn!("⚠️ 写入日志文件失败: {}", e),
    }
}
