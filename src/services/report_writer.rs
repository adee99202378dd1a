//! 报告写入服务 - 业务能力层
//!
//! 只负责"写 report.txt"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::models::JobPosting;

/// 报告写入服务
///
/// 职责：
/// - 将投递失败或被跳过的职位写入 report.txt
/// - 只处理单个职位
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    /// 写入一条报告
    ///
    /// # 参数
    /// - `job`: 职位
    /// - `reason`: 原因
    pub fn write(&self, job: &JobPosting, reason: &str) -> Result<()> {
        debug!("写入报告: 职位 {} | 原因: {}", job.id, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)?;

        let line = format!(
            "{} | 职位 {} | {} @ {} | {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            job.id,
            job.title,
            job.company,
            job.detail_url,
            reason
        );

        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::with_path("report.txt")
    }
}
