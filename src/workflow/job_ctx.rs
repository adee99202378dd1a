//! 职位处理上下文
//!
//! 封装"我正在处理第几个职位"这一信息

use std::fmt::Display;

/// 职位处理上下文
#[derive(Debug, Clone, Copy)]
pub struct JobCtx {
    /// 本次运行中的序号（从1开始，仅用于日志显示）
    pub index: usize,
    pub job_id: u64,
}

impl JobCtx {
    pub fn new(index: usize, job_id: u64) -> Self {
        Self { index, job_id }
    }
}

impl Display for JobCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[第 {} 个 职位ID#{}]", self.index, self.job_id)
    }
}
