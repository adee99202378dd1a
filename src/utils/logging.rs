use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n投递日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加内容
pub fn append_log_file(log_file_path: &str, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `keywords`: 搜索关键词
/// - `location`: 搜索地点
/// - `excluded`: 已投递记录数量
pub fn log_startup(keywords: &str, location: &str, excluded: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 职位搜索与投递");
    info!("🔍 关键词: {} | 地点: {}", keywords, location);
    info!("📋 已投递记录: {} 条", excluded);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
