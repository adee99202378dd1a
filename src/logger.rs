//! tracing 初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志输出
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能重复初始化，忽略错误
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
