use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 站点根地址
    pub base_url: String,
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 已投递记录文件
    pub ledger_path: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 失败/跳过报告文件
    pub report_file: String,
    /// 搜索分页最大重试次数
    pub search_max_retries: usize,
    /// 搜索重试退避基数（毫秒）
    pub search_retry_backoff_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 不询问，直接投递所有职位
    pub yes_to_all: bool,
    /// 拒绝投递的职位也写入已投递记录
    pub store_no: bool,
    /// 投递失败的职位也写入已投递记录
    pub record_failed_attempts: bool,
    /// 最多投递数量（None 表示不限）
    pub max_applications: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:48.0) Gecko/20100101 Firefox/48.0"
                .to_string(),
            request_timeout_secs: 30,
            ledger_path: "applied.txt".to_string(),
            output_log_file: "output.txt".to_string(),
            report_file: "report.txt".to_string(),
            search_max_retries: 3,
            search_retry_backoff_ms: 2000,
            verbose_logging: false,
            yes_to_all: false,
            store_no: false,
            record_failed_attempts: true,
            max_applications: None,
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的项使用 `base` 中的值
    pub fn from_env_over(base: Self) -> Self {
        let env = |name: &str| std::env::var(format!("JOB_APPLY_{}", name)).ok();
        Self {
            base_url: env("BASE_URL").unwrap_or(base.base_url),
            user_agent: env("USER_AGENT").unwrap_or(base.user_agent),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()).unwrap_or(base.request_timeout_secs),
            ledger_path: env("LEDGER_PATH").unwrap_or(base.ledger_path),
            output_log_file: env("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
            report_file: env("REPORT_FILE").unwrap_or(base.report_file),
            search_max_retries: env("SEARCH_MAX_RETRIES").and_then(|v| v.parse().ok()).unwrap_or(base.search_max_retries),
            search_retry_backoff_ms: env("SEARCH_RETRY_BACKOFF_MS").and_then(|v| v.parse().ok()).unwrap_or(base.search_retry_backoff_ms),
            verbose_logging: env("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
            yes_to_all: env("YES_TO_ALL").and_then(|v| v.parse().ok()).unwrap_or(base.yes_to_all),
            store_no: env("STORE_NO").and_then(|v| v.parse().ok()).unwrap_or(base.store_no),
            record_failed_attempts: env("RECORD_FAILED_ATTEMPTS").and_then(|v| v.parse().ok()).unwrap_or(base.record_failed_attempts),
            max_applications: env("MAX_APPLICATIONS").and_then(|v| v.parse().ok()).or(base.max_applications),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_over(Self::default())
    }

    /// 从 TOML 字符串解析配置，缺省项使用默认值
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("无法读取配置文件 {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 检查配置是否合法
    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("base_url 无效 ({}): {}", self.base_url, e)))?;
        if self.max_applications == Some(0) {
            return Err(AppError::Config("max_applications 不能为 0".to_string()));
        }
        Ok(())
    }
}
