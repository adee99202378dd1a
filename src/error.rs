use thiserror::Error;

/// 应用程序错误类型
///
/// 分为两类：
/// - 致命错误：登录失败、站点页面格式变化、会话不完整，直接终止本次运行
/// - 单个职位错误：跳过当前职位，继续枚举下一个
#[derive(Debug, Error)]
pub enum AppError {
    /// 登录失败（状态码非 200，或响应体中 status 为 fail）
    #[error("登录失败: {reason}")]
    Authentication { reason: String },

    /// 登录页缺少防伪令牌字段
    #[error("登录页中找不到令牌字段: {field}")]
    TokenExtraction { field: String },

    /// 简历上传回执无法解析（站点格式可能已变化）
    #[error("无法解析简历上传回执: {reason}")]
    ResumeReceiptParse { reason: String },

    /// 站点返回的数据结构与预期不符
    #[error("站点数据格式异常 ({endpoint}): {reason}")]
    HostFormat { endpoint: String, reason: String },

    /// 会话缺少必要的 Cookie
    #[error("会话缺少 Cookie: {name}")]
    MissingSessionCookie { name: String },

    /// 该投递策略需要简历，但没有提供
    #[error("投递职位 {job_id} 需要简历，但未提供")]
    MissingResume { job_id: u64 },

    /// 未知的工作经验等级（调用方输入错误）
    #[error("未知的工作经验等级: {0}")]
    UnknownExperienceLevel(String),

    /// 网络请求失败
    #[error("网络请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 搜索分页重试耗尽
    #[error("搜索请求失败，已重试 {attempts} 次: {last_error}")]
    SearchRetriesExhausted { attempts: usize, last_error: String },

    /// 已投递记录读写失败
    #[error("已投递记录读写失败 ({path}): {source}")]
    Ledger {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 交互输入失败
    #[error("交互输入失败: {0}")]
    Prompt(String),

    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件读写失败
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// URL 解析失败
    #[error("URL解析失败: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        AppError::Transport {
            endpoint,
            source: Box::new(err),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建网络请求失败错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建站点格式错误
    pub fn host_format(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::HostFormat {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// 是否为致命错误（需要终止整个运行）
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::MissingResume { .. } | AppError::Transport { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
