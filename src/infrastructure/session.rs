//! 会话上下文
//!
//! 登录成功后创建，整个运行期间只有这一份，所有请求都经过它

use crate::error::{AppError, AppResult};
use crate::infrastructure::transport::Transport;

/// 会话 Cookie 名称，其值即投递时的 csrfToken
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// 登录页中的三个防伪令牌
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginTokens {
    pub login_csrf_param: String,
    pub csrf_token: String,
    pub source_alias: String,
}

impl LoginTokens {
    /// 表单中使用的字段名
    pub const FIELDS: [&'static str; 3] = ["loginCsrfParam", "csrfToken", "sourceAlias"];

    pub fn as_form(&self) -> Vec<(String, String)> {
        vec![
            ("loginCsrfParam".to_string(), self.login_csrf_param.clone()),
            ("csrfToken".to_string(), self.csrf_token.clone()),
            ("sourceAlias".to_string(), self.source_alias.clone()),
        ]
    }
}

/// 会话上下文
///
/// 持有传输能力（含 Cookie 罐）和登录令牌，不做持久化
pub struct SessionContext {
    transport: Box<dyn Transport>,
    base_url: String,
    tokens: LoginTokens,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    pub fn new(transport: Box<dyn Transport>, base_url: impl Into<String>, tokens: LoginTokens) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn tokens(&self) -> &LoginTokens {
        &self.tokens
    }

    /// 拼接站点地址
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 当前的投递防伪令牌（会话 Cookie 去掉引号）
    pub fn submission_csrf_token(&self) -> AppResult<String> {
        self.transport
            .cookie(SESSION_COOKIE)
            .map(|value| value.replace('"', ""))
            .ok_or_else(|| AppError::MissingSessionCookie {
                name: SESSION_COOKIE.to_string(),
            })
    }
}
