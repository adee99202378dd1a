//! 登录服务 - 业务能力层
//!
//! 用凭据换取会话上下文，失败直接终止运行

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::infrastructure::host_format;
use crate::infrastructure::{FormFields, SessionContext, Transport};
use crate::services::credentials::{CredentialPrompt, Credentials};

pub const LOGIN_PATH: &str = "/uas/login";
pub const LOGIN_SUBMIT_PATH: &str = "/uas/login-submit";

/// 登录服务
pub struct Authenticator<'a> {
    base_url: String,
    prompt: &'a dyn CredentialPrompt,
}

impl<'a> Authenticator<'a> {
    pub fn new(base_url: impl Into<String>, prompt: &'a dyn CredentialPrompt) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prompt,
        }
    }

    /// 登录并返回会话上下文
    ///
    /// # 参数
    /// - `transport`: 传输能力，登录过程中会写入 Cookie
    /// - `credentials`: 登录凭据，缺失部分通过交互补全
    pub async fn authenticate(
        &self,
        transport: Box<dyn Transport>,
        credentials: Credentials,
    ) -> AppResult<SessionContext> {
        let login_url = format!("{}{}", self.base_url, LOGIN_PATH);

        // 先拿登录页上的令牌
        let login_page = transport.get(&login_url, &[]).await?;
        let tokens = host_format::extract_login_tokens(&login_page.body)?;
        debug!("已获取登录令牌");

        let username = match credentials.username {
            Some(username) => username,
            None => self.prompt.username()?,
        };
        let password = match credentials.password {
            Some(password) => password,
            None => self.prompt.password()?,
        };

        let mut form: FormFields = tokens.as_form();
        form.push(("session_key".to_string(), username.clone()));
        form.push(("session_password".to_string(), password));

        let submit_url = format!("{}{}", self.base_url, LOGIN_SUBMIT_PATH);
        let response = transport
            .post_form(
                &submit_url,
                &form,
                &[("referer", login_url.as_str()), ("X-IsAJAXForm", "1")],
            )
            .await
            .map_err(|e| AppError::Authentication {
                reason: e.to_string(),
            })?;

        if response.status != 200 {
            return Err(AppError::Authentication {
                reason: format!("登录接口返回状态码 {}", response.status),
            });
        }

        let body: JsonValue = serde_json::from_str(&response.body).map_err(|e| AppError::Authentication {
            reason: format!("登录响应不是 JSON: {}", e),
        })?;
        if body.get("status").and_then(|v| v.as_str()) == Some("fail") {
            return Err(AppError::Authentication {
                reason: "用户名或密码错误".to_string(),
            });
        }

        info!("✓ 登录成功: {}", username);
        Ok(SessionContext::new(transport, self.base_url.clone(), tokens))
    }
}
