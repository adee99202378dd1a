//! 登录凭据与交互输入 - 业务能力层
//!
//! 终端交互通过 trait 注入，核心流程不直接读终端

use dialoguer::{Confirm, Input, Password};

use crate::error::{AppError, AppResult};
use crate::models::JobPosting;

/// 登录凭据
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username: username.filter(|s| !s.is_empty()),
            password: password.filter(|s| !s.is_empty()),
        }
    }
}

// 密码不进入日志
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 缺少凭据时的补全方式
pub trait CredentialPrompt: Send + Sync {
    fn username(&self) -> AppResult<String>;
    /// 输入时不回显
    fn password(&self) -> AppResult<String>;
}

/// 是否投递某个职位
pub trait ApplyConfirmer: Send + Sync {
    fn confirm(&self, job: &JobPosting) -> AppResult<bool>;
}

/// 终端交互
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn username(&self) -> AppResult<String> {
        Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::Prompt(e.to_string()))
    }

    fn password(&self) -> AppResult<String> {
        Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::Prompt(e.to_string()))
    }
}

impl ApplyConfirmer for TerminalPrompt {
    fn confirm(&self, _job: &JobPosting) -> AppResult<bool> {
        Confirm::new()
            .with_prompt("apply?")
            .default(true)
            .interact()
            .map_err(|e| AppError::Prompt(e.to_string()))
    }
}

/// `--yes-to-all`：全部投递，不询问
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl ApplyConfirmer for AutoConfirm {
    fn confirm(&self, _job: &JobPosting) -> AppResult<bool> {
        Ok(true)
    }
}
