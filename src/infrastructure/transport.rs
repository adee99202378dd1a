//! HTTP 传输能力 - 基础设施层
//!
//! 只暴露"发请求、读 Cookie"的能力，不认识职位和投递流程

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// 一次请求的响应
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// 请求路径（用于错误信息）
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 将响应体解析为 JSON
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| AppError::host_format(&self.url, format!("JSON 解析失败: {}", e)))
    }
}

/// 表单字段
pub type FormFields = Vec<(String, String)>;

/// 额外请求头
pub type ExtraHeaders<'a> = &'a [(&'a str, &'a str)];

/// 上传的文件
#[derive(Debug, Clone)]
pub struct FilePart {
    /// 表单字段名
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 带 Cookie 的 HTTP 传输
///
/// 职责：
/// - 持有唯一的 Cookie 罐，每次请求都会更新
/// - 只发请求，不判断业务上的成败
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, headers: ExtraHeaders<'_>) -> AppResult<HttpResponse>;

    async fn post_form(
        &self,
        url: &str,
        form: &FormFields,
        headers: ExtraHeaders<'_>,
    ) -> AppResult<HttpResponse>;

    async fn post_multipart(
        &self,
        url: &str,
        form: &FormFields,
        file: FilePart,
        headers: ExtraHeaders<'_>,
    ) -> AppResult<HttpResponse>;

    /// 读取当前站点的 Cookie 值
    fn cookie(&self, name: &str) -> Option<String>;
}
