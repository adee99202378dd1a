//! 基于 reqwest 的传输实现

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::transport::{ExtraHeaders, FilePart, FormFields, HttpResponse, Transport};

/// reqwest 客户端 + Cookie 罐
pub struct HttpClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl HttpClient {
    /// 创建新的客户端，默认带上 referer 和 User-Agent
    pub fn new(config: &Config) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let jar = Arc::new(Jar::default());

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| AppError::Config(format!("User-Agent 无效: {}", e)))?,
        );
        default_headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("{}/", config.base_url.trim_end_matches('/')))
                .map_err(|e| AppError::Config(format!("referer 无效: {}", e)))?,
        );

        let client = Client::builder()
            .cookie_provider(jar.clone())
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            jar,
            base_url,
        })
    }

    fn with_headers(request: RequestBuilder, headers: ExtraHeaders<'_>) -> AppResult<RequestBuilder> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::Config(format!("请求头名称无效 {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::Config(format!("请求头值无效: {}", e)))?;
            map.insert(name, value);
        }
        Ok(request.headers(map))
    }

    async fn send(request: RequestBuilder, url: &str) -> AppResult<HttpResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::transport(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(url, e))?;
        debug!("{} -> {} ({} 字节)", url, status, body.len());
        Ok(HttpResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, headers: ExtraHeaders<'_>) -> AppResult<HttpResponse> {
        let request = Self::with_headers(self.client.get(url), headers)?;
        Self::send(request, url).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &FormFields,
        headers: ExtraHeaders<'_>,
    ) -> AppResult<HttpResponse> {
        let request = Self::with_headers(self.client.post(url).form(form), headers)?;
        Self::send(request, url).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        form: &FormFields,
        file: FilePart,
        headers: ExtraHeaders<'_>,
    ) -> AppResult<HttpResponse> {
        let mut part_headers = HeaderMap::new();
        part_headers.insert("Expires", HeaderValue::from_static("0"));
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| AppError::transport(url, e))?
            .headers(part_headers);

        let mut multipart = Form::new();
        for (key, value) in form {
            multipart = multipart.text(key.clone(), value.clone());
        }
        let multipart = multipart.part(file.field, part);

        let request = Self::with_headers(self.client.post(url).multipart(multipart), headers)?;
        Self::send(request, url).await
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;
        cookies.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}
