#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use job_apply::error::{AppError, AppResult};
use job_apply::infrastructure::{
    ExtraHeaders, FilePart, FormFields, HttpResponse, LoginTokens, SessionContext, Transport,
};
use job_apply::models::JobPosting;
use job_apply::services::{ApplyConfirmer, CredentialPrompt};
use job_apply::Config;
use serde_json::json;

pub const BASE: &str = "https://jobs.example.test";

/// 记录下来的请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub form: FormFields,
    pub file: Option<FilePart>,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn path(&self) -> String {
        url::Url::parse(&self.url)
            .map(|u| u.path().to_string())
            .unwrap_or_default()
    }

    pub fn query(&self, key: &str) -> Option<String> {
        let url = url::Url::parse(&self.url).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Handler = dyn Fn(&RecordedRequest) -> AppResult<HttpResponse> + Send + Sync;

/// 按脚本应答的内存传输
#[derive(Clone)]
pub struct FakeTransport {
    handler: Arc<Handler>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    cookies: Arc<Mutex<HashMap<String, String>>>,
}

impl FakeTransport {
    pub fn new(handler: impl Fn(&RecordedRequest) -> AppResult<HttpResponse> + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(Mutex::new(Vec::new())),
            cookies: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }

    pub fn post_count(&self) -> usize {
        self.requests().iter().filter(|r| r.method == "POST").count()
    }

    /// 只按脚本应答，不记录请求
    pub fn respond_to(&self, request: &RecordedRequest) -> AppResult<HttpResponse> {
        (self.handler)(request)
    }

    fn handle(&self, request: RecordedRequest) -> AppResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        (self.handler)(&request)
    }
}

fn headers_of(headers: ExtraHeaders<'_>) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, headers: ExtraHeaders<'_>) -> AppResult<HttpResponse> {
        self.handle(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            form: Vec::new(),
            file: None,
            headers: headers_of(headers),
        })
    }

    async fn post_form(
        &self,
        url: &str,
        form: &FormFields,
        headers: ExtraHeaders<'_>,
    ) -> AppResult<HttpResponse> {
        self.handle(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            form: form.clone(),
            file: None,
            headers: headers_of(headers),
        })
    }

    async fn post_multipart(
        &self,
        url: &str,
        form: &FormFields,
        file: FilePart,
        headers: ExtraHeaders<'_>,
    ) -> AppResult<HttpResponse> {
        self.handle(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            form: form.clone(),
            file: Some(file),
            headers: headers_of(headers),
        })
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().unwrap().get(name).cloned()
    }
}

// ========== 响应构造 ==========

pub fn respond(status: u16, body: impl Into<String>) -> AppResult<HttpResponse> {
    Ok(HttpResponse {
        url: String::new(),
        status,
        body: body.into(),
    })
}

pub fn connection_reset(url: &str) -> AppResult<HttpResponse> {
    Err(AppError::transport(
        url,
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
    ))
}

pub fn not_found() -> AppResult<HttpResponse> {
    respond(404, "")
}

pub const LOGIN_PAGE: &str = r#"<html><body><form action="/uas/login-submit">
    <input type="hidden" name="loginCsrfParam" value="lcp-123">
    <input type="hidden" name="csrfToken" value="ajax:987">
    <input type="hidden" name="sourceAlias" value="0_alias">
    <input type="text" name="session_key">
    <input type="password" name="session_password">
</form></body></html>"#;

/// 一个职位条目
pub fn element(id: u64, in_apply: bool, company: &str, source_domain: Option<&str>) -> serde_json::Value {
    let mut posting = json!({ "id": id, "title": format!("Job {}", id) });
    if let Some(domain) = source_domain {
        posting["sourceDomain"] = json!(domain);
    }
    json!({
        "isInApply": in_apply,
        "decoratedJobPosting": {
            "jobPosting": posting,
            "companyName": company,
            "formattedDescription": format!("<p>Description for {}</p>", id)
        }
    })
}

/// 一页搜索结果
pub fn search_page(total: u64, elements: Vec<serde_json::Value>) -> String {
    json!({
        "decoratedJobPostingsModule": {
            "paging": { "total": total, "count": 50 },
            "elements": elements
        }
    })
    .to_string()
}

/// 按 `start` 生成分页：ID 从 1 开始连续编号，偶数 ID 为站内投递
pub fn paged_search(total: u64, start: u64) -> String {
    let end = (start + 50).min(total);
    let elements = (start..end)
        .map(|i| {
            let id = i + 1;
            if id % 2 == 0 {
                element(id, true, "Acme Corp", None)
            } else {
                element(id, false, "Initech", Some("jobs.lever.co"))
            }
        })
        .collect();
    search_page(total, elements)
}

pub fn apply_flow_body() -> String {
    json!({
        "applicant": {
            "email": [{"email": "me@example.com"}, {"email": "other@example.com"}],
            "phone": "555-0100",
            "resumeUploadLink": "upload-token-1"
        }
    })
    .to_string()
}

pub fn media_callback_body() -> String {
    r#"<html><head><script type="text/javascript">
        parent.mediaCallback({"value":"/AAEAAQ/resume.pdf","filename":"resume.pdf","sig":"sig-abc"});
    </script></head><body></body></html>"#
        .to_string()
}

pub fn offsite_detail_page() -> String {
    r#"<html><body>
        <h1>Job</h1>
        <code id="decoratedJobPostingModule" style="display: none"><!--{"decoratedJobPosting":{"jobPosting":{"id":9},"externalApplyLink":"https://jobs.example.test/redir/redirect?url=https%3A%2F%2Fcareers.vendor.test%2Fapply%3Fjob%3D9&urlhash=abc"}}--></code>
    </body></html>"#
        .to_string()
}

// ========== 会话与配置 ==========

pub fn session(transport: &FakeTransport) -> SessionContext {
    SessionContext::new(Box::new(transport.clone()), BASE, LoginTokens::default())
}

pub fn test_config(dir: &std::path::Path) -> Config {
    Config {
        base_url: BASE.to_string(),
        ledger_path: dir.join("applied.txt").to_string_lossy().to_string(),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        report_file: dir.join("report.txt").to_string_lossy().to_string(),
        search_retry_backoff_ms: 0,
        ..Config::default()
    }
}

pub fn posting(id: u64, tag: job_apply::ProviderTag) -> JobPosting {
    JobPosting {
        id,
        title: format!("Job {}", id),
        company: "Acme Corp".to_string(),
        description: String::new(),
        detail_url: format!("{}/jobs/view/{}", BASE, id),
        provider: tag,
    }
}

// ========== 交互替身 ==========

/// 记录调用次数的凭据输入
#[derive(Default)]
pub struct ScriptedPrompt {
    pub username_calls: Mutex<usize>,
    pub password_calls: Mutex<usize>,
}

impl CredentialPrompt for ScriptedPrompt {
    fn username(&self) -> AppResult<String> {
        *self.username_calls.lock().unwrap() += 1;
        Ok("prompted@example.com".to_string())
    }

    fn password(&self) -> AppResult<String> {
        *self.password_calls.lock().unwrap() += 1;
        Ok("prompted-secret".to_string())
    }
}

/// 拒绝指定 ID，其余全部同意
pub struct RefuseIds(pub Vec<u64>);

impl ApplyConfirmer for RefuseIds {
    fn confirm(&self, job: &JobPosting) -> AppResult<bool> {
        Ok(!self.0.contains(&job.id))
    }
}
