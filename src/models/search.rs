//! 搜索接口的返回结构
//!
//! 只在解析单页结果时使用，不会保留到下一页

use serde::Deserialize;

use crate::models::job::{JobPosting, ProviderTag};

/// 搜索接口响应外层
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "decoratedJobPostingsModule")]
    pub module: SearchPage,
}

/// 单页搜索结果
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub elements: Vec<RawJobElement>,
    pub paging: Paging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    pub total: u64,
}

/// 原始职位条目
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJobElement {
    #[serde(default)]
    pub is_in_apply: bool,
    pub decorated_job_posting: DecoratedJobPosting,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedJobPosting {
    pub job_posting: RawJobPosting,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub formatted_description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJobPosting {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub source_domain: Option<String>,
}

impl RawJobElement {
    /// 转换为职位信息，`detail_base` 形如 "https://host/jobs/view"
    pub fn into_posting(self, detail_base: &str) -> JobPosting {
        let decorated = self.decorated_job_posting;
        let provider = ProviderTag::from_host(
            self.is_in_apply,
            decorated.job_posting.source_domain.as_deref(),
        );
        JobPosting {
            id: decorated.job_posting.id,
            title: decorated.job_posting.title,
            company: decorated.company_name,
            description: decorated.formatted_description,
            detail_url: format!("{}/{}", detail_base.trim_end_matches('/'), decorated.job_posting.id),
            provider,
        }
    }
}
