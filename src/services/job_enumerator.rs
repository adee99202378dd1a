//! 职位枚举服务 - 业务能力层
//!
//! 按页拉取搜索结果，按站点顺序逐个产出职位
//!
//! - 页大小固定为 50
//! - 每页都以最新返回的 `paging.total` 作为上界
//! - 已投递的 ID 和黑名单公司（精确匹配，区分大小写）在这里过滤

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use futures::stream::{self, Stream};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{HttpResponse, SessionContext};
use crate::models::{encode_experience_filter, ExperienceLevel, JobPosting, SearchResponse};

pub const PAGE_SIZE: u64 = 50;
pub const SEARCH_PATH: &str = "/jobs/searchRefresh";
pub const JOB_VIEW_PATH: &str = "/jobs/view";

/// 搜索条件
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub keywords: String,
    pub location: String,
    pub experience: Vec<ExperienceLevel>,
}

/// 排除条件
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// 已投递的职位 ID
    pub exclude_ids: HashSet<u64>,
    /// 公司黑名单（精确匹配）
    pub exclude_companies: HashSet<String>,
}

impl SearchFilters {
    pub fn allows(&self, job: &JobPosting) -> bool {
        !self.exclude_ids.contains(&job.id) && !self.exclude_companies.contains(&job.company)
    }
}

/// 分页请求的重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_ms: 2000,
        }
    }
}

/// 职位枚举器
///
/// 惰性拉取：只有缓冲区取空时才请求下一页
pub struct JobEnumerator<'s> {
    session: &'s SessionContext,
    query: SearchQuery,
    filters: SearchFilters,
    retry: RetryPolicy,
    offset: u64,
    buffer: VecDeque<JobPosting>,
    exhausted: bool,
    pages_fetched: usize,
    filtered_out: usize,
}

impl<'s> JobEnumerator<'s> {
    pub fn new(
        session: &'s SessionContext,
        query: SearchQuery,
        filters: SearchFilters,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            session,
            query,
            filters,
            retry,
            offset: 0,
            buffer: VecDeque::new(),
            exhausted: false,
            pages_fetched: 0,
            filtered_out: 0,
        }
    }

    /// 已请求的页数
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// 被排除条件过滤掉的职位数
    pub fn filtered_out(&self) -> usize {
        self.filtered_out
    }

    /// 取下一个职位，没有更多时返回 `None`
    pub async fn next_job(&mut self) -> AppResult<Option<JobPosting>> {
        loop {
            if let Some(job) = self.buffer.pop_front() {
                return Ok(Some(job));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }

    /// 转换为异步流
    pub fn into_stream(self) -> impl Stream<Item = AppResult<JobPosting>> + 's {
        stream::try_unfold(self, |mut enumerator| async move {
            let next = enumerator.next_job().await?;
            Ok(next.map(|job| (job, enumerator)))
        })
    }

    /// 构建某一页的搜索地址
    pub fn page_url(&self, start: u64) -> AppResult<String> {
        let mut url = Url::parse(&self.session.url(SEARCH_PATH))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("keywords", &self.query.keywords)
                .append_pair("location", &self.query.location)
                .append_pair("start", &start.to_string())
                .append_pair("count", &PAGE_SIZE.to_string());
            if !self.query.experience.is_empty() {
                pairs.append_pair("f_E", &encode_experience_filter(&self.query.experience));
            }
        }
        Ok(url.to_string())
    }

    async fn fetch_next_page(&mut self) -> AppResult<()> {
        let url = self.page_url(self.offset)?;
        let response = self.fetch_with_retry(&url).await?;
        self.pages_fetched += 1;

        let page = response.json::<SearchResponse>()?.module;
        let limit = page.paging.total;
        let raw_count = page.elements.len();
        debug!(
            "第 {} 页: start={} 返回 {} 条, total={}",
            self.pages_fetched, self.offset, raw_count, limit
        );

        let detail_base = self.session.url(JOB_VIEW_PATH);
        for element in page.elements {
            let job = element.into_posting(&detail_base);
            if self.filters.allows(&job) {
                self.buffer.push_back(job);
            } else {
                debug!("跳过已排除的职位 {}", job);
                self.filtered_out += 1;
            }
        }

        self.offset += PAGE_SIZE;
        if raw_count == 0 || self.offset >= limit {
            info!(
                "✓ 搜索结束: 共请求 {} 页, 过滤 {} 个职位",
                self.pages_fetched, self.filtered_out
            );
            self.exhausted = true;
        }
        Ok(())
    }

    /// 拉取一页，网络错误和非成功状态码按退避重试
    async fn fetch_with_retry(&self, url: &str) -> AppResult<HttpResponse> {
        let attempts = self.retry.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.session.transport().get(url, &[]).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    last_error = format!("状态码 {}", response.status);
                }
                Err(e @ AppError::Transport { .. }) => {
                    last_error = e.to_string();
                }
                Err(e) => return Err(e),
            }

            if attempt < attempts {
                warn!(
                    "搜索请求失败 (尝试 {}/{}): {}，等待后重试...",
                    attempt, attempts, last_error
                );
                sleep(Duration::from_millis(self.retry.backoff_ms * attempt as u64)).await;
            }
        }

        Err(AppError::SearchRetriesExhausted {
            attempts,
            last_error,
        })
    }
}
