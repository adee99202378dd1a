//! 命令行参数

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::parse_experience_levels;
use crate::services::{Credentials, SearchQuery};

#[derive(Debug, Parser)]
#[command(name = "job_apply", about = "Mass apply to job postings")]
pub struct Cli {
    /// 登录用户名（邮箱）
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// 搜索关键词
    #[arg(long)]
    pub keywords: String,

    /// 搜索城市
    #[arg(long)]
    pub location: String,

    /// 简历文件路径
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// 逗号分隔的公司黑名单
    #[arg(long, default_value = "")]
    pub blacklist: String,

    /// 逗号分隔的经验等级，例如 "entry,associate"
    #[arg(long)]
    pub experience: Option<String>,

    /// 不询问，直接投递
    #[arg(long)]
    pub yes_to_all: bool,

    /// 拒绝投递的职位也写入记录
    #[arg(long)]
    pub store_no: bool,

    /// 最多投递数量
    #[arg(long)]
    pub max_applications: Option<usize>,

    /// TOML 配置文件
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 输出 debug 日志
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// 合并配置：默认值 → TOML 文件 → 环境变量 → 命令行
    pub fn load_config(&self) -> AppResult<Config> {
        let base = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        let mut config = Config::from_env_over(base);

        config.yes_to_all |= self.yes_to_all;
        config.store_no |= self.store_no;
        config.verbose_logging |= self.verbose;
        if self.max_applications.is_some() {
            config.max_applications = self.max_applications;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn search_query(&self) -> AppResult<SearchQuery> {
        let experience = match &self.experience {
            Some(levels) => parse_experience_levels(levels)?,
            None => Vec::new(),
        };
        Ok(SearchQuery {
            keywords: self.keywords.clone(),
            location: self.location.clone(),
            experience,
        })
    }

    pub fn blacklist(&self) -> HashSet<String> {
        parse_blacklist(&self.blacklist)
    }
}

/// 解析逗号分隔的黑名单，去掉首尾空白，保留大小写
pub fn parse_blacklist(input: &str) -> HashSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
