use std::fmt;

/// 投递渠道标签
///
/// `InApply` 表示站内投递，其余都当作站外职位处理
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderTag {
    /// 站内投递流程
    InApply,
    /// 站点返回的来源域名（例如 "some-ats-vendor.com"）
    SourceDomain(String),
    /// 没有来源信息的站外职位
    Offsite,
}

impl ProviderTag {
    /// 站内投递的注册键
    pub const IN_APPLY_KEY: &'static str = "InApply";
    /// 站外职位的通用键
    pub const OFFSITE_KEY: &'static str = "offsite";

    /// 根据站点字段推导标签
    pub fn from_host(is_in_apply: bool, source_domain: Option<&str>) -> Self {
        if is_in_apply {
            return ProviderTag::InApply;
        }
        match source_domain {
            Some(domain) if !domain.is_empty() => ProviderTag::SourceDomain(domain.to_string()),
            _ => ProviderTag::Offsite,
        }
    }

    /// 用于查找投递策略的键
    pub fn key(&self) -> &str {
        match self {
            ProviderTag::InApply => Self::IN_APPLY_KEY,
            ProviderTag::SourceDomain(domain) => domain,
            ProviderTag::Offsite => Self::OFFSITE_KEY,
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 职位信息（枚举器产出后只读）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    pub id: u64,
    pub title: String,
    pub company: String,
    /// 职位描述（可能是 HTML）
    pub description: String,
    pub detail_url: String,
    pub provider: ProviderTag,
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[职位 #{} {} @ {} 渠道#{}]",
            self.id, self.title, self.company, self.provider
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_apply_flag_wins_over_source_domain() {
        let tag = ProviderTag::from_host(true, Some("greenhouse.io"));
        assert_eq!(tag, ProviderTag::InApply);
        assert_eq!(tag.key(), "InApply");
    }

    #[test]
    fn missing_source_domain_falls_back_to_offsite() {
        assert_eq!(ProviderTag::from_host(false, None), ProviderTag::Offsite);
        assert_eq!(ProviderTag::from_host(false, Some("")), ProviderTag::Offsite);
        assert_eq!(
            ProviderTag::from_host(false, Some("some-ats-vendor.com")).key(),
            "some-ats-vendor.com"
        );
    }
}
