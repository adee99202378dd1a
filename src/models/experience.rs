use crate::error::{AppError, AppResult};

/// 工作经验等级
///
/// 取值即搜索参数 `f_E` 中使用的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
    NotApplicable = 0,
    Internship = 1,
    Entry = 2,
    Associate = 3,
    MidSenior = 4,
    Director = 5,
    Executive = 6,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 7] = [
        ExperienceLevel::NotApplicable,
        ExperienceLevel::Internship,
        ExperienceLevel::Entry,
        ExperienceLevel::Associate,
        ExperienceLevel::MidSenior,
        ExperienceLevel::Director,
        ExperienceLevel::Executive,
    ];

    /// 获取搜索参数中的下标
    pub fn index(self) -> u8 {
        self as u8
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ExperienceLevel::NotApplicable => "not-applicable",
            ExperienceLevel::Internship => "internship",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Associate => "associate",
            ExperienceLevel::MidSenior => "mid-senior",
            ExperienceLevel::Director => "director",
            ExperienceLevel::Executive => "executive",
        }
    }

    /// 从名称解析（忽略大小写，空格和下划线视同连字符）
    pub fn from_name(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::ALL.into_iter().find(|level| level.name() == normalized)
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 解析逗号分隔的经验等级列表
///
/// 未知名称属于调用方输入错误，直接返回 `UnknownExperienceLevel`
pub fn parse_experience_levels(input: &str) -> AppResult<Vec<ExperienceLevel>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ExperienceLevel::from_name(s).ok_or_else(|| AppError::UnknownExperienceLevel(s.to_string())))
        .collect()
}

/// 编码为 `f_E` 参数值，例如 "2,3"
pub fn encode_experience_filter(levels: &[ExperienceLevel]) -> String {
    levels
        .iter()
        .map(|level| level.index().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
