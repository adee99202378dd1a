use serde::Deserialize;

/// 投递结果（只用于汇报，不会自动重试）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub success: bool,
    /// 提交接口返回的状态码
    pub status: Option<u16>,
    /// 站外职位解析出的投递地址
    pub external_url: Option<String>,
}

impl ApplyOutcome {
    /// 根据提交接口的状态码生成结果
    pub fn from_status(status: u16) -> Self {
        Self {
            success: (200..300).contains(&status),
            status: Some(status),
            external_url: None,
        }
    }

    /// 请求中途失败
    pub fn aborted() -> Self {
        Self {
            success: false,
            status: None,
            external_url: None,
        }
    }

    /// 站外职位：只给出投递地址
    pub fn offsite(url: impl Into<String>) -> Self {
        Self {
            success: true,
            status: None,
            external_url: Some(url.into()),
        }
    }
}

/// 简历上传回执，用完即丢
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResumeReceipt {
    #[serde(rename = "value")]
    pub media_id: String,
    pub filename: String,
    #[serde(rename = "sig")]
    pub signature: String,
}

/// 投递详情接口中的申请人信息
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyFlowResponse {
    pub applicant: ApplicantDetail,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetail {
    #[serde(default)]
    pub email: Vec<ApplicantEmail>,
    #[serde(default)]
    pub phone: String,
    pub resume_upload_link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicantEmail {
    pub email: String,
}

impl ApplicantDetail {
    /// 第一个邮箱地址
    pub fn primary_email(&self) -> Option<&str> {
        self.email.first().map(|e| e.email.as_str())
    }
}
