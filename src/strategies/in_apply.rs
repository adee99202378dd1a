//! 站内投递
//!
//! 流程：获取申请人信息 → （可选）上传简历 → 提交申请
//!
//! 每次调用最多提交一次，任何一步失败都放弃整个投递，不重试

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::host_format;
use crate::infrastructure::{FilePart, FormFields, Resume, SessionContext};
use crate::models::{ApplicantDetail, ApplyFlowResponse, ApplyOutcome, JobPosting, ResumeReceipt};
use crate::strategies::ApplyStrategy;

pub const APPLY_FLOW_PATH: &str = "/jobs/view/applyFlow";
pub const RESUME_UPLOAD_PATH: &str = "/mupld/cappts";
pub const SUBMIT_PATH: &str = "/jobs/submitJobApplication";

const AJAX_HEADERS: [(&str, &str); 2] = [("X-IsAJAXForm", "1"), ("X-Requested-With", "XMLHttpRequest")];

/// 提交表单中简历相关的三个字段
pub const RESUME_FIELDS: [&str; 3] = ["resumeMediaId", "resumeName", "resumeMupldSignature"];

/// 站内投递策略
#[derive(Debug, Default, Clone, Copy)]
pub struct InApplyStrategy;

impl InApplyStrategy {
    /// 获取申请人信息和上传令牌
    async fn fetch_applicant(
        &self,
        session: &SessionContext,
        job: &JobPosting,
    ) -> AppResult<Result<ApplicantDetail, u16>> {
        let url = session.url(&format!("{}/{}", APPLY_FLOW_PATH, job.id));
        let response = session.transport().get(&url, &[]).await?;
        if !response.is_success() {
            return Ok(Err(response.status));
        }
        let detail: ApplyFlowResponse = response.json()?;
        Ok(Ok(detail.applicant))
    }

    /// 上传简历并解析回执
    async fn upload_resume(
        &self,
        session: &SessionContext,
        applicant: &ApplicantDetail,
        resume: &mut Resume,
    ) -> AppResult<Result<ResumeReceipt, u16>> {
        // 同一份简历会被多次使用，必须从头读取
        let bytes = resume.read_from_start()?;
        debug!("上传简历 {} ({} 字节)", resume.file_name(), bytes.len());

        let form: FormFields = vec![
            ("upload_info".to_string(), applicant.resume_upload_link.clone()),
            ("store_securely".to_string(), "true".to_string()),
            ("sign_response".to_string(), "true".to_string()),
            ("persist".to_string(), "true".to_string()),
        ];
        let file = FilePart {
            field: "file".to_string(),
            file_name: resume.file_name().to_string(),
            content_type: resume.content_type().to_string(),
            bytes,
        };

        let url = session.url(RESUME_UPLOAD_PATH);
        let response = session
            .transport()
            .post_multipart(&url, &form, file, &AJAX_HEADERS)
            .await?;
        if !response.is_success() {
            return Ok(Err(response.status));
        }

        let receipt = host_format::parse_media_callback(&response.body)?;
        Ok(Ok(receipt))
    }

    async fn run(
        &self,
        session: &SessionContext,
        job: &JobPosting,
        resume: Option<&mut Resume>,
    ) -> AppResult<ApplyOutcome> {
        let applicant = match self.fetch_applicant(session, job).await? {
            Ok(applicant) => applicant,
            Err(status) => {
                warn!("⚠️ 获取投递信息失败: {} 状态码 {}", job, status);
                return Ok(ApplyOutcome {
                    success: false,
                    status: Some(status),
                    external_url: None,
                });
            }
        };

        let receipt = match resume {
            Some(resume) => match self.upload_resume(session, &applicant, resume).await? {
                Ok(receipt) => {
                    debug!("简历已上传: {}", receipt.filename);
                    Some(receipt)
                }
                Err(status) => {
                    warn!("⚠️ 简历上传失败: {} 状态码 {}", job, status);
                    return Ok(ApplyOutcome {
                        success: false,
                        status: Some(status),
                        external_url: None,
                    });
                }
            },
            None => {
                info!("未提供简历，直接提交申请");
                None
            }
        };

        let csrf_token = session.submission_csrf_token()?;
        let form = build_submission_form(job.id, &applicant, &csrf_token, receipt.as_ref())?;

        let url = session.url(SUBMIT_PATH);
        let response = session
            .transport()
            .post_form(&url, &form, &AJAX_HEADERS)
            .await?;
        Ok(ApplyOutcome::from_status(response.status))
    }
}

#[async_trait]
impl ApplyStrategy for InApplyStrategy {
    fn name(&self) -> &'static str {
        "InApply"
    }

    async fn apply(
        &self,
        session: &SessionContext,
        job: &JobPosting,
        resume: Option<&mut Resume>,
    ) -> AppResult<ApplyOutcome> {
        match self.run(session, job, resume).await {
            Err(e @ AppError::Transport { .. }) => {
                warn!("⚠️ 投递中断: {} ({})", job, e);
                Ok(ApplyOutcome::aborted())
            }
            other => other,
        }
    }
}

/// 构建提交申请的表单
///
/// 没有上传回执时，不包含简历相关字段
pub fn build_submission_form(
    job_id: u64,
    applicant: &ApplicantDetail,
    csrf_token: &str,
    receipt: Option<&ResumeReceipt>,
) -> AppResult<FormFields> {
    let email = applicant
        .primary_email()
        .ok_or_else(|| AppError::host_format(APPLY_FLOW_PATH, "申请人邮箱列表为空"))?;

    let mut form: FormFields = [
        ("spSrc", ""),
        ("trkSrc", ""),
        ("refId", ""),
        ("store_securely", "true"),
        ("sign_response", "true"),
        ("persist", "true"),
        ("followCompany", "false"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    form.push(("csrfToken".to_string(), csrf_token.to_string()));
    form.push(("jobId".to_string(), job_id.to_string()));
    form.push(("email".to_string(), email.to_string()));
    form.push(("phone".to_string(), applicant.phone.clone()));
    form.push(("upload_info".to_string(), applicant.resume_upload_link.clone()));
    form.push(("upload_info_with_js".to_string(), applicant.resume_upload_link.clone()));

    if let Some(receipt) = receipt {
        let [media_id, name, signature] = RESUME_FIELDS;
        form.push((media_id.to_string(), receipt.media_id.clone()));
        form.push((name.to_string(), receipt.filename.clone()));
        form.push((signature.to_string(), receipt.signature.clone()));
    }

    Ok(form)
}
