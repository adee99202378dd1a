//! 简历字节流
//!
//! 同一份简历会在一次运行中投递给多个职位，每次读取前都必须回到开头

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// 可回绕的字节流
pub trait ResumeStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> ResumeStream for T {}

/// 简历
///
/// 由调用方持有整个运行周期，投递策略只借用
pub struct Resume {
    file_name: String,
    content_type: String,
    stream: Box<dyn ResumeStream>,
}

impl Resume {
    pub fn new(file_name: impl Into<String>, stream: Box<dyn ResumeStream>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            stream,
        }
    }

    /// 打开简历文件
    pub fn open(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::Config(format!("无法打开简历文件 {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self::new(file_name, Box::new(file)))
    }

    /// 从内存字节创建
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, Box::new(Cursor::new(bytes)))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// 回到开头并读出完整内容
    pub fn read_from_start(&mut self) -> AppResult<Vec<u8>> {
        self.stream.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.stream.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl std::fmt::Debug for Resume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resume")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());
    match extension.as_deref() {
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/pdf",
    }
}
