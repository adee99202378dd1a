//! 基础设施层
//!
//! 持有稀缺资源（HTTP 会话、Cookie、简历字节流），只暴露能力

pub mod host_format;
pub mod http_client;
pub mod resume;
pub mod session;
pub mod transport;

pub use http_client::HttpClient;
pub use resume::{Resume, ResumeStream};
pub use session::{LoginTokens, SessionContext, SESSION_COOKIE};
pub use transport::{ExtraHeaders, FilePart, FormFields, HttpResponse, Transport};
