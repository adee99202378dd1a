pub mod apply;
pub mod experience;
pub mod job;
pub mod search;

pub use apply::{ApplicantDetail, ApplyFlowResponse, ApplyOutcome, ResumeReceipt};
pub use experience::{encode_experience_filter, parse_experience_levels, ExperienceLevel};
pub use job::{JobPosting, ProviderTag};
pub use search::{RawJobElement, SearchPage, SearchResponse};
