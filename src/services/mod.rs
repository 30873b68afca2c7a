pub mod auth_service;
pub mod summarizer;
pub mod summary_service;

pub use auth_service::{AuthError, AuthService, Session};
pub use summarizer::{NlpCloudClient, Summarizer, SummarizerError};
pub use summary_service::{ArticleSubmission, CreatedSummary, SummaryError, SummaryService};
