pub mod article;
pub mod summary;
pub mod user;

pub use article::{Article, NewArticle, DEFAULT_AUTHOR};
pub use summary::{NewSummary, Summary, SummaryWithArticle};
pub use user::{NewUser, PublicUser, User, UserRole};
