// handlers/protected/summaries/mod.rs - Summary resource handlers
//
// Reads and writes are scoped to the caller through the owner of each
// summary's article.

use uuid::Uuid;

use crate::error::ApiError;
use crate::services::SummaryError;

pub mod create; // POST   /api/summaries
pub mod delete; // DELETE /api/summaries/:id
pub mod list; // GET    /api/summaries
pub mod show; // GET    /api/summaries/:id
pub mod update; // PUT    /api/summaries/:id

pub use create::summary_create;
pub use delete::summary_delete;
pub use list::summary_list;
pub use show::summary_show;
pub use update::summary_update;

/// Ids that aren't UUIDs can't match any summary
pub(crate) fn parse_summary_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(SummaryError::NotFound.to_string()))
}
