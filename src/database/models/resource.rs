use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::ResourceId;

// Summaries as exposed by the catalogs. The pinned feature only displays them.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentSummary {
    pub id: ResourceId,
    pub title: String,
    pub resource_type: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LinkSummary {
    pub id: ResourceId,
    pub title: String,
    pub link: String,
    pub resource_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileSummary {
    pub id: ResourceId,
    pub file_name: String,
    pub file_upload: String,
    pub resource_type: String,
}
