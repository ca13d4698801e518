use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Baris `classes`; `guru_id` adalah wali kelas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kelas {
    pub id: Uuid,
    pub name: String,
    pub level: Option<String>,
    pub guru_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
