use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Baris `ortu`; `siswa_id` menunjuk anak yang dipantau.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ortu {
    pub id: Uuid,
    pub user_id: Uuid,
    pub siswa_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
