use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::ProfileStatus;

/// Baris `siswas`. Data orang tua diisi siswa sendiri saat onboarding dan
/// tidak otomatis terhubung ke akun ortu (relasi akun ada di `ortu.siswa_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Siswa {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub nisn: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub class_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_address: Option<String>,
    pub status: ProfileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
