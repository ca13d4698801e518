use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeType {
    Tugas,
    Uts,
    Uas,
}

impl GradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeType::Tugas => "tugas",
            GradeType::Uts => "uts",
            GradeType::Uas => "uas",
        }
    }
}

/// Baris `grades`. Kolom penandanya `type`, di Rust dinamai `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: Uuid,
    pub siswa_id: Uuid,
    pub subject_id: Uuid,
    pub guru_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: GradeType,
    pub value: f64,
    pub max_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
