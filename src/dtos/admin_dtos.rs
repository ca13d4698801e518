use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{ProfileStatus, Role};

/// Form tambah/edit guru dari panel admin.
#[derive(Deserialize)]
pub struct GuruForm {
    pub nip: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: ProfileStatus,
}

/// Form tambah/edit siswa dari panel admin.
#[derive(Deserialize)]
pub struct SiswaForm {
    pub nisn: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub status: ProfileStatus,
}

#[derive(Serialize, Deserialize)]
pub struct KelasForm {
    pub name: String,
    pub level: Option<String>,
    pub guru_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleForm {
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub guru_id: Uuid,
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
}

#[derive(Deserialize)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub target_roles: Vec<Role>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Deserialize)]
pub struct PublishIn {
    pub is_published: bool,
}

/// Filter rekap nilai/absensi admin; kelas wajib, mapel opsional.
#[derive(Deserialize)]
pub struct RecapQuery {
    pub class_id: Uuid,
    pub subject_id: Option<Uuid>,
}
