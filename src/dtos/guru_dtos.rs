use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::attendance::AttendanceStatus;
use crate::models::grade::GradeType;

#[derive(Deserialize)]
pub struct GradeEntryIn {
    pub siswa_id: Uuid,
    pub value: f64,
}

/// Simpan nilai satu mapel + satu jenis penilaian sekaligus untuk semua
/// siswa yang dikirim. Menimpa nilai lama (last write wins).
#[derive(Deserialize)]
pub struct SaveGradesIn {
    pub subject_id: Uuid,
    #[serde(rename = "type")]
    pub kind: GradeType,
    pub entries: Vec<GradeEntryIn>,
}

#[derive(Deserialize)]
pub struct AttendanceEntryIn {
    pub siswa_id: Uuid,
    pub status: AttendanceStatus,
}

#[derive(Deserialize)]
pub struct SaveAttendanceIn {
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub entries: Vec<AttendanceEntryIn>,
}

/// Query lembar nilai: mapel + jenis penilaian.
#[derive(Deserialize)]
pub struct GradeSheetQuery {
    pub subject_id: Uuid,
    #[serde(rename = "type")]
    pub kind: GradeType,
}

/// Query lembar absensi: mapel + tanggal.
#[derive(Deserialize)]
pub struct AttendanceSheetQuery {
    pub subject_id: Uuid,
    pub date: NaiveDate,
}
