pub mod admin_handlers;
pub mod announcement_handlers;
pub mod auth_handlers;
pub mod event_handlers;
pub mod guru_handlers;
pub mod ortu_handlers;
pub mod people_handlers;
pub mod siswa_handlers;

use actix_web::{HttpResponse, get, web};
use regex::Regex;
use serde::Serialize;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::errors::AppError;
use crate::models::attendance::{Attendance, AttendanceStatus};

pub(crate) fn looks_like_email(email: &str) -> bool {
    let re = Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    re.is_match(email)
}

/// Rata-rata dibulatkan dua angka di belakang koma; None kalau kosong.
pub(crate) fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some((values.iter().sum::<f64>() / values.len() as f64 * 100.0).round() / 100.0)
}

/// Ringkasan kehadiran per status. Persentase hadir None kalau belum ada
/// catatan sama sekali.
#[derive(Debug, Serialize)]
pub struct AttendanceSummary {
    pub hadir: usize,
    pub izin: usize,
    pub sakit: usize,
    pub alpha: usize,
    pub persentase_hadir: Option<f64>,
}

pub(crate) fn attendance_summary(records: &[Attendance]) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        hadir: 0,
        izin: 0,
        sakit: 0,
        alpha: 0,
        persentase_hadir: None,
    };
    for record in records {
        match record.status {
            AttendanceStatus::Hadir => summary.hadir += 1,
            AttendanceStatus::Izin => summary.izin += 1,
            AttendanceStatus::Sakit => summary.sakit += 1,
            AttendanceStatus::Alpha => summary.alpha += 1,
        }
    }
    if !records.is_empty() {
        summary.persentase_hadir =
            Some((summary.hadir as f64 / records.len() as f64 * 10000.0).round() / 100.0);
    }
    summary
}

#[derive(Serialize)]
struct HealthOut {
    users: u64,
}

/// GET /health - probe koneksi ke Supabase lewat hitung baris `users`.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.store.from_table("users").count().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Koneksi sehat", HealthOut { users })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(event_handlers::pengumuman_stream)
        .service(
            web::scope("/auth")
                .service(auth_handlers::login)
                .service(auth_handlers::register)
                .service(auth_handlers::logout)
                .service(auth_handlers::session)
                .service(auth_handlers::onboarding),
        )
        .service(
            web::scope("/admin")
                .service(admin_handlers::dashboard)
                .service(admin_handlers::opsi_guru)
                .service(admin_handlers::opsi_kelas)
                .service(admin_handlers::opsi_mapel)
                .service(admin_handlers::list_kelas)
                .service(admin_handlers::create_kelas)
                .service(admin_handlers::update_kelas)
                .service(admin_handlers::delete_kelas)
                .service(admin_handlers::list_jadwal)
                .service(admin_handlers::create_jadwal)
                .service(admin_handlers::update_jadwal)
                .service(admin_handlers::delete_jadwal)
                .service(admin_handlers::rekap_nilai)
                .service(admin_handlers::rekap_absensi)
                .service(people_handlers::list_guru)
                .service(people_handlers::create_guru)
                .service(people_handlers::update_guru)
                .service(people_handlers::delete_guru)
                .service(people_handlers::reset_guru_password)
                .service(people_handlers::list_siswa)
                .service(people_handlers::create_siswa)
                .service(people_handlers::update_siswa)
                .service(people_handlers::delete_siswa)
                .service(people_handlers::reset_siswa_password)
                .service(announcement_handlers::list_pengumuman)
                .service(announcement_handlers::create_pengumuman)
                .service(announcement_handlers::update_pengumuman)
                .service(announcement_handlers::publish_pengumuman)
                .service(announcement_handlers::delete_pengumuman),
        )
        .service(
            web::scope("/guru")
                .service(guru_handlers::dashboard)
                .service(guru_handlers::list_kelas)
                .service(guru_handlers::list_siswa_kelas)
                .service(guru_handlers::list_mapel)
                .service(guru_handlers::jadwal)
                .service(guru_handlers::pengumuman)
                .service(guru_handlers::grade_sheet)
                .service(guru_handlers::save_grades)
                .service(guru_handlers::attendance_sheet)
                .service(guru_handlers::save_attendance),
        )
        .service(
            web::scope("/siswa")
                .service(siswa_handlers::dashboard)
                .service(siswa_handlers::jadwal)
                .service(siswa_handlers::nilai)
                .service(siswa_handlers::absensi)
                .service(siswa_handlers::pengumuman),
        )
        .service(
            web::scope("/ortu")
                .service(ortu_handlers::dashboard)
                .service(ortu_handlers::nilai)
                .service(ortu_handlers::absensi)
                .service(ortu_handlers::pengumuman),
        );
}
