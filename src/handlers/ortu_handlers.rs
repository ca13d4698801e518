//! Halaman ortu: memantau satu anak yang tertaut ke akunnya saat registrasi.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::errors::AppError;
use crate::middleware::role_guard::OrtuSession;
use crate::models::kelas::Kelas;
use crate::models::siswa::Siswa;
use crate::models::user::Role;
use crate::repositories::announcement_repository::AnnouncementRepository;
use crate::repositories::attendance_repository::AttendanceRepository;
use crate::repositories::grade_repository::GradeRepository;
use crate::repositories::kelas_repository::KelasRepository;
use crate::repositories::siswa_repository::SiswaRepository;
use crate::repositories::subject_repository::SubjectRepository;

use super::{AttendanceSummary, attendance_summary, average};

async fn child_of(state: &AppState, sess: &OrtuSession) -> Result<Siswa, AppError> {
    SiswaRepository::find_by_id(&state.store, sess.ortu.siswa_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Data siswa tidak ditemukan".to_string()))
}

#[derive(Serialize)]
struct OrtuDashboard {
    siswa: Siswa,
    kelas: Option<Kelas>,
    rata_rata_nilai: Option<f64>,
    total_mapel: u64,
    kehadiran: AttendanceSummary,
}

/// GET /ortu/dashboard
/// Kehadiran anak dihitung dari seluruh riwayat, bukan jendela 30 hari.
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    sess: OrtuSession,
) -> Result<HttpResponse, AppError> {
    let siswa = child_of(&state, &sess).await?;

    let (kelas, total_mapel) = match siswa.class_id {
        Some(class_id) => (
            KelasRepository::find_by_id(&state.store, class_id).await?,
            SubjectRepository::count_by_class(&state.store, class_id).await?,
        ),
        None => (None, 0),
    };
    let values = GradeRepository::values_for_siswa(&state.store, siswa.id).await?;
    let records = AttendanceRepository::all_for_siswa(&state.store, siswa.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Dashboard orang tua",
        OrtuDashboard {
            rata_rata_nilai: average(&values),
            total_mapel,
            kehadiran: attendance_summary(&records),
            siswa,
            kelas,
        },
    )))
}

/// GET /ortu/nilai
#[get("/nilai")]
pub async fn nilai(
    state: web::Data<AppState>,
    sess: OrtuSession,
) -> Result<HttpResponse, AppError> {
    let grades = GradeRepository::list_for_siswa(&state.store, sess.ortu.siswa_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Nilai anak", grades)))
}

/// GET /ortu/absensi
#[get("/absensi")]
pub async fn absensi(
    state: web::Data<AppState>,
    sess: OrtuSession,
) -> Result<HttpResponse, AppError> {
    let records = AttendanceRepository::list_for_siswa(&state.store, sess.ortu.siswa_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Absensi anak", records)))
}

/// GET /ortu/pengumuman
#[get("/pengumuman")]
pub async fn pengumuman(
    state: web::Data<AppState>,
    _sess: OrtuSession,
) -> Result<HttpResponse, AppError> {
    let items = AnnouncementRepository::list_for_role(&state.store, Role::Ortu).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Pengumuman", items)))
}
