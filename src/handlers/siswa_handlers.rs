//! Halaman siswa: semuanya read-only atas data milik siswa yang login.

use actix_web::{HttpResponse, get, web};
use chrono::{Datelike, Duration, Local};
use serde::Serialize;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::errors::AppError;
use crate::middleware::role_guard::SiswaSession;
use crate::models::user::Role;
use crate::repositories::announcement_repository::AnnouncementRepository;
use crate::repositories::attendance_repository::AttendanceRepository;
use crate::repositories::grade_repository::GradeRepository;
use crate::repositories::schedule_repository::{ScheduleDetailed, ScheduleRepository};
use crate::repositories::subject_repository::SubjectRepository;

use super::{AttendanceSummary, attendance_summary, average};

#[derive(Serialize)]
struct SiswaDashboard {
    rata_rata_nilai: Option<f64>,
    kehadiran_30_hari: AttendanceSummary,
    total_mapel: u64,
    jadwal_hari_ini: Vec<ScheduleDetailed>,
}

/// GET /siswa/dashboard
/// Kehadiran dihitung dari 30 hari terakhir saja.
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    sess: SiswaSession,
) -> Result<HttpResponse, AppError> {
    let values = GradeRepository::values_for_siswa(&state.store, sess.siswa.id).await?;
    let rata_rata_nilai = average(&values);

    let since = Local::now().date_naive() - Duration::days(30);
    let records = AttendanceRepository::for_siswa_since(&state.store, sess.siswa.id, since).await?;
    let kehadiran_30_hari = attendance_summary(&records);

    let (total_mapel, jadwal_hari_ini) = match sess.siswa.class_id {
        Some(class_id) => {
            let today = Local::now().date_naive().weekday().number_from_monday() as u8;
            let jadwal_list =
                ScheduleRepository::today_for_class(&state.store, class_id, today).await?;
            let mapel = SubjectRepository::count_by_class(&state.store, class_id).await?;
            (mapel, jadwal_list)
        }
        None => (0, Vec::new()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Dashboard siswa",
        SiswaDashboard {
            rata_rata_nilai,
            kehadiran_30_hari,
            total_mapel,
            jadwal_hari_ini,
        },
    )))
}

/// GET /siswa/jadwal
#[get("/jadwal")]
pub async fn jadwal(
    state: web::Data<AppState>,
    sess: SiswaSession,
) -> Result<HttpResponse, AppError> {
    let schedules = match sess.siswa.class_id {
        Some(class_id) => ScheduleRepository::list_for_class(&state.store, class_id).await?,
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success("Jadwal pelajaran", schedules)))
}

/// GET /siswa/nilai
#[get("/nilai")]
pub async fn nilai(
    state: web::Data<AppState>,
    sess: SiswaSession,
) -> Result<HttpResponse, AppError> {
    let grades = GradeRepository::list_for_siswa(&state.store, sess.siswa.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar nilai", grades)))
}

/// GET /siswa/absensi
#[get("/absensi")]
pub async fn absensi(
    state: web::Data<AppState>,
    sess: SiswaSession,
) -> Result<HttpResponse, AppError> {
    let records = AttendanceRepository::list_for_siswa(&state.store, sess.siswa.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Riwayat absensi", records)))
}

/// GET /siswa/pengumuman
#[get("/pengumuman")]
pub async fn pengumuman(
    state: web::Data<AppState>,
    _sess: SiswaSession,
) -> Result<HttpResponse, AppError> {
    let items = AnnouncementRepository::list_for_role(&state.store, Role::Siswa).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Pengumuman", items)))
}
