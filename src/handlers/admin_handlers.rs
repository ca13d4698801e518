use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::admin_dtos::{KelasForm, RecapQuery, ScheduleForm};
use crate::errors::AppError;
use crate::middleware::role_guard::AdminSession;
use crate::repositories::activity_log_repository::{ActivityLogRepository, ActivityWithUser};
use crate::repositories::announcement_repository::AnnouncementRepository;
use crate::repositories::attendance_repository::AttendanceRepository;
use crate::repositories::grade_repository::GradeRepository;
use crate::repositories::guru_repository::GuruRepository;
use crate::repositories::kelas_repository::KelasRepository;
use crate::repositories::schedule_repository::ScheduleRepository;
use crate::repositories::siswa_repository::SiswaRepository;
use crate::repositories::subject_repository::SubjectRepository;

#[derive(Serialize)]
struct AdminDashboard {
    total_guru: u64,
    total_siswa: u64,
    total_kelas: u64,
    total_pengumuman: u64,
    aktivitas_terbaru: Vec<ActivityWithUser>,
}

/// GET /admin/dashboard
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let total_guru = GuruRepository::count(&state.store).await?;
    let total_siswa = SiswaRepository::count(&state.store).await?;
    let total_kelas = KelasRepository::count(&state.store).await?;
    let total_pengumuman = AnnouncementRepository::count(&state.store).await?;
    let aktivitas_terbaru = ActivityLogRepository::recent(&state.store, 10).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Dashboard admin",
        AdminDashboard {
            total_guru,
            total_siswa,
            total_kelas,
            total_pengumuman,
            aktivitas_terbaru,
        },
    )))
}

// ---------- opsi dropdown form ----------

/// GET /admin/opsi/guru - guru aktif untuk pilihan wali kelas / pengampu.
#[get("/opsi/guru")]
pub async fn opsi_guru(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let gurus = GuruRepository::list_active_brief(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar guru aktif", gurus)))
}

/// GET /admin/opsi/kelas
#[get("/opsi/kelas")]
pub async fn opsi_kelas(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let kelas = KelasRepository::list(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar kelas", kelas)))
}

/// GET /admin/opsi/mapel
#[get("/opsi/mapel")]
pub async fn opsi_mapel(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let subjects = SubjectRepository::list(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar mata pelajaran", subjects)))
}

// ---------- kelas ----------

fn validate_kelas(form: &KelasForm) -> Result<(), AppError> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("Nama kelas wajib diisi".to_string()));
    }
    Ok(())
}

/// GET /admin/kelas
#[get("/kelas")]
pub async fn list_kelas(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let kelas = KelasRepository::list(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar kelas", kelas)))
}

/// POST /admin/kelas
#[post("/kelas")]
pub async fn create_kelas(
    state: web::Data<AppState>,
    _sess: AdminSession,
    body: web::Json<KelasForm>,
) -> Result<HttpResponse, AppError> {
    validate_kelas(&body)?;
    let kelas = KelasRepository::insert(&state.store, &state.hub, &body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Kelas berhasil dibuat", kelas)))
}

/// PUT /admin/kelas/{id}
#[put("/kelas/{id}")]
pub async fn update_kelas(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<KelasForm>,
) -> Result<HttpResponse, AppError> {
    validate_kelas(&body)?;
    let kelas = KelasRepository::update(&state.store, &state.hub, path.into_inner(), &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Kelas tidak ditemukan".to_string()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Kelas berhasil diperbarui", kelas)))
}

/// DELETE /admin/kelas/{id}
#[delete("/kelas/{id}")]
pub async fn delete_kelas(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if KelasRepository::find_by_id(&state.store, id).await?.is_none() {
        return Err(AppError::NotFound("Kelas tidak ditemukan".to_string()));
    }
    KelasRepository::delete(&state.store, &state.hub, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Kelas berhasil dihapus")))
}

// ---------- jadwal ----------

fn validate_schedule(form: &ScheduleForm) -> Result<(), AppError> {
    if !(1..=7).contains(&form.day_of_week) {
        return Err(AppError::Validation(
            "Hari tidak valid (1 = Senin sampai 7 = Minggu)".to_string(),
        ));
    }
    if form.start_time >= form.end_time {
        return Err(AppError::Validation(
            "Waktu mulai harus sebelum waktu selesai".to_string(),
        ));
    }
    Ok(())
}

/// GET /admin/jadwal
#[get("/jadwal")]
pub async fn list_jadwal(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let schedules = ScheduleRepository::list_detailed(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar jadwal", schedules)))
}

/// POST /admin/jadwal
/// Bentrok dicek terhadap semua jadwal kelas itu di hari yang sama sebelum
/// insert.
#[post("/jadwal")]
pub async fn create_jadwal(
    state: web::Data<AppState>,
    _sess: AdminSession,
    body: web::Json<ScheduleForm>,
) -> Result<HttpResponse, AppError> {
    validate_schedule(&body)?;
    let conflict = ScheduleRepository::has_conflict(
        &state.store,
        body.class_id,
        body.day_of_week,
        body.start_time,
        body.end_time,
        None,
    )
    .await?;
    if conflict {
        return Err(AppError::Conflict(
            "Terjadi konflik jadwal dengan kelas yang sama".to_string(),
        ));
    }

    let schedule = ScheduleRepository::insert(&state.store, &state.hub, &body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Jadwal berhasil dibuat", schedule)))
}

/// PUT /admin/jadwal/{id}
/// Cek bentrok juga berlaku saat edit; baris yang diedit dikecualikan.
#[put("/jadwal/{id}")]
pub async fn update_jadwal(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<ScheduleForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    validate_schedule(&body)?;
    let conflict = ScheduleRepository::has_conflict(
        &state.store,
        body.class_id,
        body.day_of_week,
        body.start_time,
        body.end_time,
        Some(id),
    )
    .await?;
    if conflict {
        return Err(AppError::Conflict(
            "Terjadi konflik jadwal dengan kelas yang sama".to_string(),
        ));
    }

    let schedule = ScheduleRepository::update(&state.store, &state.hub, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Jadwal tidak ditemukan".to_string()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Jadwal berhasil diperbarui", schedule)))
}

/// DELETE /admin/jadwal/{id}
#[delete("/jadwal/{id}")]
pub async fn delete_jadwal(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    ScheduleRepository::delete(&state.store, &state.hub, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Jadwal berhasil dihapus")))
}

// ---------- rekap ----------

/// GET /admin/rekap/nilai?class_id=..&subject_id=..
#[get("/rekap/nilai")]
pub async fn rekap_nilai(
    state: web::Data<AppState>,
    _sess: AdminSession,
    query: web::Query<RecapQuery>,
) -> Result<HttpResponse, AppError> {
    let siswa_ids = SiswaRepository::ids_by_class(&state.store, query.class_id).await?;
    let rows = GradeRepository::recap(&state.store, &siswa_ids, query.subject_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Rekap nilai", rows)))
}

/// GET /admin/rekap/absensi?class_id=..&subject_id=..
#[get("/rekap/absensi")]
pub async fn rekap_absensi(
    state: web::Data<AppState>,
    _sess: AdminSession,
    query: web::Query<RecapQuery>,
) -> Result<HttpResponse, AppError> {
    let siswa_ids = SiswaRepository::ids_by_class(&state.store, query.class_id).await?;
    let rows = AttendanceRepository::recap(&state.store, &siswa_ids, query.subject_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Rekap absensi", rows)))
}
