//! Halaman guru: dashboard, kelas yang diampu, input nilai dan absensi.
//! Semua endpoint memastikan mapel/kelas yang disentuh memang diampu guru
//! yang sedang login.

use actix_web::{HttpResponse, get, put, web};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::guru_dtos::{
    AttendanceSheetQuery, GradeSheetQuery, SaveAttendanceIn, SaveGradesIn,
};
use crate::errors::AppError;
use crate::middleware::role_guard::GuruSession;
use crate::models::attendance::AttendanceStatus;
use crate::models::subject::Subject;
use crate::models::user::Role;
use crate::repositories::announcement_repository::AnnouncementRepository;
use crate::repositories::attendance_repository::{AttendanceRepository, NewAttendance};
use crate::repositories::grade_repository::{GradeRepository, NewGrade};
use crate::repositories::schedule_repository::{ScheduleDetailed, ScheduleRepository};
use crate::repositories::siswa_repository::SiswaRepository;
use crate::repositories::subject_repository::SubjectRepository;

use super::average;

/// Hari ini dalam konvensi jadwal: 1 = Senin sampai 7 = Minggu.
fn today_day_of_week() -> u8 {
    Local::now().date_naive().weekday().number_from_monday() as u8
}

/// Ambil mapel dan pastikan pengampunya guru yang login.
async fn owned_subject(
    state: &AppState,
    guru_id: Uuid,
    subject_id: Uuid,
) -> Result<Subject, AppError> {
    let subject = SubjectRepository::find_by_id(&state.store, subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Mata pelajaran tidak ditemukan".to_string()))?;
    if subject.guru_id != Some(guru_id) {
        return Err(AppError::Forbidden);
    }
    Ok(subject)
}

fn class_of(subject: &Subject) -> Result<Uuid, AppError> {
    subject.class_id.ok_or_else(|| {
        AppError::Validation("Mata pelajaran belum terhubung ke kelas mana pun".to_string())
    })
}

#[derive(Serialize)]
struct GuruDashboard {
    total_kelas: usize,
    total_mapel: u64,
    total_siswa: usize,
    rata_rata_nilai: Option<f64>,
    absen_terakhir: Option<NaiveDate>,
    jadwal_hari_ini: Vec<ScheduleDetailed>,
}

/// GET /guru/dashboard
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    sess: GuruSession,
) -> Result<HttpResponse, AppError> {
    let guru_id = sess.guru.id;

    let class_ids = SubjectRepository::class_ids_of_guru(&state.store, guru_id).await?;
    let mut total_siswa = 0;
    for class_id in &class_ids {
        total_siswa += SiswaRepository::ids_by_class(&state.store, *class_id)
            .await?
            .len();
    }

    let total_mapel = SubjectRepository::count_by_guru(&state.store, guru_id).await?;
    let values = GradeRepository::values_for_guru(&state.store, guru_id).await?;
    let rata_rata_nilai = average(&values);
    let absen_terakhir = AttendanceRepository::last_date_for_guru(&state.store, guru_id).await?;
    let jadwal_hari_ini =
        ScheduleRepository::today_for_guru(&state.store, guru_id, today_day_of_week()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Dashboard guru",
        GuruDashboard {
            total_kelas: class_ids.len(),
            total_mapel,
            total_siswa,
            rata_rata_nilai,
            absen_terakhir,
            jadwal_hari_ini,
        },
    )))
}

#[derive(Serialize)]
struct KelasDiampu {
    id: Uuid,
    name: String,
    jumlah_siswa: usize,
}

/// GET /guru/kelas - kelas yang diampu, diturunkan dari mapel.
#[get("/kelas")]
pub async fn list_kelas(
    state: web::Data<AppState>,
    sess: GuruSession,
) -> Result<HttpResponse, AppError> {
    let kelas = SubjectRepository::classes_of_guru(&state.store, sess.guru.id).await?;
    let mut out = Vec::with_capacity(kelas.len());
    for k in kelas {
        let jumlah_siswa = SiswaRepository::ids_by_class(&state.store, k.id).await?.len();
        out.push(KelasDiampu {
            id: k.id,
            name: k.name,
            jumlah_siswa,
        });
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success("Kelas yang diampu", out)))
}

/// GET /guru/kelas/{id}/siswa
#[get("/kelas/{id}/siswa")]
pub async fn list_siswa_kelas(
    state: web::Data<AppState>,
    sess: GuruSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let class_id = path.into_inner();
    let class_ids = SubjectRepository::class_ids_of_guru(&state.store, sess.guru.id).await?;
    if !class_ids.contains(&class_id) {
        return Err(AppError::Forbidden);
    }
    let siswas = SiswaRepository::list_by_class(&state.store, class_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar siswa", siswas)))
}

/// GET /guru/mapel - mapel yang diampu, untuk pilihan lembar nilai/absensi.
#[get("/mapel")]
pub async fn list_mapel(
    state: web::Data<AppState>,
    sess: GuruSession,
) -> Result<HttpResponse, AppError> {
    let subjects = SubjectRepository::list_by_guru(&state.store, sess.guru.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Mata pelajaran yang diampu", subjects)))
}

/// GET /guru/jadwal
#[get("/jadwal")]
pub async fn jadwal(
    state: web::Data<AppState>,
    sess: GuruSession,
) -> Result<HttpResponse, AppError> {
    let schedules = ScheduleRepository::list_for_guru(&state.store, sess.guru.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Jadwal mengajar", schedules)))
}

/// GET /guru/pengumuman
#[get("/pengumuman")]
pub async fn pengumuman(
    state: web::Data<AppState>,
    _sess: GuruSession,
) -> Result<HttpResponse, AppError> {
    let items = AnnouncementRepository::list_for_role(&state.store, Role::Guru).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Pengumuman", items)))
}

// ---------- lembar nilai ----------

#[derive(Serialize)]
struct GradeSheetRow {
    siswa_id: Uuid,
    nisn: Option<String>,
    first_name: String,
    last_name: String,
    value: Option<f64>,
}

/// GET /guru/nilai?subject_id=..&type=tugas|uts|uas
/// Lembar input: seluruh siswa kelas mapel itu, nilai lama ikut terisi.
#[get("/nilai")]
pub async fn grade_sheet(
    state: web::Data<AppState>,
    sess: GuruSession,
    query: web::Query<GradeSheetQuery>,
) -> Result<HttpResponse, AppError> {
    let subject = owned_subject(&state, sess.guru.id, query.subject_id).await?;
    let class_id = class_of(&subject)?;

    let siswas = SiswaRepository::list_by_class(&state.store, class_id).await?;
    let siswa_ids: Vec<Uuid> = siswas.iter().map(|s| s.id).collect();
    let existing =
        GradeRepository::existing_for(&state.store, subject.id, query.kind, &siswa_ids).await?;

    let rows: Vec<GradeSheetRow> = siswas
        .into_iter()
        .map(|s| GradeSheetRow {
            value: existing
                .iter()
                .find(|g| g.siswa_id == s.id)
                .map(|g| g.value),
            siswa_id: s.id,
            nisn: s.nisn,
            first_name: s.first_name,
            last_name: s.last_name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Lembar nilai", rows)))
}

/// PUT /guru/nilai
/// Menimpa nilai lama mapel+jenis itu untuk siswa yang dikirim.
#[put("/nilai")]
pub async fn save_grades(
    state: web::Data<AppState>,
    sess: GuruSession,
    body: web::Json<SaveGradesIn>,
) -> Result<HttpResponse, AppError> {
    if body.entries.is_empty() {
        return Err(AppError::Validation(
            "Tidak ada data nilai untuk disimpan".to_string(),
        ));
    }
    if body.entries.iter().any(|e| !(0.0..=100.0).contains(&e.value)) {
        return Err(AppError::Validation(
            "Nilai harus di antara 0 dan 100".to_string(),
        ));
    }

    owned_subject(&state, sess.guru.id, body.subject_id).await?;

    let new_grades: Vec<NewGrade> = body
        .entries
        .iter()
        .map(|e| NewGrade {
            siswa_id: e.siswa_id,
            subject_id: body.subject_id,
            guru_id: sess.guru.id,
            kind: body.kind,
            value: e.value,
            max_value: 100.0,
        })
        .collect();

    let saved = GradeRepository::replace_bulk(&state.store, &state.hub, &new_grades).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Nilai berhasil disimpan", saved)))
}

// ---------- lembar absensi ----------

#[derive(Serialize)]
struct AttendanceSheetRow {
    siswa_id: Uuid,
    nisn: Option<String>,
    first_name: String,
    last_name: String,
    status: Option<AttendanceStatus>,
}

/// GET /guru/absensi?subject_id=..&date=YYYY-MM-DD
#[get("/absensi")]
pub async fn attendance_sheet(
    state: web::Data<AppState>,
    sess: GuruSession,
    query: web::Query<AttendanceSheetQuery>,
) -> Result<HttpResponse, AppError> {
    let subject = owned_subject(&state, sess.guru.id, query.subject_id).await?;
    let class_id = class_of(&subject)?;

    let siswas = SiswaRepository::list_by_class(&state.store, class_id).await?;
    let existing = AttendanceRepository::existing_for(&state.store, subject.id, query.date).await?;

    let rows: Vec<AttendanceSheetRow> = siswas
        .into_iter()
        .map(|s| AttendanceSheetRow {
            status: existing
                .iter()
                .find(|a| a.siswa_id == s.id)
                .map(|a| a.status),
            siswa_id: s.id,
            nisn: s.nisn,
            first_name: s.first_name,
            last_name: s.last_name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Lembar absensi", rows)))
}

/// PUT /guru/absensi
/// Menimpa catatan lama mapel+tanggal itu untuk siswa yang dikirim.
#[put("/absensi")]
pub async fn save_attendance(
    state: web::Data<AppState>,
    sess: GuruSession,
    body: web::Json<SaveAttendanceIn>,
) -> Result<HttpResponse, AppError> {
    if body.entries.is_empty() {
        return Err(AppError::Validation(
            "Tidak ada data absensi untuk disimpan".to_string(),
        ));
    }

    owned_subject(&state, sess.guru.id, body.subject_id).await?;

    let new_rows: Vec<NewAttendance> = body
        .entries
        .iter()
        .map(|e| NewAttendance {
            siswa_id: e.siswa_id,
            subject_id: body.subject_id,
            guru_id: sess.guru.id,
            date: body.date,
            status: e.status,
        })
        .collect();

    let saved = AttendanceRepository::replace_bulk(&state.store, &state.hub, &new_rows).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Absensi berhasil disimpan", saved)))
}
