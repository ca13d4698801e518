//! CRUD akun guru dan siswa dari panel admin. Pembuatan akun memakai
//! admin API auth provider, jadi tidak ada sesi siapa pun yang berubah.

use actix_web::{HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::admin_dtos::{GuruForm, SiswaForm};
use crate::errors::AppError;
use crate::middleware::role_guard::AdminSession;
use crate::repositories::guru_repository::GuruRepository;
use crate::repositories::siswa_repository::SiswaRepository;
use crate::services::provision_service::ProvisionService;

use super::looks_like_email;

fn validate_person(first_name: &str, last_name: &str, email: &str) -> Result<(), AppError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() || email.trim().is_empty() {
        return Err(AppError::Validation(
            "Nama depan, nama belakang, dan email wajib diisi".to_string(),
        ));
    }
    if !looks_like_email(email.trim()) {
        return Err(AppError::Validation("Format email tidak valid".to_string()));
    }
    Ok(())
}

// ---------- guru ----------

/// GET /admin/guru
#[get("/guru")]
pub async fn list_guru(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let gurus = GuruRepository::list(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar guru", gurus)))
}

/// POST /admin/guru
/// Membuat akun login + baris profil sekaligus, password default.
#[post("/guru")]
pub async fn create_guru(
    state: web::Data<AppState>,
    _sess: AdminSession,
    body: web::Json<GuruForm>,
) -> Result<HttpResponse, AppError> {
    validate_person(&body.first_name, &body.last_name, &body.email)?;
    let guru = ProvisionService::new(&state).create_guru(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Guru berhasil ditambahkan. Password awal: password123",
        guru,
    )))
}

/// PUT /admin/guru/{id}
#[put("/guru/{id}")]
pub async fn update_guru(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<GuruForm>,
) -> Result<HttpResponse, AppError> {
    validate_person(&body.first_name, &body.last_name, &body.email)?;
    let guru = ProvisionService::new(&state)
        .update_guru(path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Data guru berhasil diperbarui", guru)))
}

/// DELETE /admin/guru/{id}
#[delete("/guru/{id}")]
pub async fn delete_guru(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    ProvisionService::new(&state)
        .delete_guru(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Guru berhasil dihapus")))
}

/// POST /admin/guru/{id}/reset-password
#[post("/guru/{id}/reset-password")]
pub async fn reset_guru_password(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    ProvisionService::new(&state)
        .reset_guru_password(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "Password guru direset ke password awal",
    )))
}

// ---------- siswa ----------

/// GET /admin/siswa
#[get("/siswa")]
pub async fn list_siswa(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let siswas = SiswaRepository::list_with_kelas(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar siswa", siswas)))
}

/// POST /admin/siswa
#[post("/siswa")]
pub async fn create_siswa(
    state: web::Data<AppState>,
    _sess: AdminSession,
    body: web::Json<SiswaForm>,
) -> Result<HttpResponse, AppError> {
    validate_person(&body.first_name, &body.last_name, &body.email)?;
    let siswa = ProvisionService::new(&state).create_siswa(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Siswa berhasil ditambahkan. Password awal: password123",
        siswa,
    )))
}

/// PUT /admin/siswa/{id}
#[put("/siswa/{id}")]
pub async fn update_siswa(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<SiswaForm>,
) -> Result<HttpResponse, AppError> {
    validate_person(&body.first_name, &body.last_name, &body.email)?;
    let siswa = ProvisionService::new(&state)
        .update_siswa(path.into_inner(), &body)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Data siswa berhasil diperbarui", siswa)))
}

/// DELETE /admin/siswa/{id}
#[delete("/siswa/{id}")]
pub async fn delete_siswa(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    ProvisionService::new(&state)
        .delete_siswa(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Siswa berhasil dihapus")))
}

/// POST /admin/siswa/{id}/reset-password
#[post("/siswa/{id}/reset-password")]
pub async fn reset_siswa_password(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    ProvisionService::new(&state)
        .reset_siswa_password(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message(
        "Password siswa direset ke password awal",
    )))
}
