//! Kelola pengumuman dari panel admin. Setiap mutasi diterbitkan ke hub
//! realtime supaya widget pengumuman klien langsung terbarui.

use actix_web::{HttpResponse, delete, get, post, put, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::admin_dtos::{AnnouncementForm, PublishIn};
use crate::errors::AppError;
use crate::middleware::role_guard::AdminSession;
use crate::repositories::announcement_repository::AnnouncementRepository;

fn validate_announcement(form: &AnnouncementForm) -> Result<(), AppError> {
    if form.title.trim().is_empty() || form.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Judul dan isi pengumuman wajib diisi".to_string(),
        ));
    }
    Ok(())
}

/// GET /admin/pengumuman - semua pengumuman, termasuk draf.
#[get("/pengumuman")]
pub async fn list_pengumuman(
    state: web::Data<AppState>,
    _sess: AdminSession,
) -> Result<HttpResponse, AppError> {
    let items = AnnouncementRepository::list_all(&state.store).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Daftar pengumuman", items)))
}

/// POST /admin/pengumuman
#[post("/pengumuman")]
pub async fn create_pengumuman(
    state: web::Data<AppState>,
    sess: AdminSession,
    body: web::Json<AnnouncementForm>,
) -> Result<HttpResponse, AppError> {
    validate_announcement(&body)?;
    let item =
        AnnouncementRepository::insert(&state.store, &state.hub, &body, sess.0.user.id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Pengumuman berhasil dibuat", item)))
}

/// PUT /admin/pengumuman/{id}
#[put("/pengumuman/{id}")]
pub async fn update_pengumuman(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<AnnouncementForm>,
) -> Result<HttpResponse, AppError> {
    validate_announcement(&body)?;
    let item = AnnouncementRepository::update(&state.store, &state.hub, path.into_inner(), &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Pengumuman tidak ditemukan".to_string()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Pengumuman berhasil diperbarui", item)))
}

/// PUT /admin/pengumuman/{id}/publish - terbitkan atau tarik kembali.
#[put("/pengumuman/{id}/publish")]
pub async fn publish_pengumuman(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
    body: web::Json<PublishIn>,
) -> Result<HttpResponse, AppError> {
    let item = AnnouncementRepository::set_published(
        &state.store,
        &state.hub,
        path.into_inner(),
        body.is_published,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Pengumuman tidak ditemukan".to_string()))?;

    let message = if body.is_published {
        "Pengumuman diterbitkan"
    } else {
        "Pengumuman ditarik kembali"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, item)))
}

/// DELETE /admin/pengumuman/{id}
#[delete("/pengumuman/{id}")]
pub async fn delete_pengumuman(
    state: web::Data<AppState>,
    _sess: AdminSession,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if AnnouncementRepository::find_by_id(&state.store, id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Pengumuman tidak ditemukan".to_string()));
    }
    AnnouncementRepository::delete(&state.store, &state.hub, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Pengumuman berhasil dihapus")))
}
