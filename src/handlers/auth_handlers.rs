use actix_web::{HttpResponse, get, post, web};
use serde_json::Value;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::auth_dtos::{LoginIn, OnboardingOut, RegisterOrtuIn, RegisterOut, SessionView};
use crate::errors::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::middleware::role_guard::AnySession;
use crate::services::auth_service::AuthService;

use super::looks_like_email;

/// POST /auth/login
/// Body: {identifier, password, method: email|nip|nisn}
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, AppError> {
    if body.identifier.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Identifier dan password wajib diisi".to_string(),
        ));
    }

    let out = AuthService::new(&state).login(&body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Login berhasil", out)))
}

/// POST /auth/register
/// Registrasi mandiri khusus ortu; guru dan siswa dibuatkan akun oleh admin.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterOrtuIn>,
) -> Result<HttpResponse, AppError> {
    if body.first_name.trim().is_empty()
        || body.last_name.trim().is_empty()
        || body.email.trim().is_empty()
        || body.phone.trim().is_empty()
        || body.nisn_anak.trim().is_empty()
    {
        return Err(AppError::Validation("Semua field wajib diisi".to_string()));
    }
    if !looks_like_email(body.email.trim()) {
        return Err(AppError::Validation("Format email tidak valid".to_string()));
    }
    if body.password.len() < 6 {
        return Err(AppError::Validation(
            "Password minimal 6 karakter".to_string(),
        ));
    }
    if body.password != body.confirm_password {
        return Err(AppError::Validation(
            "Konfirmasi password tidak cocok".to_string(),
        ));
    }

    let user_id = AuthService::new(&state).register_ortu(&body).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Registrasi berhasil. Silakan login.",
        RegisterOut {
            user_id,
            next_step: "login".to_string(),
        },
    )))
}

/// POST /auth/logout
/// Audit log dicatat kalau sesinya masih bisa di-resolve; token dicabut
/// apa pun hasilnya.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let svc = AuthService::new(&state);
    let ctx = svc.resolve_session(user.user_id).await.ok();
    svc.logout(ctx.as_ref(), &user.token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Logout berhasil")))
}

/// GET /auth/session
/// Restore sesi dari token; bentuknya sama dengan hasil login supaya client
/// memakai satu resolver.
#[get("/session")]
pub async fn session(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let ctx = AuthService::new(&state).resolve_session(user.user_id).await?;
    let needs_onboarding = ctx.needs_onboarding();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Sesi aktif",
        SessionView {
            user: ctx.user,
            role: ctx.role,
            profile: ctx.profile,
            needs_onboarding,
        },
    )))
}

/// POST /auth/onboarding
/// Guru/siswa melengkapi profilnya sendiri. Body bebas, difilter whitelist
/// per role di service.
#[post("/onboarding")]
pub async fn onboarding(
    state: web::Data<AppState>,
    sess: AnySession,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let profile = AuthService::new(&state)
        .complete_onboarding(&sess.0, &body)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Profil berhasil dilengkapi",
        OnboardingOut {
            profile,
            next_step: "dashboard".to_string(),
        },
    )))
}
