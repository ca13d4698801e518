use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use crate::AppState;
use crate::errors::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::guru::Guru;
use crate::models::ortu::Ortu;
use crate::models::siswa::Siswa;
use crate::models::user::Role;
use crate::services::auth_service::AuthService;
use crate::services::session::SessionContext;

/// Sesi valid dengan role apa pun; dipakai endpoint lintas role
/// (logout, /auth/session, onboarding, stream event).
pub struct AnySession(pub SessionContext);

pub struct AdminSession(pub SessionContext);

pub struct GuruSession {
    pub ctx: SessionContext,
    pub guru: Guru,
}

pub struct SiswaSession {
    pub ctx: SessionContext,
    pub siswa: Siswa,
}

pub struct OrtuSession {
    pub ctx: SessionContext,
    pub ortu: Ortu,
}

/// Resolusi sesi dari token + tabel, lalu gate role. Token salah -> 401,
/// role lain -> 403, profil guru/siswa belum lengkap -> 403 + next_step
/// onboarding.
fn resolve_session(
    req: &HttpRequest,
    payload: &mut Payload,
    want: Option<Role>,
) -> LocalBoxFuture<'static, Result<SessionContext, Error>> {
    let auth = AuthenticatedUser::from_request(req, payload);
    let state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
        let user = auth.await?;
        let state = state.ok_or_else(|| {
            Error::from(AppError::Unauthorized(
                "Konfigurasi aplikasi tidak lengkap".to_string(),
            ))
        })?;

        let ctx = AuthService::new(&state)
            .resolve_session(user.user_id)
            .await
            .map_err(Error::from)?;

        if let Some(want) = want {
            if ctx.role != want {
                return Err(AppError::Forbidden.into());
            }
            if ctx.needs_onboarding() {
                return Err(AppError::ProfileIncomplete.into());
            }
        }
        Ok(ctx)
    })
}

impl FromRequest for AnySession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = resolve_session(req, payload, None);
        Box::pin(async move { Ok(AnySession(fut.await?)) })
    }
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = resolve_session(req, payload, Some(Role::Admin));
        Box::pin(async move { Ok(AdminSession(fut.await?)) })
    }
}

impl FromRequest for GuruSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = resolve_session(req, payload, Some(Role::Guru));
        Box::pin(async move {
            let ctx = fut.await?;
            let guru = ctx
                .guru()
                .cloned()
                .ok_or_else(|| AppError::NotFound("Profil guru tidak ditemukan".to_string()))?;
            Ok(GuruSession { ctx, guru })
        })
    }
}

impl FromRequest for SiswaSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = resolve_session(req, payload, Some(Role::Siswa));
        Box::pin(async move {
            let ctx = fut.await?;
            let siswa = ctx
                .siswa()
                .cloned()
                .ok_or_else(|| AppError::NotFound("Profil siswa tidak ditemukan".to_string()))?;
            Ok(SiswaSession { ctx, siswa })
        })
    }
}

impl FromRequest for OrtuSession {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = resolve_session(req, payload, Some(Role::Ortu));
        Box::pin(async move {
            let ctx = fut.await?;
            let ortu = ctx
                .ortu()
                .cloned()
                .ok_or_else(|| AppError::NotFound("Profil ortu tidak ditemukan".to_string()))?;
            Ok(OrtuSession { ctx, ortu })
        })
    }
}
