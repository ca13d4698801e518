use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::AppState;
use crate::errors::AppError;
use crate::models::user::JwtClaims;

/// Pemegang access token yang tanda tangannya sudah diverifikasi.
/// Belum tentu terdaftar di tabel `users`; itu urusan guard role.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub token: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(Error::from))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Unauthorized("Konfigurasi aplikasi tidak lengkap".to_string()))?;

    let token = bearer_token(req)?;
    let claims = verify_token(&token, &state.settings.supabase_jwt_secret)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Token tidak membawa identitas valid".to_string()))?;

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
        token,
    })
}

fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Header Authorization tidak ada".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Format header Authorization harus Bearer".to_string())
        })?;
    Ok(token.to_string())
}

/// Verifikasi penuh HS256: tanda tangan, masa berlaku, dan audience
/// `authenticated` milik Supabase.
fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);

    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Sesi tidak valid atau kedaluwarsa".to_string()))
}
