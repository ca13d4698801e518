use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::{Value, json};
use thiserror::Error;

use crate::supabase::auth_api::{AuthApiError, AuthErrorKind};
use crate::supabase::postgrest::StoreError;

/// Error level aplikasi. Pesan pada varian 4xx ditampilkan apa adanya ke
/// client; kegagalan store dirahasiakan dan diganti pesan generik.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Auth(#[from] AuthApiError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Anda tidak memiliki akses ke halaman ini")]
    Forbidden,
    #[error("Profil belum lengkap. Selesaikan onboarding terlebih dahulu.")]
    ProfileIncomplete,
    #[error("gagal mengakses penyimpanan: {0}")]
    Store(#[from] StoreError),
    #[error("{primary} (pembersihan gagal: {cleanup})")]
    Composite {
        primary: Box<AppError>,
        cleanup: Box<AppError>,
    },
}

impl AppError {
    fn user_message(&self) -> String {
        match self {
            // detail store tidak bocor ke client
            AppError::Store(_) => "Gagal memproses permintaan. Silakan coba lagi.".to_string(),
            AppError::Composite { primary, .. } => primary.user_message(),
            other => other.to_string(),
        }
    }

    fn extra_data(&self) -> Value {
        match self {
            AppError::ProfileIncomplete => json!({ "next_step": "onboarding" }),
            AppError::Unauthorized(_) => json!({ "next_step": "login" }),
            _ => Value::Null,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => match e.kind {
                AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthErrorKind::EmailExists => StatusCode::CONFLICT,
                AuthErrorKind::JwtConfig => StatusCode::INTERNAL_SERVER_ERROR,
                AuthErrorKind::Network => StatusCode::BAD_GATEWAY,
                AuthErrorKind::Provider => StatusCode::BAD_REQUEST,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::ProfileIncomplete => StatusCode::FORBIDDEN,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Composite { primary, .. } => primary.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "status": "error",
            "message": self.user_message(),
            "data": self.extra_data(),
        }))
    }
}
