use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};
use crate::services::session::RoleProfile;

/// Cara identifier di-resolve saat login. Default email, guru bisa pakai
/// NIP dan siswa NISN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    #[default]
    Email,
    Nip,
    Nisn,
}

#[derive(Deserialize)]
pub struct LoginIn {
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub method: LoginMethod,
}

#[derive(Serialize)]
pub struct SessionOut {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

#[derive(Serialize)]
pub struct LoginOut {
    pub session: SessionOut,
    pub user: User,
    pub role: Role,
    pub profile: Option<RoleProfile>,
    pub needs_onboarding: bool,
    pub next_step: String,
}

/// Jawaban GET /auth/session, bentuknya sengaja sama dengan LoginOut minus
/// token supaya client bisa memakai satu resolver.
#[derive(Serialize)]
pub struct SessionView {
    pub user: User,
    pub role: Role,
    pub profile: Option<RoleProfile>,
    pub needs_onboarding: bool,
}

#[derive(Deserialize)]
pub struct RegisterOrtuIn {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    /// NISN anak yang mau dipantau; wajib sudah terdaftar.
    pub nisn_anak: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize)]
pub struct RegisterOut {
    pub user_id: Uuid,
    pub next_step: String,
}

#[derive(Serialize)]
pub struct OnboardingOut {
    pub profile: RoleProfile,
    pub next_step: String,
}
