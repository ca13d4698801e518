use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Empat role aplikasi. Serialisasi lowercase, sama dengan isi kolom
/// `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guru,
    Siswa,
    Ortu,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Guru => "guru",
            Role::Siswa => "siswa",
            Role::Ortu => "ortu",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status baris `users`: akun ortu/admin langsung `active`, akun guru/siswa
/// hasil provisioning mulai dari `belum_lengkap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    BelumLengkap,
}

/// Status baris profil guru/siswa. `belum_lengkap` berarti onboarding
/// belum selesai.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Aktif,
    BelumLengkap,
}

impl Default for ProfileStatus {
    fn default() -> Self {
        ProfileStatus::BelumLengkap
    }
}

/// Baris `users`. Password tidak pernah ada di sini, Supabase Auth yang
/// menyimpan kredensial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid, // sama dengan auth.users.id
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct NewUser {
    pub id: Uuid, // user_id dari auth
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
}

/// JWT claims access token Supabase.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// subject / user id
    pub sub: String,
    pub aud: Option<String>,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub role: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Ortu).unwrap(), r#""ortu""#);
        let parsed: Role = serde_json::from_str(r#""guru""#).unwrap();
        assert_eq!(parsed, Role::Guru);
    }

    #[test]
    fn statuses_match_column_vocabulary() {
        assert_eq!(
            serde_json::to_string(&UserStatus::BelumLengkap).unwrap(),
            r#""belum_lengkap""#
        );
        assert_eq!(
            serde_json::to_string(&ProfileStatus::Aktif).unwrap(),
            r#""aktif""#
        );
        assert_eq!(
            serde_json::to_string(&UserStatus::Active).unwrap(),
            r#""active""#
        );
    }
}
