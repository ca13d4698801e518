use serde::Serialize;

use crate::models::guru::Guru;
use crate::models::ortu::Ortu;
use crate::models::siswa::Siswa;
use crate::models::user::{ProfileStatus, Role, User};

/// Profil per-role yang menempel di sesi. Untagged: bentuk JSON-nya persis
/// baris tabel profilnya.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RoleProfile {
    Guru(Guru),
    Siswa(Siswa),
    Ortu(Ortu),
}

/// Sesi yang sudah ter-resolve penuh: identitas auth + baris `users` +
/// profil role. Admin tidak punya baris profil.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub user: User,
    pub role: Role,
    pub profile: Option<RoleProfile>,
}

impl SessionContext {
    /// Guru/siswa dengan profil `belum_lengkap` wajib onboarding sebelum
    /// masuk halaman role-nya.
    pub fn needs_onboarding(&self) -> bool {
        match &self.profile {
            Some(RoleProfile::Guru(g)) => g.status == ProfileStatus::BelumLengkap,
            Some(RoleProfile::Siswa(s)) => s.status == ProfileStatus::BelumLengkap,
            _ => false,
        }
    }

    pub fn guru(&self) -> Option<&Guru> {
        match &self.profile {
            Some(RoleProfile::Guru(g)) => Some(g),
            _ => None,
        }
    }

    pub fn siswa(&self) -> Option<&Siswa> {
        match &self.profile {
            Some(RoleProfile::Siswa(s)) => Some(s),
            _ => None,
        }
    }

    pub fn ortu(&self) -> Option<&Ortu> {
        match &self.profile {
            Some(RoleProfile::Ortu(o)) => Some(o),
            _ => None,
        }
    }
}
