use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::admin_dtos::{GuruForm, SiswaForm};
use crate::errors::AppError;
use crate::models::guru::Guru;
use crate::models::siswa::Siswa;
use crate::models::user::{NewUser, ProfileStatus, Role, UserStatus};
use crate::repositories::guru_repository::{GuruRepository, NewGuru};
use crate::repositories::siswa_repository::{NewSiswa, SiswaRepository};
use crate::repositories::user_repository::UserRepository;
use crate::supabase::auth_api::AuthApi;
use crate::supabase::postgrest::Postgrest;
use crate::supabase::realtime::RealtimeHub;

/// Password awal akun hasil provisioning; pemiliknya diminta ganti setelah
/// onboarding. Reset password admin juga kembali ke nilai ini.
pub const DEFAULT_PASSWORD: &str = "password123";

/// Provisioning akun guru/siswa oleh admin: identitas auth + baris `users`
/// + baris profil, dengan kompensasi kalau langkah belakangan gagal.
pub struct ProvisionService<'a> {
    store: &'a Postgrest,
    auth: &'a AuthApi,
    hub: &'a RealtimeHub,
}

fn user_status_of(profile_status: ProfileStatus) -> UserStatus {
    match profile_status {
        ProfileStatus::Aktif => UserStatus::Active,
        ProfileStatus::BelumLengkap => UserStatus::BelumLengkap,
    }
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl<'a> ProvisionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        ProvisionService {
            store: &state.store,
            auth: &state.auth,
            hub: &state.hub,
        }
    }

    pub async fn create_guru(&self, form: &GuruForm) -> Result<Guru, AppError> {
        // pre-check duplikat sebelum menulis apa pun
        if let Some(nip) = normalized(&form.nip) {
            if GuruRepository::nip_exists(self.store, &nip).await? {
                return Err(AppError::Conflict("NIP sudah terdaftar".to_string()));
            }
        }

        let auth_id = self
            .auth
            .admin_create_user(&form.email, DEFAULT_PASSWORD)
            .await?;
        match self.create_guru_rows(auth_id, form).await {
            Ok(guru) => Ok(guru),
            Err(primary) => Err(self.compensate_auth_user(auth_id, primary).await),
        }
    }

    async fn create_guru_rows(&self, auth_id: Uuid, form: &GuruForm) -> Result<Guru, AppError> {
        UserRepository::insert(
            self.store,
            self.hub,
            &NewUser {
                id: auth_id,
                email: form.email.trim().to_string(),
                role: Role::Guru,
                status: user_status_of(form.status),
            },
        )
        .await?;

        let new_guru = NewGuru {
            user_id: auth_id,
            nip: normalized(&form.nip),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: normalized(&form.phone),
            status: form.status,
        };
        match GuruRepository::insert(self.store, self.hub, &new_guru).await {
            Ok(guru) => Ok(guru),
            Err(e) => {
                if let Err(cleanup) = UserRepository::delete(self.store, self.hub, auth_id).await {
                    Err(AppError::Composite {
                        primary: Box::new(e.into()),
                        cleanup: Box::new(cleanup.into()),
                    })
                } else {
                    Err(e.into())
                }
            }
        }
    }

    pub async fn update_guru(&self, id: Uuid, form: &GuruForm) -> Result<Guru, AppError> {
        let patch = json!({
            "nip": normalized(&form.nip),
            "first_name": form.first_name.trim(),
            "last_name": form.last_name.trim(),
            "email": form.email.trim(),
            "phone": normalized(&form.phone),
            "status": form.status,
        });
        GuruRepository::update(self.store, self.hub, id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Guru tidak ditemukan".to_string()))
    }

    /// Hapus dua langkah: identitas auth dulu, baru baris tabel. Kalau auth
    /// gagal dihapus, profil dibiarkan utuh supaya tidak ada akun yatim.
    pub async fn delete_guru(&self, id: Uuid) -> Result<(), AppError> {
        let guru = GuruRepository::find_by_id(self.store, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Guru tidak ditemukan".to_string()))?;

        if let Some(user_id) = guru.user_id {
            self.auth.admin_delete_user(user_id).await?;
            UserRepository::delete(self.store, self.hub, user_id).await?;
        }
        GuruRepository::delete(self.store, self.hub, id).await?;
        Ok(())
    }

    pub async fn reset_guru_password(&self, id: Uuid) -> Result<(), AppError> {
        let guru = GuruRepository::find_by_id(self.store, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Guru tidak ditemukan".to_string()))?;
        let user_id = guru.user_id.ok_or_else(|| {
            AppError::Validation("Guru belum punya akun login".to_string())
        })?;
        self.auth
            .admin_update_password(user_id, DEFAULT_PASSWORD)
            .await?;
        Ok(())
    }

    pub async fn create_siswa(&self, form: &SiswaForm) -> Result<Siswa, AppError> {
        if let Some(nisn) = normalized(&form.nisn) {
            if SiswaRepository::nisn_exists(self.store, &nisn).await? {
                return Err(AppError::Conflict("NISN sudah terdaftar".to_string()));
            }
        }

        let auth_id = self
            .auth
            .admin_create_user(&form.email, DEFAULT_PASSWORD)
            .await?;
        match self.create_siswa_rows(auth_id, form).await {
            Ok(siswa) => Ok(siswa),
            Err(primary) => Err(self.compensate_auth_user(auth_id, primary).await),
        }
    }

    async fn create_siswa_rows(&self, auth_id: Uuid, form: &SiswaForm) -> Result<Siswa, AppError> {
        UserRepository::insert(
            self.store,
            self.hub,
            &NewUser {
                id: auth_id,
                email: form.email.trim().to_string(),
                role: Role::Siswa,
                status: user_status_of(form.status),
            },
        )
        .await?;

        let new_siswa = NewSiswa {
            user_id: auth_id,
            nisn: normalized(&form.nisn),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: normalized(&form.phone),
            class_id: form.class_id,
            status: form.status,
        };
        match SiswaRepository::insert(self.store, self.hub, &new_siswa).await {
            Ok(siswa) => Ok(siswa),
            Err(e) => {
                if let Err(cleanup) = UserRepository::delete(self.store, self.hub, auth_id).await {
                    Err(AppError::Composite {
                        primary: Box::new(e.into()),
                        cleanup: Box::new(cleanup.into()),
                    })
                } else {
                    Err(e.into())
                }
            }
        }
    }

    pub async fn update_siswa(&self, id: Uuid, form: &SiswaForm) -> Result<Siswa, AppError> {
        let patch = json!({
            "nisn": normalized(&form.nisn),
            "first_name": form.first_name.trim(),
            "last_name": form.last_name.trim(),
            "email": form.email.trim(),
            "phone": normalized(&form.phone),
            "class_id": form.class_id,
            "status": form.status,
        });
        SiswaRepository::update(self.store, self.hub, id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan".to_string()))
    }

    pub async fn delete_siswa(&self, id: Uuid) -> Result<(), AppError> {
        let siswa = SiswaRepository::find_by_id(self.store, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan".to_string()))?;

        if let Some(user_id) = siswa.user_id {
            self.auth.admin_delete_user(user_id).await?;
            UserRepository::delete(self.store, self.hub, user_id).await?;
        }
        SiswaRepository::delete(self.store, self.hub, id).await?;
        Ok(())
    }

    pub async fn reset_siswa_password(&self, id: Uuid) -> Result<(), AppError> {
        let siswa = SiswaRepository::find_by_id(self.store, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Siswa tidak ditemukan".to_string()))?;
        let user_id = siswa.user_id.ok_or_else(|| {
            AppError::Validation("Siswa belum punya akun login".to_string())
        })?;
        self.auth
            .admin_update_password(user_id, DEFAULT_PASSWORD)
            .await?;
        Ok(())
    }

    async fn compensate_auth_user(&self, auth_id: Uuid, primary: AppError) -> AppError {
        match self.auth.admin_delete_user(auth_id).await {
            Ok(()) => primary,
            Err(cleanup) => AppError::Composite {
                primary: Box::new(primary),
                cleanup: Box::new(cleanup.into()),
            },
        }
    }
}
