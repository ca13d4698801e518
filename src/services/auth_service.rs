use serde_json::{Value, json};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::auth_dtos::{LoginIn, LoginMethod, LoginOut, RegisterOrtuIn};
use crate::errors::AppError;
use crate::models::user::{NewUser, Role, UserStatus};
use crate::repositories::activity_log_repository::ActivityLogRepository;
use crate::repositories::guru_repository::GuruRepository;
use crate::repositories::ortu_repository::{NewOrtu, OrtuRepository};
use crate::repositories::siswa_repository::SiswaRepository;
use crate::repositories::user_repository::UserRepository;
use crate::supabase::auth_api::AuthApi;
use crate::supabase::postgrest::Postgrest;
use crate::supabase::realtime::RealtimeHub;

use super::session::{RoleProfile, SessionContext};

/// Field onboarding yang boleh ditulis siswa/guru ke profilnya sendiri.
/// `status` sengaja tidak ada di sini: status di-set service, bukan client.
const GURU_ONBOARDING_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "phone",
    "address",
    "dob",
    "pob",
    "photo_url",
    "university",
    "degree",
    "education_start_date",
    "education_end_date",
    "education_city",
];

const SISWA_ONBOARDING_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "phone",
    "address",
    "dob",
    "pob",
    "photo_url",
    "parent_name",
    "parent_first_name",
    "parent_last_name",
    "parent_email",
    "parent_phone",
    "parent_address",
];

/// Alur sesi: login, registrasi ortu, logout, resolusi sesi, onboarding.
pub struct AuthService<'a> {
    store: &'a Postgrest,
    auth: &'a AuthApi,
    hub: &'a RealtimeHub,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        AuthService {
            store: &state.store,
            auth: &state.auth,
            hub: &state.hub,
        }
    }

    /// Login dengan email, NIP (guru), atau NISN (siswa). Identifier non-email
    /// di-resolve ke email lewat tabel profil sebelum menyentuh provider auth.
    pub async fn login(&self, input: &LoginIn) -> Result<LoginOut, AppError> {
        let email = self
            .resolve_identifier(&input.identifier, input.method)
            .await?;
        let (session, auth_user) = self.auth.sign_in(&email, &input.password).await?;
        let ctx = self.resolve_session(auth_user.id).await?;

        // kegagalan audit log tidak boleh menggagalkan login
        if let Err(e) = ActivityLogRepository::record(
            self.store,
            ctx.user.id,
            "login",
            format!("User logged in as {}", ctx.role),
        )
        .await
        {
            log::warn!("activity log login gagal dicatat: {}", e);
        }

        let needs_onboarding = ctx.needs_onboarding();
        let next_step = if needs_onboarding {
            "onboarding".to_string()
        } else {
            "dashboard".to_string()
        };
        Ok(LoginOut {
            session,
            user: ctx.user,
            role: ctx.role,
            profile: ctx.profile,
            needs_onboarding,
            next_step,
        })
    }

    async fn resolve_identifier(
        &self,
        identifier: &str,
        method: LoginMethod,
    ) -> Result<String, AppError> {
        let identifier = identifier.trim();
        match method {
            LoginMethod::Email => Ok(identifier.to_string()),
            LoginMethod::Nip => GuruRepository::email_by_nip(self.store, identifier)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound("Guru dengan NIP tersebut tidak ditemukan".to_string())
                }),
            LoginMethod::Nisn => SiswaRepository::email_by_nisn(self.store, identifier)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound("Siswa dengan NISN tersebut tidak ditemukan".to_string())
                }),
        }
    }

    /// Baris `users` + profil role-nya. Dipakai login, restore sesi, dan
    /// guard role, supaya ketiganya menghasilkan sesi yang identik.
    pub async fn resolve_session(&self, user_id: Uuid) -> Result<SessionContext, AppError> {
        let user = UserRepository::find_by_id(self.store, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Akun tidak terdaftar di sistem".to_string()))?;

        let profile = match user.role {
            Role::Admin => None,
            Role::Guru => GuruRepository::find_by_user_id(self.store, user.id)
                .await?
                .map(RoleProfile::Guru),
            Role::Siswa => SiswaRepository::find_by_user_id(self.store, user.id)
                .await?
                .map(RoleProfile::Siswa),
            Role::Ortu => OrtuRepository::find_by_user_id(self.store, user.id)
                .await?
                .map(RoleProfile::Ortu),
        };

        Ok(SessionContext {
            role: user.role,
            user,
            profile,
        })
    }

    /// Registrasi mandiri akun ortu. Urutan wajib: cari siswa dulu, baru
    /// menulis apa pun; NISN tak dikenal berarti nol tulisan.
    pub async fn register_ortu(&self, form: &RegisterOrtuIn) -> Result<Uuid, AppError> {
        let siswa = SiswaRepository::find_by_nisn(self.store, form.nisn_anak.trim())
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Siswa dengan NISN tersebut tidak ditemukan".to_string())
            })?;

        let auth_id = self.auth.sign_up(&form.email, &form.password).await?;
        if let Err(primary) = self.create_ortu_rows(auth_id, siswa.id, form).await {
            return Err(self.compensate_auth_user(auth_id, primary).await);
        }
        Ok(auth_id)
    }

    async fn create_ortu_rows(
        &self,
        auth_id: Uuid,
        siswa_id: Uuid,
        form: &RegisterOrtuIn,
    ) -> Result<(), AppError> {
        UserRepository::insert(
            self.store,
            self.hub,
            &NewUser {
                id: auth_id,
                email: form.email.trim().to_string(),
                role: Role::Ortu,
                status: UserStatus::Active,
            },
        )
        .await?;

        let new_ortu = NewOrtu {
            user_id: auth_id,
            siswa_id,
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.clone(),
        };
        if let Err(e) = OrtuRepository::insert(self.store, self.hub, &new_ortu).await {
            // baris users ikut dibersihkan, jangan tinggalkan akun setengah jadi
            if let Err(cleanup) = UserRepository::delete(self.store, self.hub, auth_id).await {
                return Err(AppError::Composite {
                    primary: Box::new(e.into()),
                    cleanup: Box::new(cleanup.into()),
                });
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Kompensasi saga: identitas auth yang sudah terlanjur dibuat dihapus
    /// lagi; kalau penghapusan ikut gagal, dua-duanya dilaporkan.
    async fn compensate_auth_user(&self, auth_id: Uuid, primary: AppError) -> AppError {
        match self.auth.admin_delete_user(auth_id).await {
            Ok(()) => primary,
            Err(cleanup) => AppError::Composite {
                primary: Box::new(primary),
                cleanup: Box::new(cleanup.into()),
            },
        }
    }

    pub async fn logout(
        &self,
        ctx: Option<&SessionContext>,
        access_token: &str,
    ) -> Result<(), AppError> {
        if let Some(ctx) = ctx {
            if let Err(e) = ActivityLogRepository::record(
                self.store,
                ctx.user.id,
                "logout",
                "User logged out".to_string(),
            )
            .await
            {
                log::warn!("activity log logout gagal dicatat: {}", e);
            }
        }
        self.auth.sign_out(access_token).await?;
        Ok(())
    }

    /// Merge form onboarding ke profil role pemanggil, set profil `aktif`
    /// dan users `active`. Field di luar whitelist dibuang diam-diam.
    pub async fn complete_onboarding(
        &self,
        ctx: &SessionContext,
        form: &Value,
    ) -> Result<RoleProfile, AppError> {
        let updated = match ctx.role {
            Role::Guru => {
                let patch = whitelist_patch(form, GURU_ONBOARDING_FIELDS);
                GuruRepository::apply_onboarding(self.store, self.hub, ctx.user.id, &patch)
                    .await?
                    .map(RoleProfile::Guru)
                    .ok_or_else(|| {
                        AppError::NotFound("Profil guru tidak ditemukan".to_string())
                    })?
            }
            Role::Siswa => {
                let patch = whitelist_patch(form, SISWA_ONBOARDING_FIELDS);
                SiswaRepository::apply_onboarding(self.store, self.hub, ctx.user.id, &patch)
                    .await?
                    .map(RoleProfile::Siswa)
                    .ok_or_else(|| {
                        AppError::NotFound("Profil siswa tidak ditemukan".to_string())
                    })?
            }
            _ => {
                return Err(AppError::Validation(
                    "Onboarding hanya untuk guru dan siswa".to_string(),
                ));
            }
        };

        UserRepository::update_status(self.store, self.hub, ctx.user.id, UserStatus::Active)
            .await?;
        Ok(updated)
    }
}

fn whitelist_patch(form: &Value, allowed: &[&str]) -> Value {
    let mut patch = serde_json::Map::new();
    if let Some(obj) = form.as_object() {
        for (key, value) in obj {
            if allowed.contains(&key.as_str()) {
                patch.insert(key.clone(), value.clone());
            }
        }
    }
    patch.insert("status".to_string(), json!("aktif"));
    Value::Object(patch)
}
