use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dtos::auth_dtos::SessionOut;

/// Klasifikasi terstruktur untuk kegagalan provider auth. Dipetakan dari
/// `error_code` GoTrue, bukan dari substring pesan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    EmailExists,
    JwtConfig,
    Provider,
    Network,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct AuthApiError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl From<reqwest::Error> for AuthApiError {
    fn from(e: reqwest::Error) -> Self {
        AuthApiError {
            kind: AuthErrorKind::Network,
            message: format!("auth provider unreachable: {}", e),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Client REST GoTrue (`/auth/v1`). Operasi user biasa memakai anon key,
/// operasi admin memakai service role key.
#[derive(Clone)]
pub struct AuthApi {
    base_url: String,
    anon_key: String,
    service_role_key: String,
    client: Client,
}

impl AuthApi {
    pub fn new(base_url: &str, anon_key: &str, service_role_key: &str, client: Client) -> Self {
        AuthApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            service_role_key: service_role_key.to_string(),
            client,
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid, AuthApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let url = format!("{}/auth/v1/signup", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&Body {
                email: email.trim(),
                password,
            })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(parse_auth_error(status, &text, AuthErrorKind::Provider));
        }
        extract_user_id(&text)
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(SessionOut, AuthUser), AuthApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResp {
            access_token: String,
            refresh_token: Option<String>,
            expires_in: Option<i64>,
            token_type: Option<String>,
            user: Option<AuthUser>,
        }

        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&Body {
                email: email.trim(),
                password,
            })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if status != StatusCode::OK {
            return Err(parse_auth_error(
                status,
                &text,
                AuthErrorKind::InvalidCredentials,
            ));
        }

        let tr: TokenResp = serde_json::from_str(&text).map_err(|e| AuthApiError {
            kind: AuthErrorKind::Provider,
            message: format!("invalid json in token response: {}", e),
        })?;
        let user = tr.user.ok_or_else(|| AuthApiError {
            kind: AuthErrorKind::Provider,
            message: "no user info in token response".to_string(),
        })?;

        let session = SessionOut {
            access_token: tr.access_token,
            refresh_token: tr.refresh_token,
            expires_in: tr.expires_in,
            token_type: tr.token_type,
        };
        Ok((session, user))
    }

    /// Mencabut sesi pemegang token. 204 berarti sukses.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthApiError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &text, AuthErrorKind::Provider));
        }
        Ok(())
    }

    /// Provisioning akun oleh admin; email langsung terkonfirmasi supaya
    /// akun bisa dipakai login tanpa alur verifikasi.
    pub async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Uuid, AuthApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
            email_confirm: bool,
        }

        let url = format!("{}/auth/v1/admin/users", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.service_role_key),
            )
            .json(&Body {
                email: email.trim(),
                password,
                email_confirm: true,
            })
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(parse_auth_error(status, &text, AuthErrorKind::Provider));
        }
        extract_user_id(&text)
    }

    pub async fn admin_update_password(
        &self,
        user_id: Uuid,
        new_password: &str,
    ) -> Result<(), AuthApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
        }

        let url = format!("{}/auth/v1/admin/users/{}", self.base_url, user_id);
        let resp = self
            .client
            .put(&url)
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.service_role_key),
            )
            .json(&Body {
                password: new_password,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &text, AuthErrorKind::Provider));
        }
        Ok(())
    }

    pub async fn admin_delete_user(&self, user_id: Uuid) -> Result<(), AuthApiError> {
        let url = format!("{}/auth/v1/admin/users/{}", self.base_url, user_id);
        let resp = self
            .client
            .delete(&url)
            .header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.service_role_key),
            )
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(parse_auth_error(status, &text, AuthErrorKind::Provider));
        }
        Ok(())
    }
}

fn extract_user_id(text: &str) -> Result<Uuid, AuthApiError> {
    let json_val: serde_json::Value = serde_json::from_str(text).map_err(|e| AuthApiError {
        kind: AuthErrorKind::Provider,
        message: format!("invalid json from auth provider: {}", e),
    })?;

    // signup membungkus user di `user`, admin create mengembalikan user langsung
    let user_id_str = json_val
        .get("user")
        .and_then(|u| u.get("id"))
        .or_else(|| json_val.get("id"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| AuthApiError {
            kind: AuthErrorKind::Provider,
            message: "auth provider returned no user id".to_string(),
        })?;

    Uuid::parse_str(user_id_str).map_err(|e| AuthApiError {
        kind: AuthErrorKind::Provider,
        message: format!("bad user id from auth provider: {}", e),
    })
}

/// `default_kind` dipakai kalau respons tidak membawa `error_code`,
/// mis. GoTrue versi lama yang hanya mengirim `msg`.
fn parse_auth_error(status: StatusCode, text: &str, default_kind: AuthErrorKind) -> AuthApiError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(text).ok();

    let message = parsed
        .as_ref()
        .and_then(|v| {
            v.get("msg")
                .or_else(|| v.get("message"))
                .or_else(|| v.get("error_description"))
                .and_then(|m| m.as_str())
        })
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("auth provider error: {} {}", status, text));

    let code = parsed
        .as_ref()
        .and_then(|v| v.get("error_code").or_else(|| v.get("error")))
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string();

    let kind = match code.as_str() {
        "invalid_credentials" | "invalid_grant" => AuthErrorKind::InvalidCredentials,
        "user_already_exists" | "email_exists" => AuthErrorKind::EmailExists,
        "bad_jwt" | "no_authorization" => AuthErrorKind::JwtConfig,
        _ => default_kind,
    };

    AuthApiError { kind, message }
}
