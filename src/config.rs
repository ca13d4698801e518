use std::env;

use anyhow::{Context, Result};

/// Konfigurasi runtime, semuanya dari environment (.env saat dev).
#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    /// Secret HS256 untuk verifikasi access token Supabase (Settings -> API -> JWT Secret).
    pub supabase_jwt_secret: String,
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL not set")?
            .trim_end_matches('/')
            .to_string();
        let supabase_anon_key =
            env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY not set")?;
        let supabase_service_role_key =
            env::var("SUPABASE_SERVICE_ROLE_KEY").context("SUPABASE_SERVICE_ROLE_KEY not set")?;
        let supabase_jwt_secret =
            env::var("SUPABASE_JWT_SECRET").context("SUPABASE_JWT_SECRET not set")?;

        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let bind_address = format!("0.0.0.0:{}", port);

        // kalau ALLOWED_ORIGINS kosong, pakai default dev frontend
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Settings {
            supabase_url,
            supabase_anon_key,
            supabase_service_role_key,
            supabase_jwt_secret,
            bind_address,
            allowed_origins,
        })
    }
}
