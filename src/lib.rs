pub mod config;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod supabase;

use config::Settings;
use supabase::auth_api::AuthApi;
use supabase::postgrest::Postgrest;
use supabase::realtime::RealtimeHub;

pub use handlers::configure;

/// Dependensi bersama semua handler: konfigurasi, klien PostgREST, klien
/// auth, dan hub realtime in-process.
pub struct AppState {
    pub settings: Settings,
    pub store: Postgrest,
    pub auth: AuthApi,
    pub hub: RealtimeHub,
}

impl AppState {
    pub fn new(settings: Settings, client: reqwest::Client) -> Self {
        let store = Postgrest::new(
            &settings.supabase_url,
            &settings.supabase_service_role_key,
            client.clone(),
        );
        let auth = AuthApi::new(
            &settings.supabase_url,
            &settings.supabase_anon_key,
            &settings.supabase_service_role_key,
            client,
        );
        AppState {
            settings,
            store,
            auth,
            hub: RealtimeHub::new(),
        }
    }
}
