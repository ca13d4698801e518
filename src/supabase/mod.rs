pub mod auth_api;
pub mod postgrest;
pub mod realtime;
