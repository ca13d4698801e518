pub mod auth_extractor;
pub mod role_guard;
