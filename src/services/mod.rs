pub mod auth_service;
pub mod provision_service;
pub mod session;
