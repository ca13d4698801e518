use serde::Serialize;

pub mod admin_dtos;
pub mod auth_dtos;
pub mod guru_dtos;

/// Amplop respons seragam: `{status, message, data}`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status: "success".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Respons sukses tanpa payload.
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "success".to_string(),
            message: message.into(),
            data: None,
        }
    }
}
