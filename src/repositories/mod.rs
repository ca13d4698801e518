use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::supabase::postgrest::StoreError;

pub mod activity_log_repository;
pub mod announcement_repository;
pub mod attendance_repository;
pub mod grade_repository;
pub mod guru_repository;
pub mod kelas_repository;
pub mod ortu_repository;
pub mod schedule_repository;
pub mod siswa_repository;
pub mod subject_repository;
pub mod user_repository;

/// Baris pertama dari respons `return=representation`; kosong berarti
/// mutasi tidak mengenai baris apa pun.
pub(crate) fn first_row(rows: Vec<Value>, context: &str) -> Result<Value, StoreError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::Decode(format!("{} returned no rows", context)))
}

pub(crate) fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, StoreError> {
    serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string()))
}
