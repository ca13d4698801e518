use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::ortu::Ortu;
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "ortu";

pub struct OrtuRepository;

#[derive(Debug, Serialize)]
pub struct NewOrtu {
    pub user_id: Uuid,
    pub siswa_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

impl OrtuRepository {
    pub async fn find_by_user_id(
        store: &Postgrest,
        user_id: Uuid,
    ) -> Result<Option<Ortu>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("user_id", user_id)
            .maybe_single()
            .await
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        new_ortu: &NewOrtu,
    ) -> Result<Ortu, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).insert(new_ortu).await?;
        let row = first_row(rows, "ortu insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }
}
