use serde_json::Value;
use uuid::Uuid;

use crate::dtos::admin_dtos::KelasForm;
use crate::models::kelas::Kelas;
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "classes";

pub struct KelasRepository;

impl KelasRepository {
    pub async fn list(store: &Postgrest) -> Result<Vec<Kelas>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .order("name.asc")
            .fetch()
            .await
    }

    pub async fn find_by_id(store: &Postgrest, id: Uuid) -> Result<Option<Kelas>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("id", id)
            .maybe_single()
            .await
    }

    pub async fn count(store: &Postgrest) -> Result<u64, StoreError> {
        store.from_table(TABLE).count().await
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        form: &KelasForm,
    ) -> Result<Kelas, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).insert(form).await?;
        let row = first_row(rows, "classes insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }

    pub async fn update(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        form: &KelasForm,
    ) -> Result<Option<Kelas>, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).update(form).await?;
        match rows.into_iter().next() {
            Some(row) => {
                hub.publish(ChangeEvent::update(TABLE, row.clone(), None));
                Ok(Some(decode_row(row)?))
            }
            None => Ok(None),
        }
    }

    pub async fn delete(store: &Postgrest, hub: &RealtimeHub, id: Uuid) -> Result<(), StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).delete().await?;
        for row in rows {
            hub.publish(ChangeEvent::delete(TABLE, row));
        }
        Ok(())
    }
}
