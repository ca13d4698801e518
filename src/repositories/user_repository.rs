use serde_json::{Value, json};
use uuid::Uuid;

use crate::models::user::{NewUser, User, UserStatus};
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "users";

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(store: &Postgrest, id: Uuid) -> Result<Option<User>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("id", id)
            .maybe_single()
            .await
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        new_user: &NewUser,
    ) -> Result<User, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).insert(new_user).await?;
        let row = first_row(rows, "users insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }

    pub async fn update_status(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        status: UserStatus,
    ) -> Result<(), StoreError> {
        let rows: Vec<Value> = store
            .from_table(TABLE)
            .eq("id", id)
            .update(&json!({ "status": status }))
            .await?;
        if let Some(row) = rows.into_iter().next() {
            hub.publish(ChangeEvent::update(TABLE, row, None));
        }
        Ok(())
    }

    pub async fn delete(store: &Postgrest, hub: &RealtimeHub, id: Uuid) -> Result<(), StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).delete().await?;
        for row in rows {
            hub.publish(ChangeEvent::delete(TABLE, row));
        }
        Ok(())
    }
}
