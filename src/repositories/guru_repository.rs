use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::guru::Guru;
use crate::models::user::ProfileStatus;
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "gurus";

pub struct GuruRepository;

#[derive(Debug, Serialize)]
pub struct NewGuru {
    pub user_id: Uuid,
    pub nip: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ProfileStatus,
}

/// Ringkasan untuk dropdown wali kelas / pengampu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuruBrief {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl GuruRepository {
    pub async fn email_by_nip(store: &Postgrest, nip: &str) -> Result<Option<String>, StoreError> {
        #[derive(Deserialize)]
        struct EmailRow {
            email: Option<String>,
        }

        let row: Option<EmailRow> = store
            .from_table(TABLE)
            .select("email")
            .eq("nip", nip)
            .maybe_single()
            .await?;
        Ok(row.and_then(|r| r.email))
    }

    pub async fn nip_exists(store: &Postgrest, nip: &str) -> Result<bool, StoreError> {
        let n = store.from_table(TABLE).eq("nip", nip).count().await?;
        Ok(n > 0)
    }

    pub async fn find_by_id(store: &Postgrest, id: Uuid) -> Result<Option<Guru>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("id", id)
            .maybe_single()
            .await
    }

    pub async fn find_by_user_id(
        store: &Postgrest,
        user_id: Uuid,
    ) -> Result<Option<Guru>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("user_id", user_id)
            .maybe_single()
            .await
    }

    pub async fn list(store: &Postgrest) -> Result<Vec<Guru>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .order("created_at.desc")
            .fetch()
            .await
    }

    pub async fn list_active_brief(store: &Postgrest) -> Result<Vec<GuruBrief>, StoreError> {
        store
            .from_table(TABLE)
            .select("id,first_name,last_name")
            .eq("status", "aktif")
            .order("first_name.asc")
            .fetch()
            .await
    }

    pub async fn count(store: &Postgrest) -> Result<u64, StoreError> {
        store.from_table(TABLE).count().await
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        new_guru: &NewGuru,
    ) -> Result<Guru, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).insert(new_guru).await?;
        let row = first_row(rows, "gurus insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }

    pub async fn update(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        patch: &Value,
    ) -> Result<Option<Guru>, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).update(patch).await?;
        match rows.into_iter().next() {
            Some(row) => {
                hub.publish(ChangeEvent::update(TABLE, row.clone(), None));
                Ok(Some(decode_row(row)?))
            }
            None => Ok(None),
        }
    }

    /// Patch onboarding by user_id; field sudah difilter di service.
    pub async fn apply_onboarding(
        store: &Postgrest,
        hub: &RealtimeHub,
        user_id: Uuid,
        patch: &Value,
    ) -> Result<Option<Guru>, StoreError> {
        let rows: Vec<Value> = store
            .from_table(TABLE)
            .eq("user_id", user_id)
            .update(patch)
            .await?;
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
