use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::siswa::Siswa;
use crate::models::user::ProfileStatus;
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "siswas";

pub struct SiswaRepository;

#[derive(Debug, Serialize)]
pub struct NewSiswa {
    pub user_id: Uuid,
    pub nisn: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub class_id: Option<Uuid>,
    pub status: ProfileStatus,
}

/// Baris siswa + nama kelas hasil embed `classes(name)`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SiswaWithKelas {
    #[serde(flatten)]
    pub siswa: Siswa,
    pub classes: Option<KelasName>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KelasName {
    pub name: String,
}

impl SiswaRepository {
    pub async fn email_by_nisn(
        store: &Postgrest,
        nisn: &str,
    ) -> Result<Option<String>, StoreError> {
        #[derive(Deserialize)]
        struct EmailRow {
            email: Option<String>,
        }

        let row: Option<EmailRow> = store
            .from_table(TABLE)
            .select("email")
            .eq("nisn", nisn)
            .maybe_single()
            .await?;
        Ok(row.and_then(|r| r.email))
    }

    pub async fn find_by_nisn(store: &Postgrest, nisn: &str) -> Result<Option<Siswa>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("nisn", nisn)
            .maybe_single()
            .await
    }

    pub async fn nisn_exists(store: &Postgrest, nisn: &str) -> Result<bool, StoreError> {
        let n = store.from_table(TABLE).eq("nisn", nisn).count().await?;
        Ok(n > 0)
    }

    pub async fn find_by_id(store: &Postgrest, id: Uuid) -> Result<Option<Siswa>, StoreError> {
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
    ) -> Result<Option<Siswa>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("user_id", user_id)
            .maybe_single()
            .await
    }

    pub async fn list_with_kelas(store: &Postgrest) -> Result<Vec<SiswaWithKelas>, StoreError> {
        store
            .from_table(TABLE)
            .select("*,classes(name)")
            .order("created_at.desc")
            .fetch()
            .await
    }

    pub async fn list_by_class(
        store: &Postgrest,
        class_id: Uuid,
    ) -> Result<Vec<Siswa>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("class_id", class_id)
            .order("first_name.asc")
            .fetch()
            .await
    }

    pub async fn ids_by_class(store: &Postgrest, class_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        #[derive(Deserialize)]
        struct IdRow {
            id: Uuid,
        }

        let rows: Vec<IdRow> = store
            .from_table(TABLE)
            .select("id")
            .eq("class_id", class_id)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    pub async fn count(store: &Postgrest) -> Result<u64, StoreError> {
        store.from_table(TABLE).count().await
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        new_siswa: &NewSiswa,
    ) -> Result<Siswa, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).insert(new_siswa).await?;
        let row = first_row(rows, "siswas insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }

    pub async fn update(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        patch: &Value,
    ) -> Result<Option<Siswa>, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).update(patch).await?;
        match rows.into_iter().next() {
            Some(row) => {
                hub.publish(ChangeEvent::update(TABLE, row.clone(), None));
                Ok(Some(decode_row(row)?))
            }
            None => Ok(None),
        }
    }

    pub async fn apply_onboarding(
        store: &Postgrest,
        hub: &RealtimeHub,
        user_id: Uuid,
        patch: &Value,
    ) -> Result<Option<Siswa>, StoreError> {
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
