use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dtos::admin_dtos::ScheduleForm;
use crate::models::schedule::Schedule;
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "schedules";
const DETAILED: &str = "*,classes(name),subjects(name),gurus(first_name,last_name)";

pub struct ScheduleRepository;

/// Baris jadwal + nama kelas/mapel/guru untuk tampilan tabel.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleDetailed {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub classes: Option<NameOnly>,
    pub subjects: Option<NameOnly>,
    pub gurus: Option<PersonName>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NameOnly {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl ScheduleRepository {
    pub async fn list_detailed(store: &Postgrest) -> Result<Vec<ScheduleDetailed>, StoreError> {
        store
            .from_table(TABLE)
            .select(DETAILED)
            .order("day_of_week.asc")
            .order("start_time.asc")
            .fetch()
            .await
    }

    pub async fn list_for_class(
        store: &Postgrest,
        class_id: Uuid,
    ) -> Result<Vec<ScheduleDetailed>, StoreError> {
        store
            .from_table(TABLE)
            .select(DETAILED)
            .eq("class_id", class_id)
            .order("day_of_week.asc")
            .order("start_time.asc")
            .fetch()
            .await
    }

    pub async fn list_for_guru(
        store: &Postgrest,
        guru_id: Uuid,
    ) -> Result<Vec<ScheduleDetailed>, StoreError> {
        store
            .from_table(TABLE)
            .select(DETAILED)
            .eq("guru_id", guru_id)
            .order("day_of_week.asc")
            .order("start_time.asc")
            .fetch()
            .await
    }

    pub async fn today_for_class(
        store: &Postgrest,
        class_id: Uuid,
        day_of_week: u8,
    ) -> Result<Vec<ScheduleDetailed>, StoreError> {
        store
            .from_table(TABLE)
            .select(DETAILED)
            .eq("class_id", class_id)
            .eq("day_of_week", day_of_week)
            .order("start_time.asc")
            .fetch()
            .await
    }

    pub async fn today_for_guru(
        store: &Postgrest,
        guru_id: Uuid,
        day_of_week: u8,
    ) -> Result<Vec<ScheduleDetailed>, StoreError> {
        store
            .from_table(TABLE)
            .select(DETAILED)
            .eq("guru_id", guru_id)
            .eq("day_of_week", day_of_week)
            .order("start_time.asc")
            .fetch()
            .await
    }

    /// Cek bentrok di aplikasi: ambil semua jadwal kelas itu di hari itu,
    /// lalu bandingkan interval setengah terbuka. `exclude_id` dipakai saat
    /// edit supaya baris yang diedit tidak bentrok dengan dirinya sendiri.
    pub async fn has_conflict(
        store: &Postgrest,
        class_id: Uuid,
        day_of_week: u8,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let existing: Vec<Schedule> = store
            .from_table(TABLE)
            .select("*")
            .eq("class_id", class_id)
            .eq("day_of_week", day_of_week)
            .fetch()
            .await?;

        Ok(existing
            .iter()
            .filter(|s| Some(s.id) != exclude_id)
            .any(|s| s.overlaps_window(start_time, end_time)))
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        form: &ScheduleForm,
    ) -> Result<Schedule, StoreError> {
        let rows: Vec<Value> = store.from_table(TABLE).insert(form).await?;
        let row = first_row(rows, "schedules insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }

    pub async fn update(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        form: &ScheduleForm,
    ) -> Result<Option<Schedule>, StoreError> {
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
