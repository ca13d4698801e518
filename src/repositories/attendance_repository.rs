use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::attendance::{Attendance, AttendanceStatus};
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

const TABLE: &str = "attendance";
const RECAP: &str = "*,siswas(first_name,last_name,nisn),subjects(name),gurus(first_name,last_name)";

pub struct AttendanceRepository;

#[derive(Debug, Serialize)]
pub struct NewAttendance {
    pub siswa_id: Uuid,
    pub subject_id: Uuid,
    pub guru_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceRecapRow {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub siswas: Option<SiswaIdentity>,
    pub subjects: Option<NameOnly>,
    pub gurus: Option<PersonName>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SiswaIdentity {
    pub first_name: String,
    pub last_name: String,
    pub nisn: Option<String>,
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

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceWithSubject {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub subjects: Option<NameOnly>,
}

impl AttendanceRepository {
    pub async fn list_for_siswa(
        store: &Postgrest,
        siswa_id: Uuid,
    ) -> Result<Vec<AttendanceWithSubject>, StoreError> {
        store
            .from_table(TABLE)
            .select("*,subjects(name)")
            .eq("siswa_id", siswa_id)
            .order("date.desc")
            .fetch()
            .await
    }

    /// Kehadiran sejak tanggal tertentu, untuk persentase 30 hari dashboard.
    pub async fn for_siswa_since(
        store: &Postgrest,
        siswa_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("siswa_id", siswa_id)
            .gte("date", since)
            .fetch()
            .await
    }

    pub async fn all_for_siswa(
        store: &Postgrest,
        siswa_id: Uuid,
    ) -> Result<Vec<Attendance>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("siswa_id", siswa_id)
            .fetch()
            .await
    }

    pub async fn recap(
        store: &Postgrest,
        siswa_ids: &[Uuid],
        subject_id: Option<Uuid>,
    ) -> Result<Vec<AttendanceRecapRow>, StoreError> {
        if siswa_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut req = store
            .from_table(TABLE)
            .select(RECAP)
            .in_list("siswa_id", siswa_ids.iter());
        if let Some(subject_id) = subject_id {
            req = req.eq("subject_id", subject_id);
        }
        req.order("date.desc").fetch().await
    }

    /// Absensi yang sudah tercatat untuk prefill lembar guru.
    pub async fn existing_for(
        store: &Postgrest,
        subject_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("subject_id", subject_id)
            .eq("date", date)
            .fetch()
            .await
    }

    /// Tanggal absen terakhir yang dicatat seorang guru.
    pub async fn last_date_for_guru(
        store: &Postgrest,
        guru_id: Uuid,
    ) -> Result<Option<NaiveDate>, StoreError> {
        #[derive(Deserialize)]
        struct DateRow {
            date: NaiveDate,
        }

        let rows: Vec<DateRow> = store
            .from_table(TABLE)
            .select("date")
            .eq("guru_id", guru_id)
            .order("date.desc")
            .limit(1)
            .fetch()
            .await?;
        Ok(rows.into_iter().next().map(|r| r.date))
    }

    /// Simpan borongan satu pertemuan: hapus catatan lama mapel+tanggal itu
    /// untuk para siswa yang dikirim, lalu insert catatan baru.
    pub async fn replace_bulk(
        store: &Postgrest,
        hub: &RealtimeHub,
        new_rows: &[NewAttendance],
    ) -> Result<Vec<Attendance>, StoreError> {
        let Some(head) = new_rows.first() else {
            return Ok(Vec::new());
        };
        let siswa_ids: Vec<Uuid> = new_rows.iter().map(|r| r.siswa_id).collect();

        let removed: Vec<Value> = store
            .from_table(TABLE)
            .eq("subject_id", head.subject_id)
            .eq("date", head.date)
            .in_list("siswa_id", siswa_ids.iter())
            .delete()
            .await?;
        for row in removed {
            hub.publish(ChangeEvent::delete(TABLE, row));
        }

        let inserted: Vec<Value> = store.from_table(TABLE).insert(new_rows).await?;
        let mut out = Vec::with_capacity(inserted.len());
        for row in inserted {
            hub.publish(ChangeEvent::insert(TABLE, row.clone()));
            out.push(super::decode_row(row)?);
        }
        Ok(out)
    }
}
