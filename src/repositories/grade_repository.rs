use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::grade::{Grade, GradeType};
use crate::supabase::postgrest::{Postgrest, StoreError};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

const TABLE: &str = "grades";
const RECAP: &str = "*,siswas(first_name,last_name,nisn),subjects(name),gurus(first_name,last_name)";

pub struct GradeRepository;

#[derive(Debug, Serialize)]
pub struct NewGrade {
    pub siswa_id: Uuid,
    pub subject_id: Uuid,
    pub guru_id: Uuid,
    #[serde(rename = "type")]
    pub kind: GradeType,
    pub value: f64,
    pub max_value: f64,
}

/// Baris nilai + identitas siswa/mapel/guru untuk rekap admin.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradeRecapRow {
    #[serde(flatten)]
    pub grade: Grade,
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

/// Baris nilai + nama mapel untuk halaman siswa/ortu.
#[derive(Debug, Serialize, Deserialize)]
pub struct GradeWithSubject {
    #[serde(flatten)]
    pub grade: Grade,
    pub subjects: Option<NameOnly>,
}

impl GradeRepository {
    pub async fn list_for_siswa(
        store: &Postgrest,
        siswa_id: Uuid,
    ) -> Result<Vec<GradeWithSubject>, StoreError> {
        store
            .from_table(TABLE)
            .select("*,subjects(name)")
            .eq("siswa_id", siswa_id)
            .order("created_at.desc")
            .fetch()
            .await
    }

    pub async fn values_for_siswa(
        store: &Postgrest,
        siswa_id: Uuid,
    ) -> Result<Vec<f64>, StoreError> {
        #[derive(Deserialize)]
        struct ValueRow {
            value: f64,
        }

        let rows: Vec<ValueRow> = store
            .from_table(TABLE)
            .select("value")
            .eq("siswa_id", siswa_id)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.value).collect())
    }

    pub async fn values_for_guru(store: &Postgrest, guru_id: Uuid) -> Result<Vec<f64>, StoreError> {
        #[derive(Deserialize)]
        struct ValueRow {
            value: f64,
        }

        let rows: Vec<ValueRow> = store
            .from_table(TABLE)
            .select("value")
            .eq("guru_id", guru_id)
            .fetch()
            .await?;
        Ok(rows.into_iter().map(|r| r.value).collect())
    }

    /// Rekap admin per kelas; daftar siswa kelas itu sudah di-resolve caller.
    pub async fn recap(
        store: &Postgrest,
        siswa_ids: &[Uuid],
        subject_id: Option<Uuid>,
    ) -> Result<Vec<GradeRecapRow>, StoreError> {
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
        req.order("created_at.desc").fetch().await
    }

    /// Nilai yang sudah ada untuk prefill lembar input guru.
    pub async fn existing_for(
        store: &Postgrest,
        subject_id: Uuid,
        kind: GradeType,
        siswa_ids: &[Uuid],
    ) -> Result<Vec<Grade>, StoreError> {
        if siswa_ids.is_empty() {
            return Ok(Vec::new());
        }
        store
            .from_table(TABLE)
            .select("*")
            .eq("subject_id", subject_id)
            .eq("type", kind.as_str())
            .in_list("siswa_id", siswa_ids.iter())
            .fetch()
            .await
    }

    /// Simpan borongan: hapus nilai lama mapel+jenis itu untuk para siswa
    /// yang dikirim, lalu insert nilai baru. Last write wins.
    pub async fn replace_bulk(
        store: &Postgrest,
        hub: &RealtimeHub,
        new_grades: &[NewGrade],
    ) -> Result<Vec<Grade>, StoreError> {
        let Some(head) = new_grades.first() else {
            return Ok(Vec::new());
        };
        let siswa_ids: Vec<Uuid> = new_grades.iter().map(|g| g.siswa_id).collect();

        let removed: Vec<Value> = store
            .from_table(TABLE)
            .eq("subject_id", head.subject_id)
            .eq("type", head.kind.as_str())
            .in_list("siswa_id", siswa_ids.iter())
            .delete()
            .await?;
        for row in removed {
            hub.publish(ChangeEvent::delete(TABLE, row));
        }

        let inserted: Vec<Value> = store.from_table(TABLE).insert(new_grades).await?;
        let mut out = Vec::with_capacity(inserted.len());
        for row in inserted {
            hub.publish(ChangeEvent::insert(TABLE, row.clone()));
            out.push(super::decode_row(row)?);
        }
        Ok(out)
    }
}
