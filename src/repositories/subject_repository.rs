use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::subject::Subject;
use crate::supabase::postgrest::{Postgrest, StoreError};

const TABLE: &str = "subjects";

pub struct SubjectRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KelasBrief {
    pub id: Uuid,
    pub name: String,
}

impl SubjectRepository {
    pub async fn list(store: &Postgrest) -> Result<Vec<Subject>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .order("name.asc")
            .fetch()
            .await
    }

    pub async fn find_by_id(store: &Postgrest, id: Uuid) -> Result<Option<Subject>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("id", id)
            .maybe_single()
            .await
    }

    pub async fn list_by_guru(store: &Postgrest, guru_id: Uuid) -> Result<Vec<Subject>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .eq("guru_id", guru_id)
            .order("name.asc")
            .fetch()
            .await
    }

    /// Kelas-kelas yang diampu satu guru, dari embed `classes(id,name)`,
    /// dideduplikasi karena satu kelas bisa punya beberapa mapel.
    pub async fn classes_of_guru(
        store: &Postgrest,
        guru_id: Uuid,
    ) -> Result<Vec<KelasBrief>, StoreError> {
        #[derive(Deserialize)]
        struct Row {
            classes: Option<KelasBrief>,
        }

        let rows: Vec<Row> = store
            .from_table(TABLE)
            .select("classes(id,name)")
            .eq("guru_id", guru_id)
            .fetch()
            .await?;

        let mut seen = Vec::new();
        let mut out = Vec::new();
        for kelas in rows.into_iter().flat_map(|r| r.classes) {
            if !seen.contains(&kelas.id) {
                seen.push(kelas.id);
                out.push(kelas);
            }
        }
        Ok(out)
    }

    pub async fn class_ids_of_guru(
        store: &Postgrest,
        guru_id: Uuid,
    ) -> Result<Vec<Uuid>, StoreError> {
        #[derive(Deserialize)]
        struct Row {
            class_id: Option<Uuid>,
        }

        let rows: Vec<Row> = store
            .from_table(TABLE)
            .select("class_id")
            .eq("guru_id", guru_id)
            .fetch()
            .await?;

        let mut ids: Vec<Uuid> = Vec::new();
        for id in rows.into_iter().flat_map(|r| r.class_id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    pub async fn count_by_guru(store: &Postgrest, guru_id: Uuid) -> Result<u64, StoreError> {
        store
            .from_table(TABLE)
            .eq("guru_id", guru_id)
            .count()
            .await
    }

    pub async fn count_by_class(store: &Postgrest, class_id: Uuid) -> Result<u64, StoreError> {
        store
            .from_table(TABLE)
            .eq("class_id", class_id)
            .count()
            .await
    }
}
