use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::activity_log::{ActivityLog, NewActivityLog};
use crate::supabase::postgrest::{Postgrest, StoreError};

const TABLE: &str = "activity_logs";

pub struct ActivityLogRepository;

/// Baris log + email pelakunya (embed lewat kolom `user_id`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityWithUser {
    #[serde(flatten)]
    pub log: ActivityLog,
    pub users: Option<UserEmail>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserEmail {
    pub email: String,
}

impl ActivityLogRepository {
    pub async fn record(
        store: &Postgrest,
        user_id: Uuid,
        action: &str,
        description: String,
    ) -> Result<(), StoreError> {
        let entry = NewActivityLog {
            user_id,
            action: action.to_string(),
            description,
        };
        let _rows: Vec<Value> = store.from_table(TABLE).insert(&entry).await?;
        Ok(())
    }

    pub async fn recent(store: &Postgrest, limit: u32) -> Result<Vec<ActivityWithUser>, StoreError> {
        store
            .from_table(TABLE)
            .select("*,users:user_id(email)")
            .order("created_at.desc")
            .limit(limit)
            .fetch()
            .await
    }
}
