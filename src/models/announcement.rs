use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// Baris `announcements`. `target_roles` null atau kosong berarti tampil
/// untuk semua role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub target_roles: Option<Vec<Role>>,
    pub is_published: bool,
    pub author_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Announcement {
    pub fn visible_to(&self, role: Role) -> bool {
        match &self.target_roles {
            None => true,
            Some(targets) if targets.is_empty() => true,
            Some(targets) => targets.contains(&role),
        }
    }
}
