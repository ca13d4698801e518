use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::dtos::admin_dtos::AnnouncementForm;
use crate::models::announcement::Announcement;
use crate::models::user::Role;
use crate::supabase::postgrest::{Postgrest, StoreError, TableRequest};
use crate::supabase::realtime::{ChangeEvent, RealtimeHub};

use super::{decode_row, first_row};

const TABLE: &str = "announcements";

pub struct AnnouncementRepository;

#[derive(Debug, Serialize)]
struct NewAnnouncement<'a> {
    title: &'a str,
    content: &'a str,
    target_roles: &'a [Role],
    is_published: bool,
    author_id: Uuid,
}

fn published_for_role(store: &Postgrest, role: Role) -> TableRequest<'_> {
    store
        .from_table(TABLE)
        .select("*")
        .eq("is_published", true)
        .or_filter(&format!(
            "target_roles.cs.{{{}}},target_roles.is.null",
            role.as_str()
        ))
        .order("created_at.desc")
}

impl AnnouncementRepository {
    pub async fn list_all(store: &Postgrest) -> Result<Vec<Announcement>, StoreError> {
        store
            .from_table(TABLE)
            .select("*")
            .order("created_at.desc")
            .fetch()
            .await
    }

    pub async fn find_by_id(
        store: &Postgrest,
        id: Uuid,
    ) -> Result<Option<Announcement>, StoreError> {
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

    /// Pengumuman terbit yang role itu boleh lihat: target memuat role-nya
    /// atau target null (untuk semua).
    pub async fn list_for_role(
        store: &Postgrest,
        role: Role,
    ) -> Result<Vec<Announcement>, StoreError> {
        published_for_role(store, role).fetch().await
    }

    /// Snapshot widget realtime: N pengumuman terbit terbaru.
    pub async fn latest_published(
        store: &Postgrest,
        role: Role,
        limit: u32,
    ) -> Result<Vec<Announcement>, StoreError> {
        published_for_role(store, role).limit(limit).fetch().await
    }

    pub async fn insert(
        store: &Postgrest,
        hub: &RealtimeHub,
        form: &AnnouncementForm,
        author_id: Uuid,
    ) -> Result<Announcement, StoreError> {
        let body = NewAnnouncement {
            title: &form.title,
            content: &form.content,
            target_roles: &form.target_roles,
            is_published: form.is_published,
            author_id,
        };
        let rows: Vec<Value> = store.from_table(TABLE).insert(&body).await?;
        let row = first_row(rows, "announcements insert")?;
        hub.publish(ChangeEvent::insert(TABLE, row.clone()));
        decode_row(row)
    }

    pub async fn update(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        form: &AnnouncementForm,
    ) -> Result<Option<Announcement>, StoreError> {
        let patch = json!({
            "title": form.title,
            "content": form.content,
            "target_roles": form.target_roles,
            "is_published": form.is_published,
            "updated_at": Utc::now(),
        });
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).update(&patch).await?;
        match rows.into_iter().next() {
            Some(row) => {
                hub.publish(ChangeEvent::update(TABLE, row.clone(), None));
                Ok(Some(decode_row(row)?))
            }
            None => Ok(None),
        }
    }

    pub async fn set_published(
        store: &Postgrest,
        hub: &RealtimeHub,
        id: Uuid,
        is_published: bool,
    ) -> Result<Option<Announcement>, StoreError> {
        let patch = json!({
            "is_published": is_published,
            "updated_at": Utc::now(),
        });
        let rows: Vec<Value> = store.from_table(TABLE).eq("id", id).update(&patch).await?;
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
