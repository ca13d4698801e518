use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Satu perubahan baris pada satu tabel, bentuknya mengikuti payload
/// `postgres_changes`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(rename = "event_type")]
    pub kind: ChangeKind,
    pub record: Value,
    pub old_record: Option<Value>,
    pub commit_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn insert(table: &str, record: Value) -> Self {
        ChangeEvent {
            table: table.to_string(),
            kind: ChangeKind::Insert,
            record,
            old_record: None,
            commit_at: Utc::now(),
        }
    }

    pub fn update(table: &str, record: Value, old_record: Option<Value>) -> Self {
        ChangeEvent {
            table: table.to_string(),
            kind: ChangeKind::Update,
            record,
            old_record,
            commit_at: Utc::now(),
        }
    }

    pub fn delete(table: &str, old_record: Value) -> Self {
        ChangeEvent {
            table: table.to_string(),
            kind: ChangeKind::Delete,
            record: Value::Null,
            old_record: Some(old_record),
            commit_at: Utc::now(),
        }
    }
}

type Callback = Box<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Listener {
    id: u64,
    notify: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    tables: HashMap<String, Vec<Listener>>,
}

/// Feed perubahan in-process. Semua tulisan ke tabel lewat repository
/// layanan ini, jadi publish di repository sudah mencakup seluruh mutasi.
///
/// Callback dipanggil sambil memegang lock registry: jangan subscribe atau
/// unsubscribe dari dalam callback.
#[derive(Clone, Default)]
pub struct RealtimeHub {
    registry: Arc<Mutex<Registry>>,
}

fn lock_registry(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pendaftaran callback untuk satu tabel. Listener hidup sampai
    /// [`Subscription`] yang dikembalikan di-drop.
    pub fn subscribe<F>(&self, table: &str, notify: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let mut reg = lock_registry(&self.registry);
        reg.next_id += 1;
        let id = reg.next_id;
        reg.tables.entry(table.to_string()).or_default().push(Listener {
            id,
            notify: Box::new(notify),
        });
        Subscription {
            table: table.to_string(),
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Varian channel untuk consumer async (stream SSE).
    pub fn subscribe_channel(
        &self,
        table: &str,
    ) -> (Subscription, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub = self.subscribe(table, move |event| {
            let _ = tx.send(event.clone());
        });
        (sub, rx)
    }

    /// Mengantarkan event ke semua listener tabel itu, berurutan sesuai
    /// urutan emisi. Tanpa listener, event dibuang.
    pub fn publish(&self, event: ChangeEvent) {
        let reg = lock_registry(&self.registry);
        if let Some(listeners) = reg.tables.get(&event.table) {
            for listener in listeners {
                (listener.notify)(&event);
            }
        }
    }
}

/// Guard langganan; drop berarti berhenti menerima event.
pub struct Subscription {
    table: String,
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = lock_registry(&registry);
            if let Some(listeners) = reg.tables.get_mut(&self.table) {
                listeners.retain(|l| l.id != self.id);
                if listeners.is_empty() {
                    reg.tables.remove(&self.table);
                }
            }
        }
    }
}
