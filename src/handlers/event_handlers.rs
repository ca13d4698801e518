//! Stream pengumuman lewat server-sent events. Klien menerima satu chunk
//! snapshot saat tersambung, lalu pengumuman terbit yang boleh dilihat
//! role-nya, satu chunk per event. Langganan hub dilepas otomatis saat
//! koneksi putus karena Subscription ikut ter-drop bersama stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use actix_web::web::Bytes;
use actix_web::{HttpResponse, get, web};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::AppState;
use crate::errors::AppError;
use crate::middleware::role_guard::AnySession;
use crate::models::announcement::Announcement;
use crate::repositories::announcement_repository::AnnouncementRepository;
use crate::supabase::realtime::{ChangeKind, Subscription};

const SNAPSHOT_SIZE: u32 = 5;

struct EventStream {
    rx: mpsc::UnboundedReceiver<Announcement>,
    _sub: Subscription,
}

impl Stream for EventStream {
    type Item = Result<Bytes, actix_web::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(Ok(sse_chunk("pengumuman", &item)))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

fn sse_chunk<T: serde::Serialize>(event: &str, data: &T) -> Bytes {
    let payload = serde_json::to_string(data).unwrap_or_else(|_| "null".to_string());
    Bytes::from(format!("event: {event}\ndata: {payload}\n\n"))
}

/// GET /events/pengumuman
#[get("/events/pengumuman")]
pub async fn pengumuman_stream(
    state: web::Data<AppState>,
    sess: AnySession,
) -> Result<HttpResponse, AppError> {
    let role = sess.0.role;

    let snapshot =
        AnnouncementRepository::latest_published(&state.store, role, SNAPSHOT_SIZE).await?;

    let (tx, rx) = mpsc::unbounded_channel();
    let sub = state.hub.subscribe("announcements", move |event| {
        if !matches!(event.kind, ChangeKind::Insert | ChangeKind::Update) {
            return;
        }
        let Ok(item) = serde_json::from_value::<Announcement>(event.record.clone()) else {
            return;
        };
        if item.is_published && item.visible_to(role) {
            let _ = tx.send(item);
        }
    });

    let body = stream::iter([Ok(sse_chunk("snapshot", &snapshot))])
        .chain(EventStream { rx, _sub: sub })
        .boxed_local();

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body))
}
