use crate::{
    error::Result,
    middleware::CurrentUser,
    state::AppState,
    user::MessageResponse,
};
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

use super::{
    notification_dto::MarkReadQuery,
    notification_ledger::ReadTarget,
    notification_models::UnreadNotification,
};

/// Unread notifications addressed to the caller
#[utoipa::path(
    get,
    path = "/api/user/notifications",
    responses(
        (status = 200, description = "Unread notifications", body = Vec<UnreadNotification>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("cookie_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<UnreadNotification>>> {
    let notifications = state.notification_service.list_unread(current.id).await?;

    Ok(Json(notifications))
}

/// Mark one notification, or all of them, as read
#[utoipa::path(
    put,
    path = "/api/user/read-noti",
    params(
        ("isReadType" = Option<String>, Query, description = "\"all\" to mark every notification"),
        ("id" = Option<String>, Query, description = "Notification ID when not marking all")
    ),
    responses(
        (status = 200, description = "Done", body = MessageResponse),
        (status = 400, description = "Missing or invalid notification id"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("cookie_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<MarkReadQuery>,
) -> Result<Json<MessageResponse>> {
    let target = ReadTarget::try_from(query)?;

    state.notification_service.mark_read(current.id, target).await?;

    Ok(Json(MessageResponse::ok("Done")))
}

/// Live feed of newly created notifications via Server-Sent Events
#[utoipa::path(
    get,
    path = "/api/user/notifications/stream",
    responses(
        (status = 200, description = "SSE stream of notifications"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("cookie_auth" = []))
)]
pub async fn notification_stream(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.notification_tx.subscribe();
    let user_id = current.id;

    let stream = BroadcastStream::new(rx).filter_map(move |msg| async move {
        match msg {
            Ok(notification) if notification.is_unread_by(user_id) => {
                let json = serde_json::to_string(&notification).ok()?;
                Some(Ok(Event::default().event("notification").data(json)))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(%user_id, "Notification stream lagged: {}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
