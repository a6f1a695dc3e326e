use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures::{SinkExt, StreamExt, TryFutureExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use warp::ws::WebSocket;

use crate::{room::Room, user::ChatUser};

/// Drive one websocket for its whole lifetime as a member of `room`.
pub async fn user_connected(ws: WebSocket, room: Arc<Room>) {
    let connected_at = Instant::now();

    // Split the socket into a sender and receive of messages.
    let (mut user_ws_tx, mut user_ws_rx) = ws.split();

    // Use an unbounded channel to handle buffering and flushing of messages
    // to the websocket, so a broadcast never waits on a slow peer.
    let (tx, rx) = mpsc::unbounded_channel();
    let mut rx = UnboundedReceiverStream::new(rx);

    tokio::task::spawn(async move {
        while let Some(message) = rx.next().await {
            user_ws_tx
                .send(message)
                .unwrap_or_else(|e| {
                    warn!("websocket send error: {}", e);
                })
                .await;
        }
    });

    let mut user = ChatUser::connect(room, Arc::new(tx)).await;
    info!(
        "member {} connected to room {:?}",
        user.id(),
        user.room().name()
    );

    while let Some(result) = user_ws_rx.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                warn!("websocket error(member={}): {}", user.id(), e);
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        // Skip pings, pongs and binary frames
        let text = match msg.to_str() {
            Ok(text) => text,
            Err(()) => {
                debug!("member {} sent a non-text frame", user.id());
                continue;
            }
        };
        if let Err(e) = user.handle_message(text).await {
            warn!(
                "member {} in room {:?}: {}",
                user.id(),
                user.room().name(),
                e
            );
        }
    }

    // user_ws_rx stream will keep processing as long as the user stays
    // connected. Once they disconnect, then...
    info!(
        "member {} ({}) left room {:?} after {}",
        user.id(),
        user.name().await.as_deref().unwrap_or("unnamed"),
        user.room().name(),
        humantime::format_duration(Duration::from_secs(connected_at.elapsed().as_secs()))
    );
    user.handle_close().await;
}
