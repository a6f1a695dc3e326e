use std::sync::Arc;

use crate::{
    error::Result,
    message::{Inbound, Outbound},
    room::{Member, MemberId, Outbox, Room},
};

/// Name used for chat from a user who has not sent a `join` frame yet.
pub const ANONYMOUS: &str = "anonymous";

/// One connected user, owned by its connection.
///
/// The room only holds a [`Member`] handle for it, so dropping the user never
/// leaves the room pointing at freed state. The display name lives on that
/// handle alone.
#[derive(Debug)]
pub struct ChatUser {
    id: MemberId,
    room: Arc<Room>,
}

impl ChatUser {
    /// Join `room` as a new, not yet named member reachable through `outbox`.
    pub async fn connect(room: Arc<Room>, outbox: Arc<dyn Outbox>) -> ChatUser {
        let id = MemberId::next();
        room.join(Member::new(id, outbox)).await;
        ChatUser { id, room }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    /// `None` until a `join` frame has been handled, or once the user left.
    pub async fn name(&self) -> Option<String> {
        self.room
            .member(self.id)
            .await
            .and_then(|member| member.name().map(str::to_owned))
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    /// Handle one inbound text frame.
    ///
    /// A malformed frame is returned as an error and changes nothing.
    pub async fn handle_message(&mut self, raw: &str) -> Result<()> {
        match Inbound::parse(raw)? {
            Inbound::Join { name } => {
                self.room.rename(self.id, name.as_str()).await;
                self.room
                    .broadcast(&Outbound::joined(&name, self.room.name()))
                    .await;
            }
            Inbound::Chat { text } => {
                let name = self.name().await;
                let name = name.as_deref().unwrap_or(ANONYMOUS);
                self.room.broadcast(&Outbound::chat(name, text)).await;
            }
        }
        Ok(())
    }

    /// Leave the room and tell whoever is left.
    ///
    /// Users who never sent `join` leave silently.
    pub async fn handle_close(self) {
        let name = self.name().await;
        self.room.leave(self.id).await;
        if let Some(name) = name {
            self.room
                .broadcast(&Outbound::left(&name, self.room.name()))
                .await;
        }
    }
}
