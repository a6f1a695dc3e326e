use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use warp::ws::Message;

use crate::{
    error::{ChatError, DeliveryError},
    message::Outbound,
};

/// Our global unique member id counter.
static NEXT_MEMBER_ID: AtomicUsize = AtomicUsize::new(1);

/// Identity of one connection's membership. Two members may share a display
/// name, never an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(usize);

impl MemberId {
    pub fn next() -> Self {
        MemberId(NEXT_MEMBER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) const fn from_raw(id: usize) -> Self {
        MemberId(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability to push one text frame to a remote peer.
///
/// Delivery is fire-and-forget: implementations must not wait for the peer.
pub trait Outbox: Send + Sync {
    fn deliver(&self, text: String) -> Result<(), DeliveryError>;
}

impl Outbox for mpsc::UnboundedSender<Message> {
    fn deliver(&self, text: String) -> Result<(), DeliveryError> {
        self.send(Message::text(text))
            .map_err(|_disconnected| DeliveryError::Closed)
    }
}

/// The room's handle on a connected user: identity, current display name,
/// and a way to reach the peer. The connection owns the user; the room only
/// holds this.
#[derive(Clone)]
pub struct Member {
    id: MemberId,
    name: Option<String>,
    outbox: Arc<dyn Outbox>,
}

impl Member {
    pub fn new(id: MemberId, outbox: Arc<dyn Outbox>) -> Self {
        Member {
            id,
            name: None,
            outbox,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    /// `None` until the user sends a `join` frame.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn deliver(&self, text: String) -> Result<(), DeliveryError> {
        self.outbox.deliver(text)
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A named group of members sharing broadcasts.
///
/// Members are kept ordered by id, which is join order.
#[derive(Debug)]
pub struct Room {
    name: String,
    members: RwLock<BTreeMap<MemberId, Member>>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Room {
        Room {
            name: name.into(),
            members: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member. Joining twice with the same id keeps the first entry.
    pub async fn join(&self, member: Member) {
        let mut members = self.members.write().await;
        if members.contains_key(&member.id) {
            return;
        }
        debug!("member {} joined room {:?}", member.id, self.name);
        members.insert(member.id, member);
    }

    /// Remove a member. Returns `false` if it was not present.
    pub async fn leave(&self, id: MemberId) -> bool {
        let removed = self.members.write().await.remove(&id).is_some();
        if removed {
            debug!("member {} left room {:?}", id, self.name);
        }
        removed
    }

    /// Set the display name of a present member.
    pub async fn rename(&self, id: MemberId, name: impl Into<String>) -> bool {
        match self.members.write().await.get_mut(&id) {
            Some(member) => {
                member.name = Some(name.into());
                true
            }
            None => false,
        }
    }

    /// Send `message` to every current member, the sender included.
    ///
    /// A member whose outbox fails is logged and skipped. Returns how many
    /// members accepted the frame.
    pub async fn broadcast(&self, message: &Outbound) -> usize {
        let payload = match message.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                error!("room {:?}: {}", self.name, e);
                return 0;
            }
        };

        let members = self.members.read().await;
        let mut delivered = 0;
        for member in members.values() {
            match member.deliver(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(source) => {
                    let e = ChatError::Delivery {
                        member: member.id,
                        source,
                    };
                    warn!("room {:?}: {}", self.name, e);
                }
            }
        }
        delivered
    }

    pub async fn member(&self, id: MemberId) -> Option<Member> {
        self.members.read().await.get(&id).cloned()
    }

    /// First member, in join order, whose display name is `name`.
    pub async fn get_member(&self, name: &str) -> Option<Member> {
        self.members
            .read()
            .await
            .values()
            .find(|member| member.name() == Some(name))
            .cloned()
    }

    /// Snapshot of the current members; later joins and leaves are not
    /// reflected in the returned list.
    pub async fn get_members(&self) -> Vec<Member> {
        self.members.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub name: String,
    pub members: usize,
}

/// Mapping from room name to room. Rooms are created on first lookup and
/// live as long as the registry does.
///
/// Cloning is cheap and every clone sees the same rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, Arc<Room>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get room by name, creating it if it does not exist yet. Names are
    /// case-sensitive and used as given.
    pub async fn get(&self, name: &str) -> Arc<Room> {
        {
            let rooms = self.rooms.read().await;
            if let Some(room) = rooms.get(name) {
                return room.clone();
            }
        }

        // re-check under the write lock, another connection may have won
        self.rooms
            .write()
            .await
            .entry(name.to_owned())
            .or_insert_with(|| {
                info!("room created: {:?}", name);
                Arc::new(Room::new(name))
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }

    pub async fn room_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rooms.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Every room with its current member count, sorted by name.
    pub async fn summaries(&self) -> Vec<RoomSummary> {
        let rooms: Vec<Arc<Room>> = self.rooms.read().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            summaries.push(RoomSummary {
                name: room.name().to_owned(),
                members: room.len().await,
            });
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }
}
