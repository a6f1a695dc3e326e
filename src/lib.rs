//! A multi-room chat server over websockets.
//!
//! Clients connect to `/chat/{room}` and exchange JSON frames (see
//! [`message`]). Every room lives in a [`RoomRegistry`] owned by the server;
//! each connection is a [`ChatUser`] whose room holds only a [`Member`]
//! handle to it.

pub mod api;
pub mod config;
pub mod error;
pub mod message;
pub mod room;
pub mod user;
pub mod ws;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{ChatError, DeliveryError, Result};
pub use message::{Inbound, Outbound};
pub use room::{Member, MemberId, Outbox, Room, RoomRegistry, RoomSummary};
pub use user::ChatUser;
pub use ws::user_connected;
