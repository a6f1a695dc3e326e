use thiserror::Error;

use crate::room::MemberId;

/// Errors raised while handling a single chat connection.
///
/// None of these are fatal: they are scoped to one message or one member and
/// get logged at the connection boundary.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Inbound payload was not valid JSON, had an unknown `type`, or was
    /// missing a required field.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("failed to deliver to member {member}: {source}")]
    Delivery {
        member: MemberId,
        #[source]
        source: DeliveryError,
    },

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure of a single send capability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ChatError>;
