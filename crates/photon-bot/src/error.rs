//! Bot-transport errors (`spec.md` §7): the *contained* error family.
//!
//! Unlike `photon-core::WorldError` / `photon-schema::SchemaError` (fail-fast
//! by policy), every variant here is recovered from locally by the
//! [`crate::router::ControllerRouter`]: one misbehaving bot may lose the
//! game but must never crash the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// I/O failure writing to or reading from a bot's channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bot did not respond within its per-call timeout.
    #[error("bot did not respond within {0:?}")]
    Timeout(std::time::Duration),

    /// A bot's response failed schema validation (`BotMisbehaviour` in
    /// `spec.md` §7; handled identically to a transport failure).
    #[error("bot response failed to decode: {0}")]
    Decode(#[from] photon_schema::SchemaError),

    /// The bot's channel has already been closed (by a prior failure, or
    /// because the process exited) and cannot be used again.
    #[error("bot channel is closed")]
    Closed,

    /// The subprocess exited or its stdin/stdout pipe could not be opened.
    #[error("bot process error: {0}")]
    Process(String),
}
