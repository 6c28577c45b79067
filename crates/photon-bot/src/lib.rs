//! Bot boundary and controller router for PhotonAI (`spec.md` §4.6, §9
//! "Controller dynamic dispatch"): the `Bot` trait, the reference subprocess
//! transport, and the `ControllerRouter` that drives them each tick.
//!
//! `photon-core` knows nothing about any of this -- it consumes a plain
//! `HashMap<id, ControllerState>` each tick. This crate is the untrusted
//! boundary: it is the only place an external bot's misbehaviour is allowed
//! to touch the engine, and it is built to contain that misbehaviour rather
//! than propagate it (`spec.md` §7).

pub mod bot;
pub mod error;
pub mod router;
pub mod subprocess;

pub use bot::{Bot, ScriptedBot};
pub use error::BotError;
pub use router::ControllerRouter;
pub use subprocess::SubprocessBot;
