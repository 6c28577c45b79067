//! The simulation engine: world state machine, physics, maps, vision, stop
//! predicates, and the game loop that composes them into a *Step* stream.
//!
//! This crate knows nothing about bot transports -- it consumes a plain
//! `controls: HashMap<id, ControllerState>` each tick, supplied by whatever
//! drives it (`photon-bot`'s router, or a test harness with scripted
//! controls).

pub mod error;
pub mod game_loop;
pub mod id;
pub mod map;
pub mod object;
pub mod simulator;
pub mod stop;
pub mod vector;
pub mod vision;
pub mod world;

pub use error::WorldError;
pub use game_loop::Match;
pub use id::IdGenerator;
pub use map::MapSpec;
pub use object::Object;
pub use simulator::Simulator;
pub use stop::{default_predicate, stop_after, stop_when_no_ships, stop_when_one_ship, Outcome, StopPredicate};
pub use world::World;
