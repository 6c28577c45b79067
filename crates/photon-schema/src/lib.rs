//! Canonical wire schema for PhotonAI: the [`Step`]/[`Event`] record shapes,
//! their structural (untagged) classifier, and the binary/text codecs that
//! turn them into bytes.
//!
//! This crate has no knowledge of simulation, physics, or bots -- it is
//! purely the shared vocabulary that `photon-core` produces/consumes and
//! `photon-bot` relays over a subprocess channel.

pub mod codec;
pub mod error;
pub mod event;
pub mod structural;
pub mod vector;

pub use error::SchemaError;
pub use event::{
    Body, ControllerMeta, ControllerState, Destroy, Event, EventData, ObjCreate, ObjState,
    PelletCreate, PelletState, PlanetCreate, PlanetState, Request, ShipCreate, ShipState,
    SpaceCreate, Step, StepData, WeaponSpec, WeaponState,
};
pub use structural::SchemaKind;
pub use vector::Vec2;
