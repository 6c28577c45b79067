//! Canonical event record shapes for the PhotonAI wire/log format.
//!
//! These types are the stable contract described by `spec.md` §4.1: a
//! [`Step`] is either the one-time [`SpaceCreate`] announcement or an
//! ordered list of per-object [`Event`]s. Every producer and consumer in the
//! workspace (the simulator, the world, the controller router, the bot
//! subprocess protocol) shares this single definition.

use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

// ---------------------------------------------------------------------------
// Space
// ---------------------------------------------------------------------------

/// The one-time announcement of a game's spatial parameters.
///
/// Created exactly once, at clock 0; the space is immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceCreate {
    /// Toroidal bounds for ships, destruction bounds for pellets.
    pub dimensions: Vec2,
    /// Gravitational constant `g` in `a = g * m_other * r_hat / |r|^2`.
    pub gravity: f32,
    /// Hard cap on simulated seconds, if any.
    pub lifetime: Option<f32>,
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// The physical substructure shared by every object variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub radius: f32,
    pub mass: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians; 0 means +Y, increasing clockwise.
    pub orientation: f32,
}

// ---------------------------------------------------------------------------
// Weapon
// ---------------------------------------------------------------------------

/// Static weapon parameters, set at ship creation and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub max_reload: f32,
    pub max_temperature: f32,
    /// Time to cool from `max_temperature + 1` back down to `max_temperature`.
    pub temperature_decay: f32,
    pub speed: f32,
    /// `time_to_live` given to pellets this weapon spawns.
    pub time_to_live: f32,
}

/// Mutable weapon state, updated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponState {
    pub fired: bool,
    pub reload: f32,
    pub temperature: f32,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Stable identity of a controller, unchanged for the life of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerMeta {
    pub name: String,
    pub version: u32,
}

/// The per-tick requests a bot emits: fire/rotate/thrust.
///
/// These are requests, clamped on use by the simulator -- `rotate` and
/// `thrust` are not guaranteed to already lie in their nominal ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub fire: bool,
    pub rotate: f32,
    pub thrust: f32,
}

impl ControllerState {
    /// The initial controller state before any bot has responded.
    pub const NEUTRAL: ControllerState = ControllerState {
        fire: false,
        rotate: 0.0,
        thrust: 0.0,
    };
}

// ---------------------------------------------------------------------------
// Create variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipCreate {
    #[serde(flatten)]
    pub body: Body,
    pub weapon: WeaponSpec,
    pub controller: ControllerMeta,
    pub max_thrust: f32,
    pub max_rotate: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PelletCreate {
    #[serde(flatten)]
    pub body: Body,
    pub time_to_live: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetCreate {
    #[serde(flatten)]
    pub body: Body,
    pub name: String,
}

/// Discriminated by structure per `spec.md` §4.1: Ship has `weapon` +
/// `controller` + `max_thrust`; Pellet has `time_to_live` and no weapon;
/// Planet has `name` and no `time_to_live`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObjCreate {
    Ship(ShipCreate),
    Pellet(PelletCreate),
    Planet(PlanetCreate),
}

// ---------------------------------------------------------------------------
// State variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    #[serde(flatten)]
    pub body: Body,
    pub weapon: WeaponState,
    pub controller: ControllerState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PelletState {
    #[serde(flatten)]
    pub body: Body,
    pub time_to_live: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetState {
    #[serde(flatten)]
    pub body: Body,
    pub name: String,
}

/// Mirrors [`ObjCreate`] without the create-only fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObjState {
    Ship(ShipState),
    Pellet(PelletState),
    Planet(PlanetState),
}

/// An empty record marking an object's removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destroy;

// ---------------------------------------------------------------------------
// Event / Step
// ---------------------------------------------------------------------------

/// The payload of an [`Event`]: create, mutate, or remove an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum EventData {
    Create(ObjCreate),
    State(ObjState),
    Destroy(Destroy),
}

/// One object-scoped occurrence within a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub data: EventData,
}

/// The payload of a [`Step`]: the one-time space announcement, or a tick's
/// worth of per-object events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step_kind")]
pub enum StepData {
    Space(SpaceCreate),
    Events(Vec<Event>),
}

/// One unit of the engine's output log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub clock: u64,
    pub duration: f32,
    pub data: StepData,
}

// ---------------------------------------------------------------------------
// Bot wire protocol (spec.md §4.6/§6)
// ---------------------------------------------------------------------------

/// One request on a bot's wire: the (possibly vision-filtered) step the bot
/// is being shown, and which ship -- if any -- it controls this tick.
///
/// `ship_id: None` is the one-time "hello, here is the world, no ship to
/// control yet" case (`spec.md` §4.6) and the terminal "your ship just died"
/// notice; a `None` response is only valid when `ship_id` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub step: Step,
    pub ship_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_ship_create() {
        let create = ObjCreate::Ship(ShipCreate {
            body: Body {
                radius: 1.0,
                mass: 2.0,
                position: Vec2::new(1.0, 2.0),
                velocity: Vec2::ZERO,
                orientation: 0.0,
            },
            weapon: WeaponSpec {
                max_reload: 0.1,
                max_temperature: 3.0,
                temperature_decay: 0.25,
                speed: 10.0,
                time_to_live: 5.0,
            },
            controller: ControllerMeta {
                name: "spiral".to_owned(),
                version: 0,
            },
            max_thrust: 1.0,
            max_rotate: 1.0,
        });
        let json = serde_json::to_string(&create).unwrap();
        let back: ObjCreate = serde_json::from_str(&json).unwrap();
        assert_eq!(create, back);
    }

    #[test]
    fn json_roundtrip_step_events() {
        let step = Step {
            clock: 7,
            duration: 0.01,
            data: StepData::Events(vec![Event {
                id: 3,
                data: EventData::Destroy(Destroy),
            }]),
        };
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);
    }
}
