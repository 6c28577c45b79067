//! The tagged-sum object model (`spec.md` §9 Design Note: "Object
//! polymorphism"). Where the source used subclassing from a shared `Body`
//! base, here `Object` is a plain enum over the three variants, each holding
//! its own `Body`; per-variant logic dispatches by matching rather than by
//! virtual call.

use photon_schema::{
    Body, ControllerMeta, ControllerState, ObjCreate, ObjState, PelletCreate, PelletState,
    PlanetCreate, PlanetState, ShipCreate, ShipState, WeaponSpec, WeaponState,
};

use crate::error::WorldError;

#[derive(Debug, Clone)]
pub struct Planet {
    pub body: Body,
    pub name: String,
    pub update_clock: u64,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Body,
    pub weapon_spec: WeaponSpec,
    pub weapon_state: WeaponState,
    pub controller_meta: ControllerMeta,
    pub controller_state: ControllerState,
    pub max_thrust: f32,
    pub max_rotate: f32,
    pub update_clock: u64,
}

#[derive(Debug, Clone)]
pub struct Pellet {
    pub body: Body,
    pub time_to_live: f32,
    pub update_clock: u64,
}

/// A live simulated object. See `spec.md` §9: a tagged sum rather than a
/// generic component table, with a small capability interface (`body`,
/// `body_mut`) standing in for the source's shared base class.
#[derive(Debug, Clone)]
pub enum Object {
    Planet(Planet),
    Ship(Ship),
    Pellet(Pellet),
}

impl Object {
    pub fn body(&self) -> &Body {
        match self {
            Object::Planet(p) => &p.body,
            Object::Ship(s) => &s.body,
            Object::Pellet(p) => &p.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Object::Planet(p) => &mut p.body,
            Object::Ship(s) => &mut s.body,
            Object::Pellet(p) => &mut p.body,
        }
    }

    pub fn update_clock(&self) -> u64 {
        match self {
            Object::Planet(p) => p.update_clock,
            Object::Ship(s) => s.update_clock,
            Object::Pellet(p) => p.update_clock,
        }
    }

    pub fn set_update_clock(&mut self, clock: u64) {
        match self {
            Object::Planet(p) => p.update_clock = clock,
            Object::Ship(s) => s.update_clock = clock,
            Object::Pellet(p) => p.update_clock = clock,
        }
    }

    /// Build a fresh object from a wire CREATE record.
    pub fn from_create(create: ObjCreate, clock: u64) -> Object {
        match create {
            ObjCreate::Ship(ShipCreate {
                body,
                weapon,
                controller,
                max_thrust,
                max_rotate,
            }) => Object::Ship(Ship {
                body,
                weapon_spec: weapon,
                weapon_state: WeaponState {
                    fired: false,
                    reload: 0.0,
                    temperature: 0.0,
                },
                controller_meta: controller,
                controller_state: ControllerState::NEUTRAL,
                max_thrust,
                max_rotate,
                update_clock: clock,
            }),
            ObjCreate::Pellet(PelletCreate { body, time_to_live }) => Object::Pellet(Pellet {
                body,
                time_to_live,
                update_clock: clock,
            }),
            ObjCreate::Planet(PlanetCreate { body, name }) => Object::Planet(Planet {
                body,
                name,
                update_clock: clock,
            }),
        }
    }

    /// Mutate this object in place from a wire STATE record. Fails if the
    /// state's variant doesn't match this object's own kind -- that is a
    /// malformed stream, per `spec.md` §4.2.
    pub fn apply_state(&mut self, state: ObjState, clock: u64) -> Result<(), WorldError> {
        match (self, state) {
            (Object::Ship(ship), ObjState::Ship(ShipState { body, weapon, controller })) => {
                ship.body = body;
                ship.weapon_state = weapon;
                ship.controller_state = controller;
                ship.update_clock = clock;
                Ok(())
            }
            (Object::Pellet(pellet), ObjState::Pellet(PelletState { body, time_to_live })) => {
                pellet.body = body;
                pellet.time_to_live = time_to_live;
                pellet.update_clock = clock;
                Ok(())
            }
            (Object::Planet(planet), ObjState::Planet(PlanetState { body, name })) => {
                planet.body = body;
                planet.name = name;
                planet.update_clock = clock;
                Ok(())
            }
            (this, state) => Err(WorldError::MalformedEvent(format!(
                "STATE variant {state:?} does not match existing object kind {this:?}"
            ))),
        }
    }
}
