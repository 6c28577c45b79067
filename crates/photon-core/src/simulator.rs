//! Simulator: advances physics one tick (`spec.md` §4.4, component C5).
//!
//! `Simulator::tick` is the only place gravity, thrust, collisions, weapon
//! thermodynamics, and pellet expiry are computed. It is a pure function of
//! `(world, dt, controls)` plus the id-generator's next-value sequence; it
//! never mutates `World` itself -- the caller ingests the returned events via
//! `World::apply`, keeping the single-writer discipline from `spec.md` §5.

use std::collections::HashMap;

use photon_schema::{
    Body, ControllerState, Destroy, Event, EventData, ObjCreate, ObjState, PelletCreate,
    PelletState, PlanetState, ShipState,
};

use crate::id::IdGenerator;
use crate::object::Object;
use crate::vector::{dir, wrap, normalize_angle, in_bounds, Vec2};
use crate::world::World;

pub struct Simulator;

impl Simulator {
    /// Compute the ordered events for the next tick. Iteration is ascending
    /// by id, per `spec.md` §4.4 and the determinism requirement in §5/§9.
    pub fn tick(
        world: &World,
        dt: f32,
        ids: &mut IdGenerator,
        controls: &HashMap<u64, ControllerState>,
    ) -> Vec<Event> {
        let space = world
            .space
            .as_ref()
            .expect("simulator ticked before a Space-Create was applied");
        let mut ordered_ids: Vec<u64> = world.objects.keys().copied().collect();
        ordered_ids.sort_unstable();

        let mut events = Vec::new();
        for id in ordered_ids {
            let object = &world.objects[&id];

            // 1. Collision test (Ships and Pellets only; Planets are
            // obstacles that are never themselves destroyed by collision).
            if matches!(object, Object::Ship(_) | Object::Pellet(_))
                && collides_with_any(id, object.body(), world)
            {
                events.push(Event {
                    id,
                    data: EventData::Destroy(Destroy),
                });
                continue;
            }

            let control = controls.get(&id).copied().unwrap_or(ControllerState::NEUTRAL);

            // 2. Acceleration.
            let mut accel = Vec2::ZERO;
            if let Object::Ship(ship) = object {
                let thrust = control.thrust.clamp(0.0, 1.0);
                accel = accel + dir(object.body().orientation) * (thrust * ship.max_thrust);
            }
            if object.body().mass > 0.0 {
                for (&other_id, other) in &world.objects {
                    if other_id == id {
                        continue;
                    }
                    let other_mass = other.body().mass;
                    let r = other.body().position - object.body().position;
                    let dist = r.length();
                    accel = accel + r / dist * (space.gravity * other_mass / (dist * dist));
                }
            }

            // 3. Integration (leap-frog-like, half-step velocity).
            let old_body = *object.body();
            let new_velocity = old_body.velocity + accel * dt;
            let mut new_position =
                old_body.position + (old_body.velocity + new_velocity) * (dt * 0.5);

            // 4. Wrap / out-of-bounds.
            if matches!(object, Object::Ship(_)) {
                new_position = wrap(new_position, space.dimensions);
            } else if matches!(object, Object::Pellet(_)) && !in_bounds(new_position, space.dimensions) {
                events.push(Event {
                    id,
                    data: EventData::Destroy(Destroy),
                });
                continue;
            }

            // 5. Orientation.
            let new_orientation = match object {
                Object::Ship(ship) => normalize_angle(
                    old_body.orientation + dt * control.rotate.clamp(-1.0, 1.0) * ship.max_rotate,
                ),
                _ => old_body.orientation,
            };

            let new_body = Body {
                radius: old_body.radius,
                mass: old_body.mass,
                position: new_position,
                velocity: new_velocity,
                orientation: new_orientation,
            };

            match object {
                Object::Ship(ship) => {
                    // 6. Weapon update.
                    let reload = (ship.weapon_state.reload - dt).max(0.0);
                    let t_max = ship.weapon_spec.max_temperature;
                    let decay_ratio =
                        (t_max / (t_max + 1.0)).powf(dt / ship.weapon_spec.temperature_decay);
                    let temperature = decay_ratio * ship.weapon_state.temperature;

                    let can_fire = control.fire && reload == 0.0 && temperature < t_max;
                    let (fired, reload, temperature) = if can_fire {
                        (true, ship.weapon_spec.max_reload, temperature + 1.0)
                    } else {
                        (false, reload, temperature)
                    };

                    events.push(Event {
                        id,
                        data: EventData::State(ObjState::Ship(ShipState {
                            body: new_body,
                            weapon: photon_schema::WeaponState {
                                fired,
                                reload,
                                temperature,
                            },
                            controller: control,
                        })),
                    });

                    if can_fire {
                        let pellet_id = ids.next();
                        let muzzle_dir = dir(new_orientation);
                        let pellet_position =
                            new_position + muzzle_dir * (1.01 * new_body.radius);
                        let pellet_velocity = new_velocity + muzzle_dir * ship.weapon_spec.speed;
                        events.push(Event {
                            id: pellet_id,
                            data: EventData::Create(ObjCreate::Pellet(PelletCreate {
                                body: Body {
                                    radius: 0.0,
                                    mass: 0.0,
                                    position: pellet_position,
                                    velocity: pellet_velocity,
                                    orientation: new_orientation,
                                },
                                time_to_live: ship.weapon_spec.time_to_live,
                            })),
                        });
                    }
                }
                Object::Pellet(pellet) => {
                    // 7. Pellet TTL.
                    let ttl = pellet.time_to_live - dt;
                    if ttl <= 0.0 {
                        events.push(Event {
                            id,
                            data: EventData::Destroy(Destroy),
                        });
                    } else {
                        events.push(Event {
                            id,
                            data: EventData::State(ObjState::Pellet(PelletState {
                                body: new_body,
                                time_to_live: ttl,
                            })),
                        });
                    }
                }
                Object::Planet(planet) => {
                    // 8. Planets never fire or expire; just re-emit state.
                    events.push(Event {
                        id,
                        data: EventData::State(ObjState::Planet(PlanetState {
                            body: new_body,
                            name: planet.name.clone(),
                        })),
                    });
                }
            }
        }
        events
    }
}

fn collides_with_any(id: u64, body: &Body, world: &World) -> bool {
    world.objects.iter().any(|(&other_id, other)| {
        if other_id == id {
            return false;
        }
        let other_body = other.body();
        let min_dist = body.radius + other_body.radius;
        (body.position - other_body.position).length_squared() < min_dist * min_dist
    })
}
