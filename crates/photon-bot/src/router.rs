//! Controller router (`spec.md` §4.6, component C7): owns the live `Bot`
//! endpoints, drives their request/response loop each tick, and tolerates
//! per-bot failure without letting it reach the simulation.

use std::collections::HashMap;

use photon_core::object::Object;
use photon_core::vision::filter_step;
use photon_core::World;
use photon_schema::{Body, ControllerState, Request, Step};
use tracing::warn;

use crate::bot::Bot;
use crate::error::BotError;

/// The set of live controllers, each keyed by the id of the ship it
/// controls, and the last-known [`ControllerState`] per ship
/// (`spec.md` §4.6). `controls()` is exactly the map a caller feeds back
/// into `photon_core::Simulator::tick` for the next tick.
pub struct ControllerRouter {
    bots: HashMap<u64, Box<dyn Bot>>,
    controls: HashMap<u64, ControllerState>,
}

impl ControllerRouter {
    /// `bindings` pairs each competing ship's id with the `Bot` that
    /// controls it, in the order ships were created. Every ship starts with
    /// the neutral control triple until its bot answers. Each `Bot`
    /// implementation enforces its own per-call timeout (`spec.md` §4.6) --
    /// the router itself is transport-agnostic.
    pub fn new(bindings: Vec<(u64, Box<dyn Bot>)>) -> Self {
        let mut bots = HashMap::with_capacity(bindings.len());
        let mut controls = HashMap::with_capacity(bindings.len());
        for (id, bot) in bindings {
            bots.insert(id, bot);
            controls.insert(id, ControllerState::NEUTRAL);
        }
        Self { bots, controls }
    }

    /// The cached controls, ready to hand to the simulator for the next
    /// tick.
    pub fn controls(&self) -> &HashMap<u64, ControllerState> {
        &self.controls
    }

    pub fn bound_ship_ids(&self) -> Vec<u64> {
        self.bots.keys().copied().collect()
    }

    /// Drive one tick of the router, per `spec.md` §4.6: called after
    /// `World::apply(step)` has already ingested `step`, so `world` is the
    /// authoritative state the step describes.
    ///
    /// Bots may be dispatched concurrently within the tick (`spec.md` §5);
    /// every response is joined before this call returns, and no bot's
    /// response can influence another bot's request this tick because every
    /// request is built from the same already-applied `world` snapshot.
    pub fn dispatch(&mut self, step: &Step, world: &World) {
        let planets: Vec<Body> = world
            .objects
            .values()
            .filter_map(|object| match object {
                Object::Planet(planet) => Some(planet.body),
                _ => None,
            })
            .collect();

        let mut requests: HashMap<u64, (Request, bool)> = HashMap::with_capacity(self.bots.len());
        for &id in self.bots.keys() {
            match world.objects.get(&id) {
                Some(object) => {
                    let viewer = *object.body();
                    let filtered = filter_step(step, &viewer, &planets);
                    requests.insert(
                        id,
                        (
                            Request {
                                step: filtered,
                                ship_id: Some(id),
                            },
                            false,
                        ),
                    );
                }
                None => {
                    // The ship died this tick: one last, unfiltered look,
                    // then the binding is torn down regardless of the reply.
                    requests.insert(
                        id,
                        (
                            Request {
                                step: step.clone(),
                                ship_id: None,
                            },
                            true,
                        ),
                    );
                }
            }
        }

        let mut responses: HashMap<u64, (Result<Option<ControllerState>, BotError>, bool)> =
            HashMap::with_capacity(requests.len());
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.bots.len());
            for (&id, bot) in self.bots.iter_mut() {
                let (request, terminal) = requests
                    .remove(&id)
                    .expect("every bound id has a request built above");
                handles.push(scope.spawn(move || (id, bot.call(&request), terminal)));
            }
            for handle in handles {
                let (id, result, terminal) = handle.join().expect("bot worker thread panicked");
                responses.insert(id, (result, terminal));
            }
        });

        for (id, (result, terminal)) in responses {
            if terminal {
                self.unbind(id);
                continue;
            }
            match result {
                Ok(Some(control)) => {
                    self.controls.insert(id, control);
                }
                Ok(None) => {
                    warn!(ship_id = id, "bot answered null for a live ship; unbinding");
                    self.unbind(id);
                }
                Err(err) => {
                    warn!(ship_id = id, error = %err, "bot transport error; unbinding, keeping last control");
                    self.unbind(id);
                }
            }
        }
    }

    /// Remove `id`'s binding and close its bot best-effort.
    fn unbind(&mut self, id: u64) {
        if let Some(mut bot) = self.bots.remove(&id) {
            if let Err(err) = bot.close() {
                warn!(ship_id = id, error = %err, "error closing bot during unbind");
            }
        }
    }

    /// Dispose every still-bound bot, best-effort (`spec.md` §4.6 point 3).
    /// Called once, when the match ends for any reason.
    pub fn shutdown(&mut self) {
        let ids: Vec<u64> = self.bots.keys().copied().collect();
        for id in ids {
            self.unbind(id);
        }
    }
}

impl Drop for ControllerRouter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::ScriptedBot;
    use photon_schema::vector::Vec2;
    use photon_schema::{
        Body, ControllerMeta, Destroy, Event, EventData, ObjCreate, PlanetCreate, ShipCreate,
        ShipState, SpaceCreate, StepData, WeaponSpec, WeaponState,
    };

    fn base_body(position: Vec2) -> Body {
        Body {
            radius: 1.0,
            mass: 1.0,
            position,
            velocity: Vec2::ZERO,
            orientation: 0.0,
        }
    }

    fn ship_create(position: Vec2) -> ShipCreate {
        ShipCreate {
            body: base_body(position),
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
        }
    }

    fn world_with_ship(id: u64, position: Vec2) -> World {
        let mut world = World::new();
        world
            .apply(&Step {
                clock: 0,
                duration: 0.0,
                data: StepData::Space(SpaceCreate {
                    dimensions: Vec2::new(200.0, 200.0),
                    gravity: 0.0,
                    lifetime: None,
                }),
            })
            .unwrap();
        world
            .apply(&Step {
                clock: 1,
                duration: 0.0,
                data: StepData::Events(vec![Event {
                    id,
                    data: EventData::Create(ObjCreate::Ship(ship_create(position))),
                }]),
            })
            .unwrap();
        world
    }

    #[test]
    fn live_ship_receives_its_own_ship_id_and_caches_the_response() {
        let mut router = ControllerRouter::new(
            vec![(
                0,
                Box::new(ScriptedBot::new(|_req| {
                    Some(ControllerState {
                        fire: true,
                        rotate: 1.0,
                        thrust: 0.5,
                    })
                })),
            )],
        );
        let world = world_with_ship(0, Vec2::new(50.0, 50.0));
        let step = Step {
            clock: 1,
            duration: 0.0,
            data: StepData::Events(vec![]),
        };
        router.dispatch(&step, &world);
        assert_eq!(
            router.controls()[&0],
            ControllerState {
                fire: true,
                rotate: 1.0,
                thrust: 0.5
            }
        );
    }

    #[test]
    fn dead_ship_gets_terminal_request_and_is_unbound() {
        let mut router =
            ControllerRouter::new(vec![(0, Box::new(ScriptedBot::new(|_req| None)))]);
        let mut world = world_with_ship(0, Vec2::new(50.0, 50.0));
        world
            .apply(&Step {
                clock: 2,
                duration: 0.01,
                data: StepData::Events(vec![Event {
                    id: 0,
                    data: EventData::Destroy(Destroy),
                }]),
            })
            .unwrap();
        let step = Step {
            clock: 2,
            duration: 0.01,
            data: StepData::Events(vec![Event {
                id: 0,
                data: EventData::Destroy(Destroy),
            }]),
        };
        router.dispatch(&step, &world);
        assert!(router.bound_ship_ids().is_empty());
        // The previously cached control is retained even after unbind.
        assert_eq!(router.controls()[&0], ControllerState::NEUTRAL);
    }

    #[test]
    fn transport_error_unbinds_but_keeps_last_control() {
        struct FlakyBot;
        impl Bot for FlakyBot {
            fn call(&mut self, _req: &Request) -> Result<Option<ControllerState>, BotError> {
                Err(BotError::Closed)
            }
            fn close(&mut self) -> Result<(), BotError> {
                Ok(())
            }
        }

        let mut router = ControllerRouter::new(vec![(0, Box::new(FlakyBot))]);
        router
            .controls
            .insert(0, ControllerState { fire: true, rotate: 0.5, thrust: 1.0 });
        let world = world_with_ship(0, Vec2::new(50.0, 50.0));
        let step = Step {
            clock: 1,
            duration: 0.0,
            data: StepData::Events(vec![]),
        };
        router.dispatch(&step, &world);
        assert!(router.bound_ship_ids().is_empty());
        assert_eq!(
            router.controls()[&0],
            ControllerState { fire: true, rotate: 0.5, thrust: 1.0 }
        );
    }

    #[test]
    fn obscured_ship_state_is_filtered_before_reaching_the_bot() {
        use std::sync::{Arc, Mutex};

        let seen: Arc<Mutex<Option<Step>>> = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();

        let mut world = World::new();
        world
            .apply(&Step {
                clock: 0,
                duration: 0.0,
                data: StepData::Space(SpaceCreate {
                    dimensions: Vec2::new(200.0, 200.0),
                    gravity: 0.0,
                    lifetime: None,
                }),
            })
            .unwrap();
        world
            .apply(&Step {
                clock: 1,
                duration: 0.0,
                data: StepData::Events(vec![
                    Event {
                        id: 0,
                        data: EventData::Create(ObjCreate::Ship(ship_create(Vec2::new(50.0, 100.0)))),
                    },
                    Event {
                        id: 1,
                        data: EventData::Create(ObjCreate::Ship(ship_create(Vec2::new(150.0, 100.0)))),
                    },
                    Event {
                        id: 2,
                        data: EventData::Create(ObjCreate::Planet(PlanetCreate {
                            body: base_body(Vec2::new(100.0, 100.0)),
                            name: "Sol".to_owned(),
                        })),
                    },
                ]),
            })
            .unwrap();

        let mut router = ControllerRouter::new(
            vec![(
                0,
                Box::new(ScriptedBot::new(move |req: &Request| {
                    *seen_clone.lock().unwrap() = Some(req.step.clone());
                    None
                })),
            )],
        );

        let step = Step {
            clock: 2,
            duration: 0.01,
            data: StepData::Events(vec![Event {
                id: 1,
                data: EventData::State(photon_schema::ObjState::Ship(ShipState {
                    body: base_body(Vec2::new(150.0, 100.0)),
                    weapon: WeaponState {
                        fired: false,
                        reload: 0.0,
                        temperature: 0.0,
                    },
                    controller: ControllerState::NEUTRAL,
                })),
            }]),
        };
        router.dispatch(&step, &world);

        let observed = seen.lock().unwrap().clone().unwrap();
        match observed.data {
            StepData::Events(events) => assert!(events.is_empty(), "obscured ship STATE must be filtered"),
            _ => panic!("expected events step"),
        }
    }
}
