//! Game loop (`spec.md` §4.7, component C8): composes MapSpec, World,
//! Simulator, and a stop predicate into the authoritative *Step* stream.
//!
//! Where the source wrote this as a generator yielding steps lazily, `Match`
//! exposes the equivalent pull-based contract (`spec.md` §9): each call to
//! [`Match::advance`] produces one more `Step`, driven by whatever owns the
//! controller router (in `photon-bot`) or, for bot-free/scripted drivers, by
//! a caller-supplied `controls` map directly.

use std::collections::HashMap;

use photon_schema::{ControllerMeta, ControllerState, Event, EventData, ObjCreate, Step, StepData};

use crate::id::IdGenerator;
use crate::map::MapSpec;
use crate::simulator::Simulator;
use crate::stop::{Outcome, StopPredicate};
use crate::world::World;

enum Phase {
    Space {
        space: photon_schema::SpaceCreate,
        planets: Vec<photon_schema::PlanetCreate>,
        ships: Vec<photon_schema::ShipCreate>,
    },
    Creates {
        planets: Vec<photon_schema::PlanetCreate>,
        ships: Vec<photon_schema::ShipCreate>,
    },
    Running,
}

/// Drives one match from a MapSpec and competitor list to a `Step` stream,
/// applying a stop predicate after every tick.
pub struct Match {
    world: World,
    ids: IdGenerator,
    dt: f32,
    stop: StopPredicate,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Match {
    /// `map` places planets and, once per entry in `competitors` (in order),
    /// a ship. `dt` is the fixed simulated-seconds-per-tick.
    pub fn new(
        map: &mut dyn MapSpec,
        competitors: &[ControllerMeta],
        dt: f32,
        stop: StopPredicate,
    ) -> Self {
        let space = map.space();
        let planets = map.planets();
        let ships = competitors.iter().cloned().map(|meta| map.ship(meta)).collect();
        Self {
            world: World::new(),
            ids: IdGenerator::new(),
            dt,
            stop,
            phase: Phase::Space {
                space,
                planets,
                ships,
            },
            outcome: None,
        }
    }

    /// Advance one tick. `controls` supplies the router's cached controller
    /// states during the Running phase; ignored during the two setup steps.
    /// Returns `None` once the match has ended -- call [`Match::outcome`]
    /// for the reason/winner.
    pub fn advance(&mut self, controls: &HashMap<u64, ControllerState>) -> Option<Step> {
        if self.outcome.is_some() {
            return None;
        }
        // The stop predicate is only consulted once the running loop has
        // started (`spec.md` §4.7: the two setup steps -- Space-Create, then
        // planet/ship Creates -- are unconditional). Capture that *before*
        // `next_step` advances the phase, since building the Creates step is
        // itself the transition into `Running`.
        let already_running = matches!(self.phase, Phase::Running);
        let step = self.next_step(controls);
        self.world
            .apply(&step)
            .expect("engine-produced step must satisfy world invariants");
        if already_running {
            if let Some(outcome) = (self.stop)(&self.world) {
                self.outcome = Some(outcome);
            }
        }
        Some(step)
    }

    fn next_step(&mut self, controls: &HashMap<u64, ControllerState>) -> Step {
        match std::mem::replace(&mut self.phase, Phase::Running) {
            Phase::Space {
                space,
                planets,
                ships,
            } => {
                self.phase = Phase::Creates { planets, ships };
                Step {
                    clock: 0,
                    duration: 0.0,
                    data: StepData::Space(space),
                }
            }
            Phase::Creates { planets, ships } => {
                let mut events = Vec::with_capacity(planets.len() + ships.len());
                for planet in planets {
                    let id = self.ids.next();
                    events.push(Event {
                        id,
                        data: EventData::Create(ObjCreate::Planet(planet)),
                    });
                }
                for ship in ships {
                    let id = self.ids.next();
                    events.push(Event {
                        id,
                        data: EventData::Create(ObjCreate::Ship(ship)),
                    });
                }
                Step {
                    clock: 1,
                    duration: 0.0,
                    data: StepData::Events(events),
                }
            }
            Phase::Running => {
                let events = Simulator::tick(&self.world, self.dt, &mut self.ids, controls);
                Step {
                    clock: self.world.clock + 1,
                    duration: self.dt,
                    data: StepData::Events(events),
                }
            }
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::EmptyMap;
    use crate::stop::{stop_after, stop_when_one_ship};
    use crate::vector::Vec2;

    #[test]
    fn empty_space_with_no_bots_runs_to_the_time_limit() {
        let mut map = EmptyMap::with_space(Vec2::new(150.0, 100.0), 0.1, Some(60.0));
        let dt = 0.01;
        let mut game = Match::new(&mut map, &[], dt, stop_after(60.0));
        let mut count = 0;
        let controls = HashMap::new();
        while let Some(_step) = game.advance(&controls) {
            count += 1;
        }
        let expected = 2 + (60.0f32 / dt).ceil() as i64;
        // Float accumulation of `time += dt` across thousands of ticks can
        // land one tick either side of the idealized count.
        assert!((count - expected).abs() <= 1, "{count} vs {expected}");
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.reason, "exceeded time limit 60");
        assert!(outcome.winner.is_none());
    }

    #[test]
    fn first_two_steps_are_space_then_creates() {
        let mut map = EmptyMap::new(0);
        let meta = ControllerMeta {
            name: "bot".to_owned(),
            version: 0,
        };
        let mut game = Match::new(&mut map, &[meta], 0.01, stop_after(1.0));
        let controls = HashMap::new();
        let step0 = game.advance(&controls).unwrap();
        assert!(matches!(step0.data, StepData::Space(_)));
        assert_eq!(step0.clock, 0);

        let step1 = game.advance(&controls).unwrap();
        assert_eq!(step1.clock, 1);
        match step1.data {
            StepData::Events(events) => {
                assert_eq!(events.len(), 1);
                assert!(matches!(events[0].data, EventData::Create(ObjCreate::Ship(_))));
            }
            _ => panic!("expected events step"),
        }
    }

    #[test]
    fn stop_predicate_does_not_trip_on_the_zero_object_setup_steps() {
        // Before any ship exists (the clock-0 Space-Create step), a
        // ship-count predicate like `stop_when_one_ship` would trip as a
        // draw -- the match must not end before the running loop starts.
        let mut map = EmptyMap::new(0);
        let metas = vec![
            ControllerMeta {
                name: "a".to_owned(),
                version: 0,
            },
            ControllerMeta {
                name: "b".to_owned(),
                version: 0,
            },
        ];
        let mut game = Match::new(&mut map, &metas, 0.01, stop_when_one_ship());
        let controls = HashMap::new();

        let step0 = game.advance(&controls).unwrap();
        assert_eq!(step0.clock, 0);
        assert!(game.outcome().is_none());

        let step1 = game.advance(&controls).unwrap();
        assert_eq!(step1.clock, 1);
        assert!(game.outcome().is_none());

        // Two ships now exist and are far enough apart not to collide
        // immediately, so the running loop must continue past clock 2.
        let step2 = game.advance(&controls).unwrap();
        assert_eq!(step2.clock, 2);
        assert!(game.outcome().is_none());
    }
}
