//! Event-sourced authoritative state (`spec.md` §4.2, component C3).
//!
//! `World` exposes exactly one mutator, [`World::apply`]; everything else is
//! read-only. This mirrors the single-writer discipline the source used for
//! its world object, and is what lets the simulator, vision filter, and game
//! loop all reason about "the" current state without separate locking.

use std::collections::HashMap;

use photon_schema::{EventData, SpaceCreate, Step, StepData};

use crate::error::WorldError;
use crate::object::Object;

#[derive(Debug, Clone, Default)]
pub struct World {
    pub clock: u64,
    pub time: f32,
    pub space: Option<SpaceCreate>,
    pub objects: HashMap<u64, Object>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one authoritative [`Step`], per `spec.md` §4.2.
    pub fn apply(&mut self, step: &Step) -> Result<(), WorldError> {
        match &step.data {
            StepData::Space(space) => {
                self.space = Some(space.clone());
                self.objects.clear();
                self.time = 0.0;
            }
            StepData::Events(events) => {
                for event in events {
                    match &event.data {
                        EventData::Create(create) => {
                            if self.objects.contains_key(&event.id) {
                                return Err(WorldError::DuplicateId(event.id));
                            }
                            self.objects.insert(
                                event.id,
                                Object::from_create(create.clone(), step.clock),
                            );
                        }
                        EventData::State(state) => {
                            let object = self
                                .objects
                                .get_mut(&event.id)
                                .ok_or(WorldError::UnknownId(event.id))?;
                            object.apply_state(state.clone(), step.clock)?;
                        }
                        EventData::Destroy(_) => {
                            if self.objects.remove(&event.id).is_none() {
                                return Err(WorldError::UnknownId(event.id));
                            }
                        }
                    }
                }
            }
        }
        self.clock = step.clock;
        self.time += step.duration;
        Ok(())
    }
}
