//! Fog-of-war vision filter (`spec.md` §4.5, component C6).
//!
//! Operates purely on `Body` snapshots handed to it by the caller (the
//! controller router), not on a `World` reference -- this keeps the filter
//! trivially testable and keeps C6 from depending on C3/C7 at all.

use photon_schema::{Body, EventData, ObjState, Step, StepData};

/// Whether Planet `planet` obscures `target` as seen from `viewer`
/// (`spec.md` §4.5). Symmetric in `viewer`/`target` by construction: swapping
/// them negates `u` and `k` together, leaving `0 < k < d` and the
/// perpendicular-distance test unchanged.
pub fn obscured(viewer: &Body, target: &Body, planet: &Body) -> bool {
    let l = target.position - viewer.position;
    let d = l.length();
    if d == 0.0 {
        return false;
    }
    let u = l / d;
    let to_planet = planet.position - viewer.position;
    let k = u.dot(to_planet);
    if !(k > 0.0 && k < d) {
        return false;
    }
    let perp_sq = to_planet.length_squared() - k * k;
    perp_sq < planet.radius * planet.radius
}

/// Whether any of `planets` obscures `target` from `viewer`.
pub fn obscured_by_any(viewer: &Body, target: &Body, planets: &[Body]) -> bool {
    planets.iter().any(|planet| obscured(viewer, target, planet))
}

/// Rewrite `step` as seen by a ship at `viewer`, given the planets currently
/// in the world. Space-Create steps pass through untouched; event-list steps
/// drop STATE updates of ships obscured from `viewer`, but never CREATE or
/// DESTROY events (`spec.md` §4.5).
pub fn filter_step(step: &Step, viewer: &Body, planets: &[Body]) -> Step {
    match &step.data {
        StepData::Space(_) => step.clone(),
        StepData::Events(events) => {
            let filtered = events
                .iter()
                .filter(|event| match &event.data {
                    EventData::State(ObjState::Ship(ship_state)) => {
                        !obscured_by_any(viewer, &ship_state.body, planets)
                    }
                    _ => true,
                })
                .cloned()
                .collect();
            Step {
                clock: step.clock,
                duration: step.duration,
                data: StepData::Events(filtered),
            }
        }
    }
}
