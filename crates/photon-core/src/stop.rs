//! Stop predicates and match outcome (`spec.md` §4.7, §9 glossary).
//!
//! A stop predicate is a pure function of [`World`] that either returns
//! nothing (continue) or an [`Outcome`] (the `Stop` control-flow signal of
//! `spec.md` §7, modeled here as a plain return value rather than a Rust
//! error -- it is not a failure, and the game loop's caller expects it as an
//! ordinary result).

use photon_schema::ControllerMeta;
use tracing::info;

use crate::object::Object;
use crate::world::World;

/// The reason a match ended, and the winner if any (`spec.md` §6).
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reason: String,
    pub winner: Option<ControllerMeta>,
}

/// A pure function of `World` deciding whether the match should end.
pub type StopPredicate = Box<dyn Fn(&World) -> Option<Outcome> + Send>;

/// Trip when `world.time >= limit`.
pub fn stop_after(limit: f32) -> StopPredicate {
    Box::new(move |world| {
        if world.time >= limit {
            info!(clock = world.clock, limit, "stop predicate tripped: time limit exceeded");
            Some(Outcome {
                reason: format!("exceeded time limit {limit}"),
                winner: None,
            })
        } else {
            None
        }
    })
}

fn ships(world: &World) -> Vec<&crate::object::Ship> {
    world
        .objects
        .values()
        .filter_map(|object| match object {
            Object::Ship(ship) => Some(ship),
            _ => None,
        })
        .collect()
}

/// Trip (as a draw) when no Ship remains.
pub fn stop_when_no_ships() -> StopPredicate {
    Box::new(|world| {
        if ships(world).is_empty() {
            info!(clock = world.clock, "stop predicate tripped: no ships remain");
            Some(Outcome {
                reason: "no ships remain".to_owned(),
                winner: None,
            })
        } else {
            None
        }
    })
}

/// Trip when exactly one Ship remains (winner is its controller); trips as a
/// draw if zero remain.
pub fn stop_when_one_ship() -> StopPredicate {
    Box::new(|world| {
        let remaining = ships(world);
        match remaining.len() {
            0 => {
                info!(clock = world.clock, "stop predicate tripped: no ships remain");
                Some(Outcome {
                    reason: "no ships remain".to_owned(),
                    winner: None,
                })
            }
            1 => {
                let meta = remaining[0].controller_meta.clone();
                info!(
                    clock = world.clock,
                    winner = %meta.name,
                    version = meta.version,
                    "stop predicate tripped: one ship remains"
                );
                Some(Outcome {
                    reason: format!("won by {}:v{}", meta.name, meta.version),
                    winner: Some(meta),
                })
            }
            _ => None,
        }
    })
}

/// Compose predicates: trip on the first one that trips.
pub fn stop_any(predicates: Vec<StopPredicate>) -> StopPredicate {
    Box::new(move |world| predicates.iter().find_map(|predicate| predicate(world)))
}

/// The default predicate used by drivers, keyed by competitor count
/// (`spec.md` §4.7): 0 bots -> time-only; 1 -> no-ships-or-time; >=2 ->
/// one-ship-or-time.
pub fn default_predicate(bot_count: usize, time_limit: f32) -> StopPredicate {
    match bot_count {
        0 => stop_after(time_limit),
        1 => stop_any(vec![stop_when_no_ships(), stop_after(time_limit)]),
        _ => stop_any(vec![stop_when_one_ship(), stop_after(time_limit)]),
    }
}
