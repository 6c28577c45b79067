//! Property tests for `spec.md` §8 "Vision symmetry" and "Vision preserves
//! life-events".

use photon_core::vision::{filter_step, obscured};
use photon_schema::vector::Vec2;
use photon_schema::{
    Body, ControllerState, Destroy, Event, EventData, ObjState, ShipState, Step, StepData,
    WeaponState,
};
use proptest::prelude::*;

fn finite_coord() -> impl Strategy<Value = f32> {
    -200.0f32..200.0f32
}

fn body_strategy() -> impl Strategy<Value = Body> {
    (finite_coord(), finite_coord(), 0.1f32..50.0).prop_map(|(x, y, radius)| Body {
        radius,
        mass: 0.0,
        position: Vec2::new(x, y),
        velocity: Vec2::ZERO,
        orientation: 0.0,
    })
}

proptest! {
    #[test]
    fn vision_symmetry_holds_for_any_triple(
        viewer in body_strategy(),
        target in body_strategy(),
        planet in body_strategy(),
    ) {
        prop_assume!((viewer.position - target.position).length() > 0.01);
        prop_assert_eq!(
            obscured(&viewer, &target, &planet),
            obscured(&target, &viewer, &planet)
        );
    }

    #[test]
    fn vision_preserves_create_and_destroy(
        viewer in body_strategy(),
        target in body_strategy(),
        planet in body_strategy(),
        event_is_create in any::<bool>(),
    ) {
        let data = if event_is_create {
            EventData::Create(photon_schema::ObjCreate::Ship(photon_schema::ShipCreate {
                body: target,
                weapon: photon_schema::WeaponSpec {
                    max_reload: 0.1,
                    max_temperature: 3.0,
                    temperature_decay: 0.25,
                    speed: 10.0,
                    time_to_live: 5.0,
                },
                controller: photon_schema::ControllerMeta { name: "t".to_owned(), version: 0 },
                max_thrust: 1.0,
                max_rotate: 1.0,
            }))
        } else {
            EventData::Destroy(Destroy)
        };
        let step = Step {
            clock: 1,
            duration: 0.01,
            data: StepData::Events(vec![Event { id: 1, data }]),
        };
        let filtered = filter_step(&step, &viewer, &[planet]);
        match filtered.data {
            StepData::Events(events) => prop_assert_eq!(events.len(), 1),
            _ => prop_assert!(false, "expected events step"),
        }
    }

    #[test]
    fn vision_drops_only_obscured_ship_state(
        viewer in body_strategy(),
        target in body_strategy(),
        planet in body_strategy(),
    ) {
        let ship_state = ShipState {
            body: target,
            weapon: WeaponState { fired: false, reload: 0.0, temperature: 0.0 },
            controller: ControllerState::NEUTRAL,
        };
        let step = Step {
            clock: 1,
            duration: 0.01,
            data: StepData::Events(vec![Event {
                id: 1,
                data: EventData::State(ObjState::Ship(ship_state)),
            }]),
        };
        let filtered = filter_step(&step, &viewer, &[planet]);
        let is_obscured = obscured(&viewer, &target, &planet);
        match filtered.data {
            StepData::Events(events) => prop_assert_eq!(events.is_empty(), is_obscured),
            _ => prop_assert!(false, "expected events step"),
        }
    }
}
