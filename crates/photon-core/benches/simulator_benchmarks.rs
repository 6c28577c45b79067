use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, Criterion};
use photon_core::map::{registry, MapSpec};
use photon_core::{IdGenerator, Simulator, World};
use photon_schema::{ControllerMeta, ControllerState};

/// A singleton-map world with `count` orbiting ships, ready for repeated
/// `Simulator::tick` calls -- the hot loop a driver spends most of its time
/// in over a real match.
fn populated_world(count: usize) -> World {
    let mut map: Box<dyn MapSpec> = (registry()["singleton"])(0);
    let mut world = World::new();
    world
        .apply(&photon_schema::Step {
            clock: 0,
            duration: 0.0,
            data: photon_schema::StepData::Space(map.space()),
        })
        .unwrap();

    let mut ids = IdGenerator::new();
    let mut events = Vec::new();
    for planet in map.planets() {
        events.push(photon_schema::Event {
            id: ids.next(),
            data: photon_schema::EventData::Create(photon_schema::ObjCreate::Planet(planet)),
        });
    }
    for i in 0..count {
        let meta = ControllerMeta {
            name: format!("bot-{i}"),
            version: 0,
        };
        events.push(photon_schema::Event {
            id: ids.next(),
            data: photon_schema::EventData::Create(photon_schema::ObjCreate::Ship(
                map.ship(meta),
            )),
        });
    }
    world
        .apply(&photon_schema::Step {
            clock: 1,
            duration: 0.0,
            data: photon_schema::StepData::Events(events),
        })
        .unwrap();
    world
}

fn bench_tick(c: &mut Criterion, count: usize) {
    let world = populated_world(count);
    let mut ids = IdGenerator::new();
    let controls: HashMap<u64, ControllerState> = world
        .objects
        .keys()
        .map(|&id| (id, ControllerState::NEUTRAL))
        .collect();
    c.bench_function(&format!("simulator_tick_{count}_ships"), |b| {
        b.iter(|| Simulator::tick(&world, 0.01, &mut ids, &controls))
    });
}

fn bench_tick_small(c: &mut Criterion) {
    bench_tick(c, 4);
}

fn bench_tick_large(c: &mut Criterion) {
    bench_tick(c, 64);
}

criterion_group!(benches, bench_tick_small, bench_tick_large);
criterion_main!(benches);
