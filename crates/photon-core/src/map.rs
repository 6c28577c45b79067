//! MapSpec interface (`spec.md` §4.3, component C4): a seeded, deterministic
//! factory for a game's initial Space, planets, and ship placements.
//!
//! Where the source located its maps through a singleton registry reached
//! by dynamic attribute lookup, here the registry is an explicit
//! `name -> factory` table built once at startup (`spec.md` §9).

use std::collections::HashMap;
use std::f32::consts::TAU;

use photon_schema::{Body, ControllerMeta, PlanetCreate, ShipCreate, SpaceCreate, WeaponSpec};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::vector::{dir, Vec2};

/// `0, 1/2, 1/4, 3/4, 1/8, 3/8, 5/8, 7/8, ...` -- the bit-reversal (van der
/// Corput) sequence named in the glossary, used so that successive ship
/// placements are spread maximally without knowing the final bot count in
/// advance.
pub fn binary_subdivision(index: u32) -> f32 {
    let mut n = index;
    let mut result = 0.0f32;
    let mut place = 0.5f32;
    while n > 0 {
        if n & 1 == 1 {
            result += place;
        }
        n >>= 1;
        place *= 0.5;
    }
    result
}

fn default_weapon() -> WeaponSpec {
    WeaponSpec {
        max_reload: 0.1,
        max_temperature: 3.0,
        temperature_decay: 0.25,
        speed: 40.0,
        time_to_live: 5.0,
    }
}

/// A seeded, deterministic factory for a game's initial Space, planets, and
/// ship placements. `ship` is `&mut self` because successive calls must
/// advance a placement sequence; `space` and `planets` stay pure in `seed`.
pub trait MapSpec {
    fn space(&self) -> SpaceCreate;
    fn planets(&self) -> Vec<PlanetCreate>;
    /// Called once per competing bot, in competition order.
    fn ship(&mut self, meta: ControllerMeta) -> ShipCreate;
}

/// No planets; ships are spread around a ring centered on the space.
pub struct EmptyMap {
    dimensions: Vec2,
    gravity: f32,
    lifetime: Option<f32>,
    ship_index: u32,
}

impl EmptyMap {
    pub fn new(_seed: u32) -> Self {
        Self::with_space(Vec2::new(200.0, 200.0), 0.0, None)
    }

    pub fn with_space(dimensions: Vec2, gravity: f32, lifetime: Option<f32>) -> Self {
        Self {
            dimensions,
            gravity,
            lifetime,
            ship_index: 0,
        }
    }
}

impl MapSpec for EmptyMap {
    fn space(&self) -> SpaceCreate {
        SpaceCreate {
            dimensions: self.dimensions,
            gravity: self.gravity,
            lifetime: self.lifetime,
        }
    }

    fn planets(&self) -> Vec<PlanetCreate> {
        Vec::new()
    }

    fn ship(&mut self, meta: ControllerMeta) -> ShipCreate {
        let bearing = binary_subdivision(self.ship_index) * TAU;
        self.ship_index += 1;
        let center = self.dimensions * 0.5;
        let ring_radius = self.dimensions.x.min(self.dimensions.y) * 0.35;
        let position = center + dir(bearing) * ring_radius;
        ShipCreate {
            body: Body {
                radius: 1.0,
                mass: 1.0,
                position,
                velocity: Vec2::ZERO,
                orientation: bearing,
            },
            weapon: default_weapon(),
            controller: meta,
            max_thrust: 10.0,
            max_rotate: 3.0,
        }
    }
}

/// One central, massive planet; ships placed in a ring around it.
pub struct SingletonMap {
    dimensions: Vec2,
    gravity: f32,
    lifetime: Option<f32>,
    planet_radius: f32,
    planet_mass: f32,
    ship_index: u32,
}

impl SingletonMap {
    pub fn new(_seed: u32) -> Self {
        Self {
            dimensions: Vec2::new(200.0, 200.0),
            gravity: 6.0,
            lifetime: None,
            planet_radius: 15.0,
            planet_mass: 500.0,
            ship_index: 0,
        }
    }
}

impl MapSpec for SingletonMap {
    fn space(&self) -> SpaceCreate {
        SpaceCreate {
            dimensions: self.dimensions,
            gravity: self.gravity,
            lifetime: self.lifetime,
        }
    }

    fn planets(&self) -> Vec<PlanetCreate> {
        vec![PlanetCreate {
            body: Body {
                radius: self.planet_radius,
                mass: self.planet_mass,
                position: self.dimensions * 0.5,
                velocity: Vec2::ZERO,
                orientation: 0.0,
            },
            name: "Sol".to_owned(),
        }]
    }

    fn ship(&mut self, meta: ControllerMeta) -> ShipCreate {
        let bearing = binary_subdivision(self.ship_index) * TAU;
        self.ship_index += 1;
        let center = self.dimensions * 0.5;
        let orbit_radius = self.planet_radius + self.dimensions.x.min(self.dimensions.y) * 0.3;
        let position = center + dir(bearing) * orbit_radius;
        // Circular-orbit speed for the chosen radius, tangential to the
        // bearing (perpendicular to the radial direction).
        let orbit_speed = (self.gravity * self.planet_mass / orbit_radius).sqrt();
        let tangential = Vec2::new(dir(bearing).y, -dir(bearing).x);
        ShipCreate {
            body: Body {
                radius: 1.0,
                mass: 1.0,
                position,
                velocity: tangential * orbit_speed,
                orientation: bearing,
            },
            weapon: default_weapon(),
            controller: meta,
            max_thrust: 10.0,
            max_rotate: 3.0,
        }
    }
}

/// Two planets orbiting their shared barycenter; ships start between them.
pub struct BinaryMap {
    dimensions: Vec2,
    gravity: f32,
    lifetime: Option<f32>,
    separation: f32,
    planet_radius: f32,
    planet_mass: f32,
    ship_index: u32,
}

impl BinaryMap {
    pub fn new(_seed: u32) -> Self {
        Self {
            dimensions: Vec2::new(300.0, 300.0),
            gravity: 6.0,
            lifetime: None,
            separation: 80.0,
            planet_radius: 12.0,
            planet_mass: 300.0,
            ship_index: 0,
        }
    }
}

impl MapSpec for BinaryMap {
    fn space(&self) -> SpaceCreate {
        SpaceCreate {
            dimensions: self.dimensions,
            gravity: self.gravity,
            lifetime: self.lifetime,
        }
    }

    fn planets(&self) -> Vec<PlanetCreate> {
        let center = self.dimensions * 0.5;
        let half = self.separation * 0.5;
        vec![
            PlanetCreate {
                body: Body {
                    radius: self.planet_radius,
                    mass: self.planet_mass,
                    position: center + Vec2::new(-half, 0.0),
                    velocity: Vec2::ZERO,
                    orientation: 0.0,
                },
                name: "Castor".to_owned(),
            },
            PlanetCreate {
                body: Body {
                    radius: self.planet_radius,
                    mass: self.planet_mass,
                    position: center + Vec2::new(half, 0.0),
                    velocity: Vec2::ZERO,
                    orientation: 0.0,
                },
                name: "Pollux".to_owned(),
            },
        ]
    }

    fn ship(&mut self, meta: ControllerMeta) -> ShipCreate {
        let bearing = binary_subdivision(self.ship_index) * TAU;
        self.ship_index += 1;
        let center = self.dimensions * 0.5;
        let ring_radius = self.separation * 1.5;
        let position = center + dir(bearing) * ring_radius;
        ShipCreate {
            body: Body {
                radius: 1.0,
                mass: 1.0,
                position,
                velocity: Vec2::ZERO,
                orientation: bearing,
            },
            weapon: default_weapon(),
            controller: meta,
            max_thrust: 10.0,
            max_rotate: 3.0,
        }
    }
}

/// A procedurally scattered planet field; planet count and placement are a
/// pure function of `seed` via a seeded, reproducible PRNG (confined to map
/// construction -- the simulator itself never consults an RNG).
pub struct OrbitalMap {
    dimensions: Vec2,
    gravity: f32,
    lifetime: Option<f32>,
    planets: Vec<PlanetCreate>,
    ship_index: u32,
}

impl OrbitalMap {
    pub fn new(seed: u32) -> Self {
        let dimensions = Vec2::new(400.0, 400.0);
        let mut rng = Pcg32::seed_from_u64(seed as u64);
        let planet_count = 3;
        let mut planets = Vec::with_capacity(planet_count);
        for i in 0..planet_count {
            let bearing = binary_subdivision(i as u32) * TAU;
            let radius = 60.0 + (i as f32) * 40.0;
            use rand::Rng;
            let mass: f32 = rng.gen_range(100.0..400.0);
            let position = dimensions * 0.5 + dir(bearing) * radius;
            planets.push(PlanetCreate {
                body: Body {
                    radius: 8.0 + (i as f32) * 2.0,
                    mass,
                    position,
                    velocity: Vec2::ZERO,
                    orientation: 0.0,
                },
                name: format!("Planet-{i}"),
            });
        }
        Self {
            dimensions,
            gravity: 4.0,
            lifetime: None,
            planets,
            ship_index: 0,
        }
    }
}

impl MapSpec for OrbitalMap {
    fn space(&self) -> SpaceCreate {
        SpaceCreate {
            dimensions: self.dimensions,
            gravity: self.gravity,
            lifetime: self.lifetime,
        }
    }

    fn planets(&self) -> Vec<PlanetCreate> {
        self.planets.clone()
    }

    fn ship(&mut self, meta: ControllerMeta) -> ShipCreate {
        let bearing = binary_subdivision(self.ship_index) * TAU;
        self.ship_index += 1;
        let center = self.dimensions * 0.5;
        let ring_radius = self.dimensions.x.min(self.dimensions.y) * 0.45;
        let position = center + dir(bearing) * ring_radius;
        ShipCreate {
            body: Body {
                radius: 1.0,
                mass: 1.0,
                position,
                velocity: Vec2::ZERO,
                orientation: bearing,
            },
            weapon: default_weapon(),
            controller: meta,
            max_thrust: 10.0,
            max_rotate: 3.0,
        }
    }
}

/// Explicit `name -> factory` table, built once at startup -- replaces the
/// source's dynamic-attribute map registry (`spec.md` §9).
pub fn registry() -> HashMap<&'static str, fn(u32) -> Box<dyn MapSpec>> {
    let mut table: HashMap<&'static str, fn(u32) -> Box<dyn MapSpec>> = HashMap::new();
    table.insert("empty", |seed| Box::new(EmptyMap::new(seed)));
    table.insert("singleton", |seed| Box::new(SingletonMap::new(seed)));
    table.insert("orbital", |seed| Box::new(OrbitalMap::new(seed)));
    table.insert("binary", |seed| Box::new(BinaryMap::new(seed)));
    table
}
