//! Ready-made experiments and presets.
//!
//! An [`Experiment`] decides which force laws run; a [`Preset`] fills an
//! engine with bodies around a center point.

use crate::{
    body::{Body, BodyDesc, BodyId},
    engine::SimulationEngine,
    forces::{BoundaryContainment, ForceLaw},
    params::Parameters,
    vector::Vector2D,
};

use serde::{Deserialize, Serialize};

use std::f64::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experiment {
    /// Newtonian gravity, trails on.
    #[default]
    Gravity,
    /// Coulomb forces with damping and boundary containment, trails off.
    Electrostatics,
}

impl Experiment {
    /// Force laws for this experiment, in the order they must run.
    pub fn force_laws(self, width: f64, height: f64) -> Vec<ForceLaw> {
        match self {
            Experiment::Gravity => vec![ForceLaw::Gravity],
            Experiment::Electrostatics => vec![
                ForceLaw::Coulomb,
                ForceLaw::Damping,
                ForceLaw::Boundary(BoundaryContainment::new(width, height)),
            ],
        }
    }

    /// An idle engine with this experiment's laws registered.
    pub fn engine(self, params: Parameters, width: f64, height: f64) -> SimulationEngine {
        SimulationEngine::with_laws(params, self.force_laws(width, height))
    }

    /// Preset loaded when the experiment is reset.
    pub fn default_preset(self) -> Preset {
        match self {
            Experiment::Gravity => Preset::SolarSystem,
            Experiment::Electrostatics => Preset::Dipole,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Fixed star with three planets on circular orbits.
    SolarSystem,
    /// Fixed ±5 dipole with four free unit charges.
    Dipole,
    /// 3x3 grid of +3 charges with a little positional jitter.
    RepulsionLattice,
    /// Row of six alternating ±4 charges.
    AttractionChain,
}

impl Preset {
    pub const STAR_MASS: f64 = 2000.0;
    pub const STAR_RADIUS: f64 = 22.0;

    /// Adds this preset's bodies to `engine`, centered on `center`.
    pub fn populate(self, engine: &mut SimulationEngine, center: Vector2D, rng: &mut fastrand::Rng) {
        let g = engine.params().g;
        match self {
            Preset::SolarSystem => {
                engine.add_body(
                    BodyDesc::new(Self::STAR_MASS)
                        .at(center)
                        .radius(Self::STAR_RADIUS)
                        .fixed(true)
                        .label("Star"),
                );
                let planets = [
                    (10.0, 110.0, 0.0, "Planet A"),
                    (15.0, 175.0, PI / 3.0, "Planet B"),
                    (5.0, 240.0, PI, "Planet C"),
                ];
                for (mass, orbit_radius, angle, label) in planets {
                    engine.add_body(
                        orbiting_body(center, Self::STAR_MASS, mass, orbit_radius, angle, g).label(label),
                    );
                }
            }
            Preset::Dipole => {
                let offset = |x: f64, y: f64| center + Vector2D::new(x, y);
                engine.add_body(charge(5.0, offset(-120.0, 0.0)).fixed(true));
                engine.add_body(charge(-5.0, offset(120.0, 0.0)).fixed(true));
                engine.add_body(charge(1.0, offset(0.0, -110.0)));
                engine.add_body(charge(1.0, offset(0.0, 110.0)));
                engine.add_body(charge(-1.0, offset(-60.0, -60.0)));
                engine.add_body(charge(-1.0, offset(60.0, 60.0)));
            }
            Preset::RepulsionLattice => {
                let spacing = 100.0;
                for i in -1..=1 {
                    for j in -1..=1 {
                        let jitter = Vector2D::new(rng.f64() - 0.5, rng.f64() - 0.5) * 10.0;
                        let pos = center + Vector2D::new(i as f64, j as f64) * spacing + jitter;
                        engine.add_body(charge(3.0, pos));
                    }
                }
            }
            Preset::AttractionChain => {
                let n = 6;
                let spacing = 80.0;
                let start = center.x - (n as f64 / 2.0) * spacing + spacing / 2.0;
                for i in 0..n {
                    let q = if i % 2 == 0 { 4.0 } else { -4.0 };
                    engine.add_body(charge(q, Vector2D::new(start + i as f64 * spacing, center.y)));
                }
            }
        }
    }
}

/// Speed of a circular orbit of radius `r` around mass `m`: `sqrt(G·M / r)`.
pub fn circular_speed(g: f64, m: f64, r: f64) -> f64 {
    (g * m / r).sqrt()
}

/// Display radius for a planet of the given mass.
pub fn planet_radius(mass: f64) -> f64 {
    (mass.sqrt() * 1.2).max(4.0)
}

/// A body on a circular orbit of `orbit_radius` around `center`, starting at
/// `angle` radians and moving counter-clockwise (in screen coordinates, y down).
pub fn orbiting_body(
    center: Vector2D,
    central_mass: f64,
    mass: f64,
    orbit_radius: f64,
    angle: f64,
    g: f64,
) -> BodyDesc {
    let (sin, cos) = angle.sin_cos();
    let pos = center + Vector2D::new(cos, sin) * orbit_radius;
    let speed = circular_speed(g, central_mass, orbit_radius);
    let vel = Vector2D::new(-sin, cos) * speed;

    BodyDesc::new(mass).at(pos).moving(vel).radius(planet_radius(mass))
}

/// User-placed body. Without an angle (in degrees) a random one is picked.
pub fn custom_body(
    center: Vector2D,
    mass: f64,
    orbit_radius: f64,
    angle_deg: Option<f64>,
    vel: Vector2D,
    rng: &mut fastrand::Rng,
) -> BodyDesc {
    let angle = match angle_deg {
        Some(deg) => deg.to_radians(),
        None => rng.f64() * TAU,
    };
    let pos = center + Vector2D::new(angle.cos(), angle.sin()) * orbit_radius;

    BodyDesc::new(mass).at(pos).moving(vel).radius(planet_radius(mass))
}

/// A free point charge at `pos`. Mass follows the charge magnitude (`max(1, 2|q|)`)
/// so that larger charges are also more sluggish; trails are disabled.
pub fn charge(q: f64, pos: Vector2D) -> BodyDesc {
    let label = if q > 0.0 { format!("+{q}") } else { format!("{q}") };
    BodyDesc::new((q.abs() * 2.0).max(1.0))
        .at(pos)
        .radius((q.abs() * 3.5).max(Body::DEFAULT_RADIUS))
        .charge(q)
        .label(label)
        .max_trail(0)
}

/// Resets `engine` and loads `preset`. Returns the ids of the new bodies.
pub fn load(
    engine: &mut SimulationEngine,
    preset: Preset,
    center: Vector2D,
    rng: &mut fastrand::Rng,
) -> Vec<BodyId> {
    engine.reset();
    preset.populate(engine, center, rng);
    engine.bodies().iter().map(Body::id).collect()
}
