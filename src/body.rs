use crate::vector::{self, Vector2D};

use serde::{Deserialize, Serialize};

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique body identifier. Assigned at creation, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(u64);

impl BodyId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Description of a body to create. Every field is optional when deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDesc {
    pub mass: f64,
    #[serde(with = "vector::object")]
    pub pos: Vector2D,
    #[serde(with = "vector::object")]
    pub vel: Vector2D,
    pub radius: f64,
    pub charge: f64,
    pub fixed: bool,
    pub label: String,
    pub max_trail: usize,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            mass: 1.0,
            pos: vector::zero(),
            vel: vector::zero(),
            radius: Body::DEFAULT_RADIUS,
            charge: 0.0,
            fixed: false,
            label: String::new(),
            max_trail: Body::DEFAULT_MAX_TRAIL,
        }
    }
}

impl BodyDesc {
    pub fn new(mass: f64) -> Self {
        Self {
            mass,
            ..Self::default()
        }
    }

    pub fn at(mut self, pos: Vector2D) -> Self {
        self.pos = pos;
        self
    }

    pub fn moving(mut self, vel: Vector2D) -> Self {
        self.vel = vel;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn max_trail(mut self, max_trail: usize) -> Self {
        self.max_trail = max_trail;
        self
    }
}

/// A simulated point mass / charge.
#[derive(Clone, Debug)]
pub struct Body {
    id: BodyId,
    /// Position vector.
    pub pos: Vector2D,
    /// Velocity vector.
    pub vel: Vector2D,
    /// Force accumulated during the current tick. Cleared by [`Body::integrate`].
    force: Vector2D,
    /// Inertial mass, always > 0.
    pub mass: f64,
    /// Visual radius; also sets the pairwise softening distance.
    pub radius: f64,
    /// Signed charge, only read by the Coulomb law.
    pub charge: f64,
    /// Anchors never accept forces and never move.
    pub fixed: bool,
    pub label: String,
    trail: VecDeque<Vector2D>,
    max_trail: usize,
}

impl Body {
    pub const DEFAULT_RADIUS: f64 = 10.0;
    pub const DEFAULT_MAX_TRAIL: usize = 120;

    /// Creates a body with a fresh id. A non-positive or non-finite mass is replaced by 1.
    pub fn new(desc: BodyDesc) -> Self {
        let mass = if desc.mass.is_finite() && desc.mass > 0.0 {
            desc.mass
        } else {
            log::warn!("body '{}' has invalid mass {}, using 1", desc.label, desc.mass);
            1.0
        };

        Self {
            id: BodyId::next(),
            pos: desc.pos,
            vel: desc.vel,
            force: Vector2D::zero(),
            mass,
            radius: desc.radius,
            charge: desc.charge,
            fixed: desc.fixed,
            label: desc.label,
            trail: VecDeque::new(),
            max_trail: desc.max_trail,
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Force accumulated so far in this tick.
    pub fn force(&self) -> Vector2D {
        self.force
    }

    /// Past positions, oldest first.
    pub fn trail(&self) -> &VecDeque<Vector2D> {
        &self.trail
    }

    pub fn max_trail(&self) -> usize {
        self.max_trail
    }

    /// Changes the trail capacity, evicting the oldest samples if needed. 0 disables trails.
    pub fn set_max_trail(&mut self, max_trail: usize) {
        self.max_trail = max_trail;
        while self.trail.len() > max_trail {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Adds `f` to the accumulated force. Ignored for fixed bodies.
    #[inline]
    pub fn apply_force(&mut self, f: Vector2D) {
        if !self.fixed {
            self.force += f;
        }
    }

    /// Advances the body by `dt` with semi-implicit Euler (velocity first, then
    /// position from the new velocity) and clears the accumulated force.
    pub fn integrate(&mut self, dt: f64) {
        if self.fixed {
            return;
        }

        let acc = self.force / self.mass;
        self.vel += acc * dt;

        if self.max_trail > 0 {
            if self.trail.len() >= self.max_trail {
                self.trail.pop_front();
            }
            self.trail.push_back(self.pos);
        }

        self.pos += self.vel * dt;
        self.force = Vector2D::zero();
    }

    /// `0.5 * m * |v|²`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.mag_sq()
    }

    pub fn momentum(&self) -> Vector2D {
        self.vel * self.mass
    }

    /// Descriptor that recreates this body's current state (under a new id).
    pub fn to_desc(&self) -> BodyDesc {
        BodyDesc {
            mass: self.mass,
            pos: self.pos,
            vel: self.vel,
            radius: self.radius,
            charge: self.charge,
            fixed: self.fixed,
            label: self.label.clone(),
            max_trail: self.max_trail,
        }
    }
}
