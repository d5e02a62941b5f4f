//! Force laws applied once per tick, in registration order.
//!
//! Each law adds into the per-body force accumulator (or, for damping,
//! scales velocity in place). Pairwise laws visit every unordered pair
//! exactly once and apply equal and opposite forces.

use crate::{
    body::Body,
    params::Parameters,
    vector::{Vector2D, Vector2DExt},
};

use serde::{Deserialize, Serialize};

/// Soft spring that pushes bodies back inside a rectangle inset by `margin`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryContainment {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Force per unit of penetration past the margin.
    pub stiffness: f64,
}

impl Default for BoundaryContainment {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: Self::DEFAULT_MARGIN,
            stiffness: Self::DEFAULT_STIFFNESS,
        }
    }
}

impl BoundaryContainment {
    pub const DEFAULT_MARGIN: f64 = 20.0;
    pub const DEFAULT_STIFFNESS: f64 = 2.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Restoring force for a body at `pos`. Zero inside the margin.
    pub fn force_at(&self, pos: Vector2D) -> Vector2D {
        let lo = self.margin;
        let hi_x = self.width - self.margin;
        let hi_y = self.height - self.margin;

        let mut f = Vector2D::zero();
        if pos.x < lo {
            f.x += (lo - pos.x) * self.stiffness;
        }
        if pos.x > hi_x {
            f.x -= (pos.x - hi_x) * self.stiffness;
        }
        if pos.y < lo {
            f.y += (lo - pos.y) * self.stiffness;
        }
        if pos.y > hi_y {
            f.y -= (pos.y - hi_y) * self.stiffness;
        }
        f
    }
}

/// The closed set of force laws an engine can run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForceLaw {
    /// Pairwise Newtonian attraction, `G·mA·mB / r²`.
    Gravity,
    /// Pairwise Coulomb force, `k·|qA|·|qB| / r²`. Like charges repel.
    Coulomb,
    /// Scales each free body's velocity by `Parameters::damping`.
    Damping,
    /// Keeps bodies inside a rectangle.
    Boundary(BoundaryContainment),
}

impl ForceLaw {
    /// Gravity softening distance as a fraction of the summed radii.
    pub const GRAVITY_SOFTENING: f64 = 0.5;
    /// Coulomb softening distance as a fraction of the summed radii.
    pub const COULOMB_SOFTENING: f64 = 1.2;

    pub fn name(&self) -> &'static str {
        match self {
            ForceLaw::Gravity => "gravity",
            ForceLaw::Coulomb => "coulomb",
            ForceLaw::Damping => "damping",
            ForceLaw::Boundary(_) => "boundary",
        }
    }

    /// Applies this law to every body for one tick.
    pub fn apply(&self, params: &Parameters, bodies: &mut [Body]) {
        match self {
            ForceLaw::Gravity => gravity(params.g, bodies),
            ForceLaw::Coulomb => coulomb(params.k, bodies),
            ForceLaw::Damping => damping(params.damping, bodies),
            ForceLaw::Boundary(bounds) => boundary(bounds, bodies),
        }
    }

    /// Potential energy stored in the current configuration under this law.
    /// Only the pairwise laws contribute.
    pub fn potential_energy(&self, params: &Parameters, bodies: &[Body]) -> f64 {
        match self {
            ForceLaw::Gravity => sum_pairs(bodies, |a, b| {
                let r = softened_distance(a, b, Self::GRAVITY_SOFTENING);
                -params.g * a.mass * b.mass / r
            }),
            ForceLaw::Coulomb => sum_pairs(bodies, |a, b| {
                let r = softened_distance(a, b, Self::COULOMB_SOFTENING);
                params.k * a.charge * b.charge / r
            }),
            ForceLaw::Damping | ForceLaw::Boundary(_) => 0.0,
        }
    }
}

/// Calls `f` once for every unordered pair `(i, j)` with `i < j`.
fn for_each_pair(bodies: &mut [Body], mut f: impl FnMut(&mut Body, &mut Body)) {
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        for other in tail.iter_mut() {
            f(&mut head[i], other);
        }
    }
}

fn sum_pairs(bodies: &[Body], f: impl Fn(&Body, &Body) -> f64) -> f64 {
    let mut total = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            total += f(a, b);
        }
    }
    total
}

/// Unit direction from `a` to `b` and the squared distance, floored at
/// `(softening * (rA + rB))²`.
#[inline]
fn separation(a: &Body, b: &Body, softening: f64) -> (Vector2D, f64) {
    let delta = b.pos - a.pos;
    let soft = softening * (a.radius + b.radius);
    let r_sq = delta.mag_sq().max(soft * soft);
    (delta.normalized_or_zero(), r_sq)
}

#[inline]
fn softened_distance(a: &Body, b: &Body, softening: f64) -> f64 {
    let soft = softening * (a.radius + b.radius);
    a.pos.distance_sq_to(b.pos).max(soft * soft).sqrt()
}

fn gravity(g: f64, bodies: &mut [Body]) {
    for_each_pair(bodies, |a, b| {
        let (dir, r_sq) = separation(a, b, ForceLaw::GRAVITY_SOFTENING);
        if r_sq == 0.0 {
            return;
        }
        let force = dir * (g * a.mass * b.mass / r_sq);
        a.apply_force(force);
        b.apply_force(-force);
    });
}

fn coulomb(k: f64, bodies: &mut [Body]) {
    for_each_pair(bodies, |a, b| {
        let (dir, r_sq) = separation(a, b, ForceLaw::COULOMB_SOFTENING);
        if r_sq == 0.0 {
            return;
        }
        let magnitude = k * a.charge.abs() * b.charge.abs() / r_sq;
        // Like charges push `a` away from `b`.
        let sign = if a.charge * b.charge > 0.0 { -1.0 } else { 1.0 };
        let force = dir * (magnitude * sign);
        a.apply_force(force);
        b.apply_force(-force);
    });
}

fn damping(factor: f64, bodies: &mut [Body]) {
    for body in bodies.iter_mut().filter(|b| !b.fixed) {
        body.vel *= factor;
    }
}

fn boundary(bounds: &BoundaryContainment, bodies: &mut [Body]) {
    for body in bodies.iter_mut().filter(|b| !b.fixed) {
        let f = bounds.force_at(body.pos);
        body.apply_force(f);
    }
}
