use crate::{
    body::{Body, BodyId},
    forces::ForceLaw,
    params::Parameters,
    vector::Vector2DExt,
};

use serde::Serialize;

/// Energy bookkeeping derived from the current body state.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EnergyStats {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergyStats {
    /// Kinetic energy of every body plus the potential of every pairwise law in `laws`.
    pub fn measure(bodies: &[Body], laws: &[ForceLaw], params: &Parameters) -> Self {
        let kinetic = kinetic_energy(bodies);
        let potential = laws
            .iter()
            .map(|law| law.potential_energy(params, bodies))
            .sum::<f64>();

        Self {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.kinetic.is_finite() && self.potential.is_finite()
    }

    /// `|total - reference| / |reference|`, or the absolute drift when the reference is zero.
    pub fn relative_drift(&self, reference: &EnergyStats) -> f64 {
        let drift = (self.total - reference.total).abs();
        if reference.total == 0.0 {
            drift
        } else {
            drift / reference.total.abs()
        }
    }
}

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Distance between two bodies, identified by id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairDistance {
    pub a: BodyId,
    pub b: BodyId,
    pub distance: f64,
}

/// Distances between every pair among the first `limit` bodies.
pub fn pair_distances(bodies: &[Body], limit: usize) -> Vec<PairDistance> {
    let head = &bodies[..bodies.len().min(limit)];
    let mut out = Vec::with_capacity(head.len() * head.len().saturating_sub(1) / 2);
    for (i, a) in head.iter().enumerate() {
        for b in &head[i + 1..] {
            out.push(PairDistance {
                a: a.id(),
                b: b.id(),
                distance: a.pos.distance_to(b.pos),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{body::BodyDesc, vector::Vector2D};

    #[test]
    fn empty_system_has_no_energy() {
        let stats = EnergyStats::measure(&[], &[ForceLaw::Gravity], &Parameters::default());
        assert_eq!(stats, EnergyStats::default());
    }

    #[test]
    fn energy_sums_kinetic_and_potential() {
        let bodies = vec![
            Body::new(BodyDesc::new(2.0).radius(0.0).moving(Vector2D::new(1.0, 0.0))),
            Body::new(BodyDesc::new(2.0).radius(0.0).at(Vector2D::new(4.0, 0.0))),
        ];
        let params = Parameters { g: 1.0, ..Parameters::default() };
        let stats = EnergyStats::measure(&bodies, &[ForceLaw::Gravity, ForceLaw::Damping], &params);
        assert_eq!(stats.kinetic, 1.0);
        assert_eq!(stats.potential, -1.0);
        assert_eq!(stats.total, 0.0);
        assert!(stats.is_finite());
    }

    #[test]
    fn pair_distances_are_limited() {
        let bodies: Vec<Body> = (0..6)
            .map(|i| Body::new(BodyDesc::new(1.0).at(Vector2D::new(i as f64, 0.0))))
            .collect();
        let pairs = pair_distances(&bodies, 4);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0].a, bodies[0].id());
        assert_eq!(pairs[0].b, bodies[1].id());
        assert_eq!(pairs[0].distance, 1.0);
        assert!(pair_distances(&bodies[..1], 4).is_empty());
    }
}
