use serde::{Deserialize, Serialize};

/// Live-tunable simulation constants. Force laws read these on every tick,
/// so changing a field takes effect on the next tick without a reset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Gravitational constant (scaled for screen units).
    pub g: f64,
    /// Coulomb constant (scaled for screen units).
    pub k: f64,
    /// Per-tick velocity multiplier used by the damping law, in (0, 1].
    pub damping: f64,
    /// Upper bound on a single tick's dt, in seconds.
    pub max_dt: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            g: Self::DEFAULT_G,
            k: Self::DEFAULT_K,
            damping: Self::DEFAULT_DAMPING,
            max_dt: Self::DEFAULT_MAX_DT,
        }
    }
}

impl Parameters {
    pub const DEFAULT_G: f64 = 6.674;
    pub const DEFAULT_K: f64 = 8.99;
    pub const DEFAULT_DAMPING: f64 = 0.985;
    pub const DEFAULT_MAX_DT: f64 = 0.05;

    /// Damping factor forced into (0, 1]. Non-finite input keeps the default.
    pub fn clamp_damping(damping: f64) -> f64 {
        if !damping.is_finite() {
            return Self::DEFAULT_DAMPING;
        }
        damping.clamp(f64::MIN_POSITIVE, 1.0)
    }

    /// Copy with every field brought back into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.damping = Self::clamp_damping(self.damping);
        if !(self.max_dt.is_finite() && self.max_dt >= 0.0) {
            self.max_dt = Self::DEFAULT_MAX_DT;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damping_is_clamped() {
        assert_eq!(Parameters::clamp_damping(1.5), 1.0);
        assert!(Parameters::clamp_damping(0.0) > 0.0);
        assert!(Parameters::clamp_damping(-1.0) > 0.0);
        assert_eq!(Parameters::clamp_damping(0.9), 0.9);
        assert_eq!(Parameters::clamp_damping(f64::NAN), Parameters::DEFAULT_DAMPING);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p: Parameters = serde_json::from_str(r#"{ "g": 1.0 }"#).unwrap();
        assert_eq!(p.g, 1.0);
        assert_eq!(p.k, Parameters::DEFAULT_K);
        assert_eq!(p.max_dt, Parameters::DEFAULT_MAX_DT);
    }
}
