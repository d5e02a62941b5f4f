//! JSON start-up configuration for a sandbox.
//!
//! Every field is optional. A missing `preset` loads the experiment's own
//! preset; `"none"` loads only the listed `bodies`.
//!
//! ```json
//! {
//!   "experiment": "electrostatics",
//!   "preset": "dipole",
//!   "width": 900.0,
//!   "height": 600.0,
//!   "seed": 7,
//!   "parameters": { "k": 8.99, "damping": 0.985 },
//!   "bodies": [ { "mass": 4.0, "pos": { "x": 10.0, "y": 20.0 }, "charge": -2.0 } ]
//! }
//! ```

use crate::{
    body::BodyDesc,
    engine::SimulationEngine,
    params::Parameters,
    scenario::{self, Experiment, Preset},
    vector::Vector2D,
};

use serde::{Deserialize, Serialize};

/// Which preset a config asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetChoice {
    /// Whatever [`Experiment::default_preset`] names.
    #[default]
    Default,
    /// No preset at all.
    #[serde(rename = "none")]
    Empty,
    #[serde(untagged)]
    Named(Preset),
}

impl PresetChoice {
    pub fn resolve(self, experiment: Experiment) -> Option<Preset> {
        match self {
            PresetChoice::Default => Some(experiment.default_preset()),
            PresetChoice::Empty => None,
            PresetChoice::Named(preset) => Some(preset),
        }
    }
}

impl From<Preset> for PresetChoice {
    fn from(preset: Preset) -> Self {
        PresetChoice::Named(preset)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub experiment: Experiment,
    pub preset: PresetChoice,
    pub width: f64,
    pub height: f64,
    /// Seed for preset jitter and random placement.
    pub seed: u64,
    pub parameters: Parameters,
    /// Extra bodies added after the preset.
    pub bodies: Vec<BodyDesc>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            experiment: Experiment::default(),
            preset: PresetChoice::Default,
            width: 800.0,
            height: 600.0,
            seed: 0,
            parameters: Parameters::default(),
            bodies: Vec::new(),
        }
    }
}

impl SandboxConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width, self.height) * 0.5
    }

    /// Builds an idle engine with the experiment's laws, the preset and the extra bodies.
    pub fn build_engine(&self) -> SimulationEngine {
        let mut engine = self.experiment.engine(self.parameters, self.width, self.height);
        let mut rng = fastrand::Rng::with_seed(self.seed);

        if let Some(preset) = self.preset.resolve(self.experiment) {
            scenario::load(&mut engine, preset, self.center(), &mut rng);
        }
        for desc in &self.bodies {
            engine.add_body(desc.clone());
        }

        log::debug!(
            "built {:?} engine with {} bodies",
            self.experiment,
            engine.bodies().len()
        );
        engine
    }
}
