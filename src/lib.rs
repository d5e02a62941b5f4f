pub mod body;
pub mod c_api;
pub mod config;
pub mod engine;
pub mod forces;
pub mod params;
pub mod scenario;
pub mod stats;
pub mod timing;
pub mod vector;

pub use body::{Body, BodyDesc, BodyId};
pub use config::{PresetChoice, SandboxConfig};
pub use engine::{EngineState, SimulationEngine};
pub use forces::{BoundaryContainment, ForceLaw};
pub use params::Parameters;
pub use scenario::{Experiment, Preset};
pub use stats::EnergyStats;
pub use vector::{Vector2D, Vector2DExt};
