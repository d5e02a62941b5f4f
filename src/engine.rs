use crate::{
    body::{Body, BodyDesc, BodyId},
    forces::ForceLaw,
    params::Parameters,
    stats::EnergyStats,
    timing::{FpsMeter, FrameClock},
    vector::Vector2D,
};

/// Called after integration with the post-tick bodies and the dt that was applied.
pub type UpdateHook = Box<dyn FnMut(&[Body], f64)>;
/// Called after the update hook with the post-tick bodies.
pub type RenderHook = Box<dyn FnMut(&[Body])>;

/// Scheduling state of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Never started, or reset.
    Idle,
    /// Advancing on every host frame.
    Running,
    /// Ignoring host frames; bodies and laws are kept.
    Paused,
}

/// Owns the bodies and force laws and advances them one host frame at a time.
pub struct SimulationEngine {
    params: Parameters,
    bodies: Vec<Body>,
    laws: Vec<ForceLaw>,
    state: EngineState,
    clock: FrameClock,
    fps: FpsMeter,
    stats: EnergyStats,
    /// Ticks advanced since the last reset.
    frame: usize,
    on_update: Option<UpdateHook>,
    on_render: Option<RenderHook>,
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("params", &self.params)
            .field("bodies", &self.bodies)
            .field("laws", &self.laws)
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("fps", &self.fps)
            .field("stats", &self.stats)
            .field("frame", &self.frame)
            .field("on_update", &self.on_update.as_ref().map(|_| "UpdateHook"))
            .field("on_render", &self.on_render.as_ref().map(|_| "RenderHook"))
            .finish()
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl SimulationEngine {
    pub fn new(params: Parameters) -> Self {
        Self {
            params: params.sanitized(),
            bodies: Vec::new(),
            laws: Vec::new(),
            state: EngineState::Idle,
            clock: FrameClock::new(),
            fps: FpsMeter::new(),
            stats: EnergyStats::default(),
            frame: 0,
            on_update: None,
            on_render: None,
        }
    }

    /// Creates an engine with `laws` registered in order.
    pub fn with_laws(params: Parameters, laws: impl IntoIterator<Item = ForceLaw>) -> Self {
        let mut engine = Self::new(params);
        engine.laws.extend(laws);
        engine
    }

    // ---------------------------------------------------------------- bodies

    /// Creates a body from `desc` and returns its id.
    pub fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        self.insert_body(Body::new(desc))
    }

    /// Takes ownership of an already built body.
    pub fn insert_body(&mut self, body: Body) -> BodyId {
        let id = body.id();
        log::debug!("adding body {id} ({} total)", self.bodies.len() + 1);
        self.bodies.push(body);
        id
    }

    /// Removes the body with `id`. Unknown ids leave the engine untouched.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id() == id)?;
        log::debug!("removing body {id}");
        Some(self.bodies.remove(index))
    }

    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
    }

    /// Drops every recorded trail sample; capacities stay as they are.
    pub fn clear_trails(&mut self) {
        self.bodies.iter_mut().for_each(Body::clear_trail);
    }

    /// Sum of `m·v` over all bodies.
    pub fn momentum(&self) -> Vector2D {
        self.bodies.iter().fold(Vector2D::zero(), |acc, b| acc + b.momentum())
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    // ------------------------------------------------------------ force laws

    /// Appends a law. Laws run in registration order every tick.
    pub fn register_force_law(&mut self, law: ForceLaw) -> &mut Self {
        self.laws.push(law);
        self
    }

    pub fn clear_force_laws(&mut self) {
        self.laws.clear();
    }

    pub fn force_laws(&self) -> &[ForceLaw] {
        &self.laws
    }

    // ------------------------------------------------------------ parameters

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn set_gravitational_constant(&mut self, g: f64) {
        self.params.g = g;
    }

    pub fn set_coulomb_constant(&mut self, k: f64) {
        self.params.k = k;
    }

    /// Sets the per-tick velocity multiplier, clamped into (0, 1].
    pub fn set_damping(&mut self, damping: f64) {
        self.params.damping = Parameters::clamp_damping(damping);
    }

    pub fn set_max_dt(&mut self, max_dt: f64) {
        self.params.max_dt = max_dt.max(0.0);
    }

    /// Resizes every boundary law to a `width` x `height` area.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        for law in &mut self.laws {
            if let ForceLaw::Boundary(bounds) = law {
                bounds.width = width;
                bounds.height = height;
            }
        }
    }

    // ----------------------------------------------------------------- hooks

    pub fn set_on_update(&mut self, hook: impl FnMut(&[Body], f64) + 'static) {
        self.on_update = Some(Box::new(hook));
    }

    pub fn set_on_render(&mut self, hook: impl FnMut(&[Body]) + 'static) {
        self.on_render = Some(Box::new(hook));
    }

    pub fn clear_hooks(&mut self) {
        self.on_update = None;
        self.on_render = None;
    }

    // ------------------------------------------------------------- lifecycle

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    /// Begins accepting host frames. The first frame afterwards advances by zero time.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        log::debug!("starting with {} bodies and {} laws", self.bodies.len(), self.laws.len());
        self.clock.reset();
        self.state = EngineState::Running;
    }

    /// Stops accepting host frames. Bodies and laws are kept.
    pub fn pause(&mut self) {
        if self.is_running() {
            log::debug!("paused at frame {}", self.frame);
            self.state = EngineState::Paused;
        }
    }

    /// Pauses, removes every body and forgets timing. Force laws and hooks are kept.
    pub fn reset(&mut self) {
        log::debug!("reset after {} frames", self.frame);
        self.state = EngineState::Idle;
        self.bodies.clear();
        self.clock.reset();
        self.fps.reset();
        self.stats = EnergyStats::default();
        self.frame = 0;
    }

    // ------------------------------------------------------------------ loop

    /// Host frame callback. `timestamp_ms` is a monotonic host clock in
    /// milliseconds. Returns the dt applied, or `None` when not running.
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<f64> {
        if !self.is_running() {
            return None;
        }

        let delta = self.clock.advance(timestamp_ms, self.params.max_dt);
        self.fps.record(delta.elapsed);
        self.step(delta.dt);
        Some(delta.dt)
    }

    /// Advances the simulation by exactly `dt` seconds, regardless of state:
    /// apply every law, integrate every body, refresh stats, notify hooks.
    /// A negative or non-finite `dt` is applied as 0.
    pub fn step(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for law in &self.laws {
            law.apply(&self.params, &mut self.bodies);
        }

        for body in &mut self.bodies {
            body.integrate(dt);
        }

        self.stats = EnergyStats::measure(&self.bodies, &self.laws, &self.params);
        if !self.stats.is_finite() {
            log::warn!("non-finite energy at frame {}: {:?}", self.frame, self.stats);
        }
        self.frame += 1;

        if let Some(hook) = self.on_update.as_mut() {
            hook(&self.bodies, dt);
        }
        if let Some(hook) = self.on_render.as_mut() {
            hook(&self.bodies);
        }
    }

    // ------------------------------------------------------------- snapshots

    /// Frames per second averaged over the last half second of host frames.
    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }

    /// Energy measured at the end of the last tick.
    pub fn stats(&self) -> EnergyStats {
        self.stats
    }

    /// Energy of the current state, measured now.
    pub fn measure_energy(&self) -> EnergyStats {
        EnergyStats::measure(&self.bodies, &self.laws, &self.params)
    }

    pub fn frame(&self) -> usize {
        self.frame
    }
}
