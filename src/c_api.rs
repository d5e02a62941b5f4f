use crate::{
    body::{Body, BodyDesc, BodyId},
    engine::SimulationEngine,
    params::Parameters,
    scenario::{self, Experiment, Preset},
    stats::EnergyStats,
    vector::Vector2D,
};

/// Flat per-body state copied out to a foreign renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub mass: f64,
    pub radius: f64,
    pub charge: f64,
    pub fixed: bool,
}

impl From<&Body> for BodyState {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id().get(),
            x: body.pos.x,
            y: body.pos.y,
            vx: body.vel.x,
            vy: body.vel.y,
            mass: body.mass,
            radius: body.radius,
            charge: body.charge,
            fixed: body.fixed,
        }
    }
}

/// `experiment`: 0 = gravity, anything else = electrostatics.
#[unsafe(no_mangle)]
pub extern "C" fn Sandbox_Create(experiment: u32, width: f64, height: f64) -> *mut SimulationEngine {
    let experiment = if experiment == 0 {
        Experiment::Gravity
    } else {
        Experiment::Electrostatics
    };
    Box::into_raw(Box::new(experiment.engine(Parameters::default(), width, height)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Destroy(handle: *mut SimulationEngine) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Start(handle: *mut SimulationEngine) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.start();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Pause(handle: *mut SimulationEngine) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.pause();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Reset(handle: *mut SimulationEngine) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.reset();
    }
}

/// Host frame callback. Returns the dt applied, or a negative value when not running.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Tick(handle: *mut SimulationEngine, timestamp_ms: f64) -> f64 {
    unsafe { handle.as_mut() }
        .and_then(|engine| engine.tick(timestamp_ms))
        .unwrap_or(-1.0)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Step(handle: *mut SimulationEngine, dt: f64) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.step(dt);
    }
}

/// Adds a raw body with the default trail. Returns the new body's id, or 0 for a null handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_AddBody(
    handle: *mut SimulationEngine,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    mass: f64,
    radius: f64,
    charge: f64,
    fixed: bool,
) -> u64 {
    let Some(engine) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    let desc = BodyDesc::new(mass)
        .at(Vector2D::new(x, y))
        .moving(Vector2D::new(vx, vy))
        .radius(radius)
        .charge(charge)
        .fixed(fixed);
    engine.add_body(desc).get()
}

/// Adds a free point charge `q` at `(x, y)`: mass `max(1, 2|q|)`, no trail.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_AddCharge(handle: *mut SimulationEngine, q: f64, x: f64, y: f64) -> u64 {
    let Some(engine) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    engine.add_body(scenario::charge(q, Vector2D::new(x, y))).get()
}

/// Adds a body on a circular orbit around `(cx, cy)` using the engine's current G.
/// `angle` is in radians.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_AddOrbitingBody(
    handle: *mut SimulationEngine,
    cx: f64,
    cy: f64,
    central_mass: f64,
    mass: f64,
    orbit_radius: f64,
    angle: f64,
) -> u64 {
    let Some(engine) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    let g = engine.params().g;
    let desc = scenario::orbiting_body(Vector2D::new(cx, cy), central_mass, mass, orbit_radius, angle, g);
    engine.add_body(desc).get()
}

/// Adds a body `orbit_radius` away from `(cx, cy)` with velocity `(vx, vy)`.
/// A NaN `angle_deg` picks a random angle from `seed`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_AddCustomBody(
    handle: *mut SimulationEngine,
    cx: f64,
    cy: f64,
    mass: f64,
    orbit_radius: f64,
    angle_deg: f64,
    vx: f64,
    vy: f64,
    seed: u64,
) -> u64 {
    let Some(engine) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    let angle_deg = (!angle_deg.is_nan()).then_some(angle_deg);
    let mut rng = fastrand::Rng::with_seed(seed);
    let desc = scenario::custom_body(
        Vector2D::new(cx, cy),
        mass,
        orbit_radius,
        angle_deg,
        Vector2D::new(vx, vy),
        &mut rng,
    );
    engine.add_body(desc).get()
}

/// Resets the engine (it is left idle) and loads a preset centered on `(cx, cy)`.
/// `preset`: 0 = solar system, 1 = dipole, 2 = repulsion lattice, 3 = attraction chain.
/// Returns the number of bodies loaded; an unknown preset leaves the engine untouched.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_LoadPreset(
    handle: *mut SimulationEngine,
    preset: u32,
    cx: f64,
    cy: f64,
    seed: u64,
) -> usize {
    let Some(engine) = (unsafe { handle.as_mut() }) else {
        return 0;
    };
    let preset = match preset {
        0 => Preset::SolarSystem,
        1 => Preset::Dipole,
        2 => Preset::RepulsionLattice,
        3 => Preset::AttractionChain,
        other => {
            log::warn!("unknown preset {other}");
            return 0;
        }
    };
    let mut rng = fastrand::Rng::with_seed(seed);
    scenario::load(engine, preset, Vector2D::new(cx, cy), &mut rng).len()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_ClearTrails(handle: *mut SimulationEngine) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.clear_trails();
    }
}

/// Returns whether a body was removed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_RemoveBody(handle: *mut SimulationEngine, id: u64) -> bool {
    unsafe { handle.as_mut() }
        .and_then(|engine| engine.remove_body(BodyId::from(id)))
        .is_some()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBodyCount(handle: *const SimulationEngine) -> usize {
    unsafe { handle.as_ref() }.map_or(0, |engine| engine.bodies().len())
}

/// Copies up to `capacity` bodies into `out` and returns how many were written.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_CopyBodies(
    handle: *const SimulationEngine,
    out: *mut BodyState,
    capacity: usize,
) -> usize {
    let Some(engine) = (unsafe { handle.as_ref() }) else {
        return 0;
    };
    if out.is_null() {
        return 0;
    }

    // SAFETY: the caller guarantees `out` points to `capacity` writable elements.
    let out = unsafe { std::slice::from_raw_parts_mut(out, capacity) };
    let mut written = 0;
    for (slot, body) in out.iter_mut().zip(engine.bodies()) {
        *slot = BodyState::from(body);
        written += 1;
    }
    written
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetG(handle: *mut SimulationEngine, g: f64) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.set_gravitational_constant(g);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetK(handle: *mut SimulationEngine, k: f64) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.set_coulomb_constant(k);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetDamping(handle: *mut SimulationEngine, damping: f64) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.set_damping(damping);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Resize(handle: *mut SimulationEngine, width: f64, height: f64) {
    if let Some(engine) = unsafe { handle.as_mut() } {
        engine.set_bounds(width, height);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetFps(handle: *const SimulationEngine) -> f64 {
    unsafe { handle.as_ref() }.map_or(0.0, SimulationEngine::fps)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetEnergy(handle: *const SimulationEngine) -> EnergyStats {
    unsafe { handle.as_ref() }.map_or_else(EnergyStats::default, SimulationEngine::stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drives_an_engine_through_the_handle() {
        let handle = Sandbox_Create(1, 800.0, 600.0);
        unsafe {
            let a = Sandbox_AddBody(handle, 300.0, 300.0, 0.0, 0.0, 6.0, 10.5, 3.0, false);
            let b = Sandbox_AddBody(handle, 500.0, 300.0, 0.0, 0.0, 6.0, 10.5, 3.0, false);
            assert_ne!(a, b);
            assert_eq!(Sandbox_GetBodyCount(handle), 2);

            assert_eq!(Sandbox_Tick(handle, 0.0), -1.0);
            Sandbox_Start(handle);
            assert_eq!(Sandbox_Tick(handle, 0.0), 0.0);
            assert!(Sandbox_Tick(handle, 16.0) > 0.0);

            let mut out = [BodyState::default(); 4];
            assert_eq!(Sandbox_CopyBodies(handle, out.as_mut_ptr(), out.len()), 2);
            assert_eq!(out[0].id, a);
            assert!(out[0].x < 300.0, "like charges should push apart");
            assert!(out[1].x > 500.0);

            assert!(Sandbox_GetEnergy(handle).potential > 0.0);
            assert!(Sandbox_RemoveBody(handle, a));
            assert!(!Sandbox_RemoveBody(handle, a));

            Sandbox_Reset(handle);
            assert_eq!(Sandbox_GetBodyCount(handle), 0);
            Sandbox_Destroy(handle);
        }
    }

    #[test]
    fn null_handles_are_ignored() {
        let null = std::ptr::null_mut::<SimulationEngine>();
        unsafe {
            Sandbox_Start(null);
            Sandbox_Step(null, 0.1);
            Sandbox_SetG(null, 1.0);
            assert_eq!(Sandbox_Tick(null, 0.0), -1.0);
            assert_eq!(Sandbox_AddBody(null, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, false), 0);
            assert_eq!(Sandbox_GetBodyCount(null), 0);
            assert_eq!(Sandbox_GetFps(null), 0.0);
            assert_eq!(Sandbox_GetEnergy(null), EnergyStats::default());
            assert_eq!(Sandbox_AddCharge(null, 1.0, 0.0, 0.0), 0);
            assert_eq!(Sandbox_LoadPreset(null, 0, 0.0, 0.0, 0), 0);
            Sandbox_ClearTrails(null);
            Sandbox_Destroy(null);
        }
    }

    fn copy_all(handle: *mut SimulationEngine) -> Vec<BodyState> {
        unsafe {
            let mut out = vec![BodyState::default(); Sandbox_GetBodyCount(handle)];
            let written = Sandbox_CopyBodies(handle, out.as_mut_ptr(), out.len());
            out.truncate(written);
            out
        }
    }

    #[test]
    fn charges_follow_the_electrostatics_conventions() {
        let handle = Sandbox_Create(1, 800.0, 600.0);
        unsafe {
            let a = Sandbox_AddCharge(handle, 3.0, 300.0, 300.0);
            let b = Sandbox_AddCharge(handle, -0.25, 500.0, 300.0);
            for _ in 0..50 {
                Sandbox_Step(handle, 1.0 / 60.0);
            }

            let engine = &*handle;
            let big = engine.body(BodyId::from(a)).unwrap();
            assert_eq!(big.mass, 6.0);
            assert_eq!(big.charge, 3.0);
            assert_eq!(big.radius, 10.5);
            assert!(big.trail().is_empty());
            let small = engine.body(BodyId::from(b)).unwrap();
            assert_eq!(small.mass, 1.0);
            assert!(small.trail().is_empty());

            Sandbox_Destroy(handle);
        }
    }

    #[test]
    fn orbiting_body_uses_the_live_gravitational_constant() {
        let handle = Sandbox_Create(0, 800.0, 600.0);
        unsafe {
            Sandbox_SetG(handle, 2.0);
            let id = Sandbox_AddOrbitingBody(handle, 400.0, 300.0, 2000.0, 10.0, 100.0, 0.0);
            let state = copy_all(handle)[0];
            assert_eq!(state.id, id);
            assert!((state.x - 500.0).abs() < 1e-9);
            assert!((state.y - 300.0).abs() < 1e-9);
            assert!(state.vx.abs() < 1e-9);
            assert!((state.vy - scenario::circular_speed(2.0, 2000.0, 100.0)).abs() < 1e-9);
            Sandbox_Destroy(handle);
        }
    }

    #[test]
    fn custom_body_angle_is_optional() {
        let handle = Sandbox_Create(0, 800.0, 600.0);
        unsafe {
            Sandbox_AddCustomBody(handle, 400.0, 300.0, 25.0, 150.0, 90.0, 1.0, -1.0, 0);
            Sandbox_AddCustomBody(handle, 400.0, 300.0, 25.0, 150.0, f64::NAN, 0.0, 0.0, 7);
            Sandbox_AddCustomBody(handle, 400.0, 300.0, 25.0, 150.0, f64::NAN, 0.0, 0.0, 7);
            let bodies = copy_all(handle);

            assert!((bodies[0].x - 400.0).abs() < 1e-9);
            assert!((bodies[0].y - 450.0).abs() < 1e-9);
            assert_eq!((bodies[0].vx, bodies[0].vy), (1.0, -1.0));
            assert_eq!(bodies[0].radius, 6.0);

            for random in &bodies[1..] {
                let r = Vector2D::new(random.x - 400.0, random.y - 300.0).mag();
                assert!((r - 150.0).abs() < 1e-9);
            }
            assert_eq!((bodies[1].x, bodies[1].y), (bodies[2].x, bodies[2].y));
            Sandbox_Destroy(handle);
        }
    }

    #[test]
    fn presets_load_through_the_handle() {
        let handle = Sandbox_Create(1, 800.0, 600.0);
        unsafe {
            Sandbox_AddCharge(handle, 1.0, 0.0, 0.0);
            Sandbox_Start(handle);

            assert_eq!(Sandbox_LoadPreset(handle, 1, 400.0, 300.0, 0), 6);
            assert_eq!((*handle).state(), crate::engine::EngineState::Idle);
            let bodies = copy_all(handle);
            assert_eq!(bodies.len(), 6);
            assert_eq!(bodies.iter().filter(|b| b.fixed).count(), 2);

            assert_eq!(Sandbox_LoadPreset(handle, 2, 400.0, 300.0, 5), 9);
            assert_eq!(Sandbox_LoadPreset(handle, 3, 400.0, 300.0, 5), 6);
            assert_eq!(Sandbox_LoadPreset(handle, 99, 400.0, 300.0, 5), 0);
            assert_eq!(Sandbox_GetBodyCount(handle), 6);

            Sandbox_Destroy(handle);
        }
    }

    #[test]
    fn clear_trails_and_infinite_steps_through_the_handle() {
        let handle = Sandbox_Create(0, 800.0, 600.0);
        unsafe {
            assert_eq!(Sandbox_LoadPreset(handle, 0, 400.0, 300.0, 0), 4);
            for _ in 0..10 {
                Sandbox_Step(handle, 1.0 / 60.0);
            }
            assert!((*handle).bodies()[1].trail().len() == 10);
            Sandbox_ClearTrails(handle);
            assert!((*handle).bodies().iter().all(|b| b.trail().is_empty()));

            let before = copy_all(handle);
            Sandbox_Step(handle, f64::INFINITY);
            let after = copy_all(handle);
            assert!(after.iter().all(|b| b.x.is_finite() && b.y.is_finite()));
            assert_eq!(
                before.iter().map(|b| (b.x, b.y)).collect::<Vec<_>>(),
                after.iter().map(|b| (b.x, b.y)).collect::<Vec<_>>()
            );
            Sandbox_Destroy(handle);
        }
    }
}
