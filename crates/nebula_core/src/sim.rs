//! Per-frame particle field update
//!
//! [`SimulationState`] owns the four populations, the animation clock, and
//! the injected noise source. One call to [`SimulationState::tick`] runs a
//! whole frame: advance the clock, recompute the rigid group transforms,
//! then apply each population's update rule.
//!
//! The rules differ in a way that matters:
//!
//! - **Outer** displacement is absolute: every frame starts from the rest
//!   position, so noise drift and pointer pushes never accumulate.
//! - **Stars** and **energy** update from the previous frame's position,
//!   so their motion is cumulative.

use nebula_math::Vec3;
use rand::Rng;

use crate::field::{self, CoreParams, EnergyParams, OuterParams, StarParams};
use crate::noise::NoiseSource;
use crate::pointer::Pointer;
use crate::population::{DirtyFlags, Population};

// Group spin rates, radians per tick.
const OUTER_SPIN_Y: f32 = 0.005;
const CORE_SPIN_Y: f32 = -0.01;
const CORE_SPIN_X: f32 = 0.008;
const STAR_SPIN_Y: f32 = 1.0e-4;
const STAR_SPIN_X: f32 = 5.0e-5;

// Star z-drift: sin(clock * FREQ + index) * AMPLITUDE per tick.
const STAR_DRIFT_FREQ: f32 = 0.1;
const STAR_DRIFT_AMPLITUDE: f32 = 0.001;

/// Frame-update parameters shared across the populations
#[derive(Clone, Debug, PartialEq)]
pub struct SimParams {
    /// Clock increment per tick
    pub time_step: f32,
    /// How fast the noise field scrolls through time
    pub noise_speed: f32,
    /// Amplitude of the noise displacement
    pub noise_scale: f32,
    /// Hover phase increment per tick
    pub hover_speed: f32,
    /// Peak vertical hover offset
    pub hover_range: f32,
    /// Pointer influence radius in pointer (NDC-like) space
    pub repulsion_radius: f32,
    /// Peak pointer push strength
    pub repulsion_strength: f32,
    /// Base swirl rate of the energy field; the effective rate is this
    /// divided by the particle's distance from the origin
    pub swirl_rate: f32,
    pub outer: OuterParams,
    pub core: CoreParams,
    pub stars: StarParams,
    pub energy: EnergyParams,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            time_step: 0.005,
            noise_speed: 0.1,
            noise_scale: 0.2,
            hover_speed: 0.01,
            hover_range: 0.5,
            repulsion_radius: 1.0,
            repulsion_strength: 0.5,
            swirl_rate: 0.2,
            outer: OuterParams::default(),
            core: CoreParams::default(),
            stars: StarParams::default(),
            energy: EnergyParams::default(),
        }
    }
}

/// All simulation state: four populations, clock, and parameters
///
/// No ambient globals; the host constructs one of these and drives it with
/// `tick` once per display refresh.
pub struct SimulationState {
    pub outer: Population,
    pub core: Population,
    pub stars: Population,
    pub energy: Population,
    /// Monotonic animation clock, advanced by `time_step` each tick
    pub clock: f32,
    hover_phase: f32,
    noise: Box<dyn NoiseSource>,
    params: SimParams,
}

impl SimulationState {
    /// Generate all four populations and assemble the state
    pub fn generate<R: Rng + ?Sized>(
        params: SimParams,
        noise: Box<dyn NoiseSource>,
        rng: &mut R,
    ) -> Self {
        let outer = field::generate_outer(&params.outer, rng);
        let core = field::generate_core(&params.core, rng);
        let stars = field::generate_stars(&params.stars, rng);
        let energy = field::generate_energy(&params.energy, rng);

        log::info!(
            "generated particle fields: outer={} core={} stars={} energy={}",
            outer.len(),
            core.len(),
            stars.len(),
            energy.len()
        );

        Self::from_populations(params, noise, outer, core, stars, energy)
    }

    /// Assemble a state from pre-built populations
    pub fn from_populations(
        params: SimParams,
        noise: Box<dyn NoiseSource>,
        outer: Population,
        core: Population,
        stars: Population,
        energy: Population,
    ) -> Self {
        Self {
            outer,
            core,
            stars,
            energy,
            clock: 0.0,
            hover_phase: 0.0,
            noise,
            params,
        }
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Run one frame
    ///
    /// `pointer` is a snapshot taken at tick start; `camera_distance` is
    /// the render bridge's viewpoint-to-origin distance, used to project
    /// particles into pointer space for the repulsion rule.
    pub fn tick(&mut self, pointer: Pointer, camera_distance: f32) {
        self.clock += self.params.time_step;

        // Hover applies to the central model only (outer shell + core).
        self.hover_phase += self.params.hover_speed;
        let hover_y = self.hover_phase.sin() * self.params.hover_range;
        self.outer.transform.y_offset = hover_y;
        self.core.transform.y_offset = hover_y;

        self.outer.transform.rotation_y += OUTER_SPIN_Y;
        self.core.transform.rotation_y += CORE_SPIN_Y;
        self.core.transform.rotation_x += CORE_SPIN_X;
        self.stars.transform.rotation_y += STAR_SPIN_Y;
        self.stars.transform.rotation_x += STAR_SPIN_X;

        self.outer.mark_dirty(DirtyFlags::TRANSFORM);
        self.core.mark_dirty(DirtyFlags::TRANSFORM);
        self.stars.mark_dirty(DirtyFlags::TRANSFORM);

        update_outer(
            &mut self.outer,
            self.noise.as_ref(),
            &self.params,
            self.clock,
            pointer,
            camera_distance,
        );
        update_stars(&mut self.stars, self.clock);
        update_energy(&mut self.energy, self.params.swirl_rate);
    }
}

/// Outer rule: noise displacement from rest, then pointer repulsion
///
/// Displacement is absolute. The repulsion projection uses the
/// previous-frame position so the push reacts to where the particle was
/// actually drawn.
fn update_outer(
    pop: &mut Population,
    noise: &dyn NoiseSource,
    params: &SimParams,
    clock: f32,
    pointer: Pointer,
    camera_distance: f32,
) {
    let radius_sq = params.repulsion_radius * params.repulsion_radius;
    let t = clock * params.noise_speed;

    for i in 0..pop.len() {
        let rest = pop.rest()[i];
        // Three offset samples of the same scalar field give three
        // independent displacement axes.
        let nx = noise.sample(rest.x * 0.5, rest.y * 0.5, rest.z * 0.5 + t);
        let ny = noise.sample(rest.x * 0.5 + 100.0, rest.y * 0.5 + 100.0, rest.z * 0.5 + t);
        let nz = noise.sample(rest.x * 0.5 - 100.0, rest.y * 0.5 - 100.0, rest.z * 0.5 + t);
        let mut target = rest + Vec3::new(nx, ny, nz) * params.noise_scale;

        let prev = pop.positions()[i];
        let dx = prev.x / camera_distance - pointer.x;
        let dy = prev.y / camera_distance - pointer.y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq < radius_sq {
            let dist = dist_sq.sqrt();
            // dist == 0 would leave the push direction undefined; that
            // particle gets noise only this frame.
            if dist > 0.0 {
                let force = (params.repulsion_radius - dist) / params.repulsion_radius
                    * params.repulsion_strength;
                target.x += dx / dist * force * camera_distance * 0.5;
                target.y += dy / dist * force * camera_distance * 0.5;
            }
        }

        pop.positions_mut()[i] = target;
    }

    pop.mark_dirty(DirtyFlags::POSITIONS);
}

/// Star rule: slow cumulative z-drift, phase-shifted per particle
fn update_stars(pop: &mut Population, clock: f32) {
    for i in 0..pop.len() {
        let phase = clock * STAR_DRIFT_FREQ + i as f32;
        pop.positions_mut()[i].z += phase.sin() * STAR_DRIFT_AMPLITUDE;
    }
    pop.mark_dirty(DirtyFlags::POSITIONS);
}

/// Energy rule: incremental swirl, faster close to the origin
///
/// The three pairwise angles are not a consistent spherical
/// parametrization, so the rebuilt point does not exactly keep its
/// distance from the origin. That slow radial churn is part of the look;
/// do not replace this with a single-axis rotation.
fn update_energy(pop: &mut Population, swirl_rate: f32) {
    for pos in pop.positions_mut() {
        let distance = pos.length();
        // At (or denormally close to) the origin the swirl rate blows up;
        // leave the particle where it is for this frame.
        if distance < f32::MIN_POSITIVE {
            continue;
        }
        let swirl = swirl_rate / distance;
        let angle_xy = pos.y.atan2(pos.x) + swirl;
        let angle_xz = pos.z.atan2(pos.x) + swirl;
        let angle_yz = pos.z.atan2(pos.y) + swirl;

        pos.x = distance * angle_xy.cos() * angle_xz.cos();
        pos.y = distance * angle_xy.sin() * angle_yz.cos();
        pos.z = distance * angle_xz.sin() * angle_yz.sin();
    }
    pop.mark_dirty(DirtyFlags::POSITIONS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_math::Rgb;

    /// Noise source that contributes nothing
    struct ZeroNoise;

    impl NoiseSource for ZeroNoise {
        fn sample(&self, _x: f32, _y: f32, _z: f32) -> f32 {
            0.0
        }
    }

    fn single_particle(pos: Vec3) -> Population {
        Population::from_rest(vec![pos], vec![Rgb::WHITE])
    }

    fn tiny_state() -> SimulationState {
        SimulationState::from_populations(
            SimParams::default(),
            Box::new(ZeroNoise),
            single_particle(Vec3::new(1.0, 0.0, 0.0)),
            single_particle(Vec3::new(0.1, 0.1, 0.1)),
            single_particle(Vec3::new(5.0, 5.0, 5.0)),
            single_particle(Vec3::new(1.2, 0.0, 0.0)),
        )
    }

    /// Pointer far enough away that no particle is inside the repulsion
    /// radius
    fn far_pointer() -> Pointer {
        Pointer::new(50.0, 50.0)
    }

    #[test]
    fn test_clock_advances_by_fixed_step() {
        let mut state = tiny_state();
        state.tick(far_pointer(), 5.0);
        state.tick(far_pointer(), 5.0);
        assert!((state.clock - 0.01).abs() < 1e-7);
    }

    #[test]
    fn test_hover_applies_to_outer_and_core_only() {
        let mut state = tiny_state();
        state.tick(far_pointer(), 5.0);
        let expected = 0.01f32.sin() * 0.5;
        assert!((state.outer.transform.y_offset - expected).abs() < 1e-7);
        assert!((state.core.transform.y_offset - expected).abs() < 1e-7);
        assert_eq!(state.stars.transform.y_offset, 0.0);
        assert_eq!(state.energy.transform.y_offset, 0.0);
    }

    #[test]
    fn test_spin_rates_accumulate() {
        let mut state = tiny_state();
        state.tick(far_pointer(), 5.0);
        state.tick(far_pointer(), 5.0);
        assert!((state.outer.transform.rotation_y - 0.01).abs() < 1e-7);
        assert!((state.core.transform.rotation_y + 0.02).abs() < 1e-7);
        assert!((state.core.transform.rotation_x - 0.016).abs() < 1e-7);
        assert!((state.stars.transform.rotation_y - 2.0e-4).abs() < 1e-9);
        assert_eq!(state.energy.transform.rotation_y, 0.0);
    }

    #[test]
    fn test_outer_idempotent_under_zero_displacement() {
        let mut state = tiny_state();
        for _ in 0..5 {
            state.tick(far_pointer(), 5.0);
        }
        // Zero noise, pointer out of range: exactly the rest position.
        assert_eq!(state.outer.positions()[0], state.outer.rest()[0]);
    }

    #[test]
    fn test_core_positions_never_touched() {
        let mut state = tiny_state();
        // Acknowledge the initial full upload first; what matters is what
        // the tick itself dirties.
        state.core.clear_dirty(DirtyFlags::ALL);
        state.tick(far_pointer(), 5.0);
        assert_eq!(state.core.positions(), state.core.rest());
        // Only the transform is dirty for the core.
        assert!(!state.core.dirty().contains(DirtyFlags::POSITIONS));
        assert!(state.core.dirty().contains(DirtyFlags::TRANSFORM));
    }

    #[test]
    fn test_stars_drift_only_in_z() {
        let mut state = tiny_state();
        // Keep z small: the per-tick drift (~5e-7) would be swamped by
        // f32 quantization at z = 5.
        state.stars = single_particle(Vec3::new(5.0, 5.0, 0.05));
        let before = state.stars.positions()[0];
        state.tick(far_pointer(), 5.0);
        let after = state.stars.positions()[0];
        assert_eq!(after.x, before.x);
        assert_eq!(after.y, before.y);
        let expected_dz = (0.005f32 * STAR_DRIFT_FREQ).sin() * STAR_DRIFT_AMPLITUDE;
        assert!((after.z - before.z - expected_dz).abs() < 1e-7);
    }

    #[test]
    fn test_repulsion_pushes_outward() {
        // Particle at screen x = 0.5 with the pointer at the origin:
        // d = 0.5, force = (1 - 0.5) / 1 * 0.5 = 0.25,
        // push = 0.25 * camera_distance * 0.5 = 0.625.
        let mut state = tiny_state();
        state.outer = single_particle(Vec3::new(2.5, 0.0, 0.0));
        state.tick(Pointer::new(0.0, 0.0), 5.0);
        let p = state.outer.positions()[0];
        assert!((p.x - 3.125).abs() < 1e-4, "x = {}", p.x);
        assert!(p.y.abs() < 1e-6);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_repulsion_skipped_at_zero_planar_distance() {
        // Particle projects exactly onto the pointer: only noise (zero
        // here) applies that frame.
        let mut state = tiny_state();
        state.outer = single_particle(Vec3::new(0.0, 0.0, 1.0));
        state.tick(Pointer::new(0.0, 0.0), 5.0);
        assert_eq!(state.outer.positions()[0], Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_energy_swirl_skips_origin() {
        let mut state = tiny_state();
        state.energy = single_particle(Vec3::ZERO);
        for _ in 0..10 {
            state.tick(far_pointer(), 5.0);
        }
        let p = state.energy.positions()[0];
        assert!(p.is_finite());
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn test_energy_swirl_moves_particles() {
        let mut state = tiny_state();
        let before = state.energy.positions()[0];
        state.tick(far_pointer(), 5.0);
        let after = state.energy.positions()[0];
        assert!(after.is_finite());
        assert!(after != before);
    }
}
