//! Field generation: initial rest positions and colors
//!
//! Each population is produced once at startup from a closed-form spherical
//! distribution. All random draws go through the injected RNG so tests can
//! pin a seed and get identical fields.

use std::f32::consts::{PI, TAU};

use nebula_math::{Rgb, Vec3};
use rand::Rng;

use crate::population::Population;

/// Outer shell parameters
#[derive(Clone, Debug, PartialEq)]
pub struct OuterParams {
    /// Number of particles
    pub count: usize,
    /// Shell radius
    pub radius: f32,
    /// Per-axis uniform jitter amplitude around the spiral point
    pub jitter: f32,
}

impl Default for OuterParams {
    fn default() -> Self {
        Self {
            count: 7000,
            radius: 1.5,
            jitter: 0.25,
        }
    }
}

/// Inner core parameters
#[derive(Clone, Debug, PartialEq)]
pub struct CoreParams {
    pub count: usize,
    /// Radius of the solid sphere the core fills
    pub radius: f32,
}

impl Default for CoreParams {
    fn default() -> Self {
        Self {
            count: 1000,
            radius: 0.5,
        }
    }
}

/// Background starfield parameters
#[derive(Clone, Debug, PartialEq)]
pub struct StarParams {
    pub count: usize,
    /// Half-width of the cube stars are scattered in
    pub half_width: f32,
    /// Fraction of stars given the pale-blue tint
    pub tint_fraction: f32,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            count: 10_000,
            half_width: 50.0,
            tint_fraction: 0.2,
        }
    }
}

/// Energy field parameters
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyParams {
    pub count: usize,
    /// Inner radius of the shell
    pub inner_radius: f32,
    /// Radial depth of the shell beyond the inner radius
    pub shell_depth: f32,
    /// Base hue of the color band, in [0, 1]
    pub hue_base: f32,
    /// Width of the hue band
    pub hue_span: f32,
    /// HSL lightness of every particle
    pub lightness: f32,
}

impl Default for EnergyParams {
    fn default() -> Self {
        Self {
            count: 5000,
            inner_radius: 1.0,
            shell_depth: 0.6,
            hue_base: 0.5,
            hue_span: 0.3,
            lightness: 0.6,
        }
    }
}

/// Hue at the center of the outer shell
const OUTER_INNER_COLOR: u32 = 0xffaa00;
/// First rim hue (cyan side of the blend)
const OUTER_RIM_COLOR_A: u32 = 0x00ffff;
/// Second rim hue (magenta side of the blend)
const OUTER_RIM_COLOR_B: u32 = 0xff00ff;
/// Core is a single bright hue
const CORE_COLOR: u32 = 0xffff00;

/// Generate the outer shell
///
/// Particles sit on a deterministic spherical spiral: for index i,
/// `phi = acos(-1 + 2i/N)` and `theta = sqrt(N*pi) * phi`, so successive
/// points wind evenly from pole to pole. Each point then gets independent
/// uniform jitter per axis for irregularity. Colors blend a warm center
/// hue toward an angle-dependent rim hue with distance from the origin.
pub fn generate_outer<R: Rng + ?Sized>(params: &OuterParams, rng: &mut R) -> Population {
    let inner = Rgb::from_hex(OUTER_INNER_COLOR);
    let rim_a = Rgb::from_hex(OUTER_RIM_COLOR_A);
    let rim_b = Rgb::from_hex(OUTER_RIM_COLOR_B);

    let mut rest = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for i in 0..params.count {
        let phi = (-1.0 + 2.0 * i as f32 / params.count as f32).acos();
        let theta = (params.count as f32 * PI).sqrt() * phi;
        let point = Vec3::from_spherical(params.radius, phi, theta);

        let mut jittered = point;
        if params.jitter > 0.0 {
            jittered.x += rng.gen_range(-params.jitter..=params.jitter);
            jittered.y += rng.gen_range(-params.jitter..=params.jitter);
            jittered.z += rng.gen_range(-params.jitter..=params.jitter);
        }
        rest.push(jittered);

        // Color from the jitter-free point: warm center fading to a rim hue
        // that sweeps cyan -> magenta -> cyan around the azimuth.
        let mix = (point.length() / (params.radius * 0.8)).min(1.0);
        let angle_ratio = theta.rem_euclid(TAU) / TAU;
        let rim = if angle_ratio < 0.5 {
            rim_a.lerp(rim_b, angle_ratio * 2.0)
        } else {
            rim_b.lerp(rim_a, (angle_ratio - 0.5) * 2.0)
        };
        colors.push(inner.lerp(rim, mix));
    }

    Population::from_rest(rest, colors)
}

/// Generate the inner core: uniform density over a solid sphere
///
/// The cube-root radius draw is what makes the density uniform in volume
/// rather than clumped at the center.
pub fn generate_core<R: Rng + ?Sized>(params: &CoreParams, rng: &mut R) -> Population {
    let color = Rgb::from_hex(CORE_COLOR);

    let mut rest = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        let theta = TAU * rng.gen::<f32>();
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        let r = params.radius * rng.gen::<f32>().cbrt();
        rest.push(Vec3::from_spherical(r, phi, theta));
    }

    let colors = vec![color; params.count];
    Population::from_rest(rest, colors)
}

/// Generate the background starfield: uniform in a cube, mostly white with
/// an occasional pale-blue star
pub fn generate_stars<R: Rng + ?Sized>(params: &StarParams, rng: &mut R) -> Population {
    let tint = Rgb::new(0.8, 0.9, 1.0);

    let mut rest = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        rest.push(Vec3::new(
            (rng.gen::<f32>() - 0.5) * params.half_width * 2.0,
            (rng.gen::<f32>() - 0.5) * params.half_width * 2.0,
            (rng.gen::<f32>() - 0.5) * params.half_width * 2.0,
        ));
        colors.push(if rng.gen::<f32>() < params.tint_fraction {
            tint
        } else {
            Rgb::WHITE
        });
    }

    Population::from_rest(rest, colors)
}

/// Generate the energy field: a thin spherical shell with hues drawn from
/// a fixed band at full saturation
pub fn generate_energy<R: Rng + ?Sized>(params: &EnergyParams, rng: &mut R) -> Population {
    let mut rest = Vec::with_capacity(params.count);
    let mut colors = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let theta = rng.gen::<f32>() * TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        let radius = params.inner_radius + params.shell_depth * rng.gen::<f32>();
        rest.push(Vec3::from_spherical(radius, phi, theta));

        let hue = params.hue_base + params.hue_span * rng.gen::<f32>();
        colors.push(Rgb::from_hsl(hue, 1.0, params.lightness));
    }

    Population::from_rest(rest, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_outer_count_and_jitter_bound() {
        let params = OuterParams {
            count: 500,
            ..OuterParams::default()
        };
        let pop = generate_outer(&params, &mut rng());
        assert_eq!(pop.len(), 500);

        for (i, p) in pop.rest().iter().enumerate() {
            let phi = (-1.0 + 2.0 * i as f32 / 500.0).acos();
            let theta = (500.0 * PI).sqrt() * phi;
            let spiral = Vec3::from_spherical(params.radius, phi, theta);
            assert!((p.x - spiral.x).abs() <= params.jitter + 1e-6);
            assert!((p.y - spiral.y).abs() <= params.jitter + 1e-6);
            assert!((p.z - spiral.z).abs() <= params.jitter + 1e-6);
        }
    }

    #[test]
    fn test_outer_colors_in_unit_range() {
        let params = OuterParams {
            count: 300,
            ..OuterParams::default()
        };
        let pop = generate_outer(&params, &mut rng());
        for c in pop.colors() {
            for ch in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&ch));
            }
        }
    }

    #[test]
    fn test_core_stays_inside_radius() {
        let params = CoreParams::default();
        let pop = generate_core(&params, &mut rng());
        assert_eq!(pop.len(), params.count);
        for p in pop.rest() {
            assert!(p.length() <= params.radius + 1e-5);
        }
    }

    #[test]
    fn test_star_tint_fraction() {
        let params = StarParams::default();
        let pop = generate_stars(&params, &mut rng());
        let tinted = pop
            .colors()
            .iter()
            .filter(|c| **c != Rgb::WHITE)
            .count();
        let fraction = tinted as f32 / params.count as f32;
        // 5 sigma of a Bernoulli(0.2) sample of 10k draws is well under 0.02
        assert!((fraction - params.tint_fraction).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_stars_inside_cube() {
        let params = StarParams {
            count: 2000,
            ..StarParams::default()
        };
        let pop = generate_stars(&params, &mut rng());
        for p in pop.rest() {
            assert!(p.x.abs() <= params.half_width);
            assert!(p.y.abs() <= params.half_width);
            assert!(p.z.abs() <= params.half_width);
        }
    }

    #[test]
    fn test_energy_shell_radius_band() {
        let params = EnergyParams::default();
        let pop = generate_energy(&params, &mut rng());
        for p in pop.rest() {
            let r = p.length();
            assert!(r >= params.inner_radius - 1e-5);
            assert!(r <= params.inner_radius + params.shell_depth + 1e-5);
        }
    }

    #[test]
    fn test_generation_is_seed_deterministic() {
        let params = EnergyParams {
            count: 64,
            ..EnergyParams::default()
        };
        let a = generate_energy(&params, &mut StdRng::seed_from_u64(7));
        let b = generate_energy(&params, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.rest(), b.rest());
        assert_eq!(a.colors(), b.colors());
    }
}
