//! Particle population buffers
//!
//! A population is a fixed-size collection of particles with immutable
//! rest positions and colors, plus a current-position buffer mutated every
//! frame. Rigid group motion (hover, spin) lives in [`GroupTransform`] and
//! is composed at render time; it is never baked into the position buffer.

use bitflags::bitflags;
use nebula_math::{Rgb, Vec3};

bitflags! {
    /// Which parts of a population changed since the render bridge last
    /// consumed it
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Current-position buffer was rewritten
        const POSITIONS = 1 << 0;
        /// Group transform (hover offset, spin angles) changed
        const TRANSFORM = 1 << 1;
        /// Everything needs uploading
        const ALL = Self::POSITIONS.bits() | Self::TRANSFORM.bits();
    }
}

/// Rigid group-level transform for a whole population
///
/// Applied at render time as translate(0, y_offset, 0) * rotate_x * rotate_y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupTransform {
    /// Vertical hover offset
    pub y_offset: f32,
    /// Accumulated rotation around the X axis
    pub rotation_x: f32,
    /// Accumulated rotation around the Y axis
    pub rotation_y: f32,
}

/// A fixed-size particle population
///
/// Rest positions and colors are immutable after generation. Current
/// positions start equal to the rest positions and are rewritten by the
/// frame updater.
pub struct Population {
    rest: Vec<Vec3>,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    /// Rigid group motion, composed at render time
    pub transform: GroupTransform,
    dirty: DirtyFlags,
}

impl Population {
    /// Create a population from generated rest positions and colors
    ///
    /// Current positions are initialized to the rest positions. The
    /// population starts fully dirty so the first frame uploads everything.
    pub fn from_rest(rest: Vec<Vec3>, colors: Vec<Rgb>) -> Self {
        debug_assert_eq!(rest.len(), colors.len());
        let positions = rest.clone();
        Self {
            rest,
            positions,
            colors,
            transform: GroupTransform::default(),
            dirty: DirtyFlags::ALL,
        }
    }

    /// Number of particles
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if the population holds no particles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Undisplaced reference positions (immutable after generation)
    pub fn rest(&self) -> &[Vec3] {
        &self.rest
    }

    /// Current positions as of the last tick
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Per-particle colors (immutable after generation)
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Flags describing what changed since [`clear_dirty`](Self::clear_dirty)
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Acknowledge consumed changes; called by the render bridge after
    /// uploading
    pub fn clear_dirty(&mut self, flags: DirtyFlags) {
        self.dirty &= !flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_particles() -> Population {
        Population::from_rest(
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 0.5)],
            vec![Rgb::WHITE, Rgb::new(0.8, 0.9, 1.0)],
        )
    }

    #[test]
    fn test_positions_start_at_rest() {
        let pop = two_particles();
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.positions(), pop.rest());
    }

    #[test]
    fn test_starts_fully_dirty() {
        let pop = two_particles();
        assert_eq!(pop.dirty(), DirtyFlags::ALL);
    }

    #[test]
    fn test_clear_dirty_is_selective() {
        let mut pop = two_particles();
        pop.clear_dirty(DirtyFlags::POSITIONS);
        assert_eq!(pop.dirty(), DirtyFlags::TRANSFORM);
        pop.clear_dirty(DirtyFlags::TRANSFORM);
        assert_eq!(pop.dirty(), DirtyFlags::NONE);
    }

    #[test]
    fn test_mark_dirty_accumulates() {
        let mut pop = two_particles();
        pop.clear_dirty(DirtyFlags::ALL);
        pop.mark_dirty(DirtyFlags::POSITIONS);
        assert!(pop.dirty().contains(DirtyFlags::POSITIONS));
        assert!(!pop.dirty().contains(DirtyFlags::TRANSFORM));
    }
}
