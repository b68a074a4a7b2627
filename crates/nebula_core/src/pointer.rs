//! Pointer state plumbing
//!
//! Pointer-move events arrive whenever the windowing system delivers them;
//! the simulation only ever cares about the most recent position. The
//! mailbox is a single-slot register: writes overwrite, reads copy out a
//! snapshot that stays fixed for the whole tick.

/// Pointer position in normalized device coordinates, [-1, 1] per axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Most-recent-value register for pointer positions
///
/// Last write wins; no queuing. The frame updater takes exactly one
/// [`snapshot`](Self::snapshot) per tick.
#[derive(Debug, Default)]
pub struct PointerMailbox {
    latest: Pointer,
}

impl PointerMailbox {
    /// Create a mailbox with the pointer at the center of the screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer-move event, replacing any previous value
    pub fn store(&mut self, x: f32, y: f32) {
        self.latest = Pointer::new(x, y);
    }

    /// Copy out the most recent pointer position
    pub fn snapshot(&self) -> Pointer {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_centered() {
        let mailbox = PointerMailbox::new();
        assert_eq!(mailbox.snapshot(), Pointer::new(0.0, 0.0));
    }

    #[test]
    fn test_last_write_wins() {
        let mut mailbox = PointerMailbox::new();
        mailbox.store(0.3, -0.2);
        mailbox.store(-0.9, 0.5);
        assert_eq!(mailbox.snapshot(), Pointer::new(-0.9, 0.5));
    }

    #[test]
    fn test_snapshot_does_not_consume() {
        let mut mailbox = PointerMailbox::new();
        mailbox.store(0.1, 0.2);
        assert_eq!(mailbox.snapshot(), mailbox.snapshot());
    }
}
