//! The walk-path set: the frames locked for the duration of one
//! translation, so the frame allocator never recycles a frame that is
//! still on the path from the root to the current level.
//!
//! Bounded by `tables_depth`, same shape as the kernel's fixed-capacity
//! IPC queue — a small backing array with linear-scan membership, no
//! heap growth once built. Depth is a runtime geometry value here rather
//! than a `const`, so the capacity is reserved rather than literally
//! fixed-size, but the access pattern (push, no removal, tiny N) is the
//! same one that makes a linear scan the right tool instead of a hash set.

pub struct WalkPath {
    frames: Vec<u64>,
}

impl WalkPath {
    pub fn with_capacity(depth: usize) -> Self {
        Self { frames: Vec::with_capacity(depth) }
    }

    /// Set-semantics insert: a frame already present is not duplicated.
    pub fn insert(&mut self, frame: u64) {
        if !self.contains(frame) {
            self.frames.push(frame);
        }
    }

    pub fn contains(&self, frame: u64) -> bool {
        self.frames.contains(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut path = WalkPath::with_capacity(4);
        path.insert(3);
        path.insert(3);
        path.insert(3);
        assert_eq!(path.frames.len(), 1);
        assert!(path.contains(3));
    }

    #[test]
    fn distinguishes_present_and_absent() {
        let mut path = WalkPath::with_capacity(4);
        path.insert(0);
        path.insert(5);
        assert!(path.contains(0));
        assert!(path.contains(5));
        assert!(!path.contains(1));
    }
}
