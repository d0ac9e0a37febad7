//! Fixed-length position history for a single spark

use glam::Vec3;

/// Ring of recent positions, indexed newest-first
///
/// The slot count is fixed when the trail is created. Pushing moves the
/// head backwards and overwrites the oldest sample, so the trail never
/// allocates after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailHistory {
    samples: Box<[Vec3]>,
    /// Slot holding the freshest sample
    head: usize,
}

impl TrailHistory {
    /// Create a trail of `len` samples, all at `position`
    ///
    /// A zero length is bumped to one; configuration validation rejects
    /// zero-length trails before they get here.
    pub fn new(len: usize, position: Vec3) -> Self {
        let mut trail = Self {
            samples: vec![Vec3::ZERO; len.max(1)].into_boxed_slice(),
            head: 0,
        };
        trail.initialize(position);
        trail
    }

    /// Collapse every slot onto `position`
    ///
    /// Used for every new spark and branch child, so a fresh trail draws
    /// as zero-length segments at its origin.
    pub fn initialize(&mut self, position: Vec3) {
        self.samples.fill(position);
        self.head = 0;
    }

    /// Evict the oldest sample and insert `position` at the front
    #[inline]
    pub fn push(&mut self, position: Vec3) {
        let len = self.samples.len();
        self.head = (self.head + len - 1) % len;
        self.samples[self.head] = position;
    }

    /// Number of samples, always the configured trail length
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample `index` steps back in time (0 is the freshest)
    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        if index < self.samples.len() {
            Some(self.samples[(self.head + index) % self.samples.len()])
        } else {
            None
        }
    }

    #[inline]
    pub fn newest(&self) -> Vec3 {
        self.samples[self.head]
    }

    #[inline]
    pub fn oldest(&self) -> Vec3 {
        let len = self.samples.len();
        self.samples[(self.head + len - 1) % len]
    }

    /// Samples from newest to oldest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        let len = self.samples.len();
        (0..len).map(move |i| self.samples[(self.head + i) % len])
    }

    /// Consecutive `(newer, older)` pairs, `len() - 1` of them
    pub fn segments(&self) -> impl ExactSizeIterator<Item = (Vec3, Vec3)> + '_ {
        let len = self.samples.len();
        (0..len - 1).map(move |j| {
            (
                self.samples[(self.head + j) % len],
                self.samples[(self.head + j + 1) % len],
            )
        })
    }
}
