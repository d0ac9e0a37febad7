//! Live spark set and the per-frame update
//!
//! The update runs in two phases. The first walks the live set backwards,
//! integrating each spark, collecting branch children into a side list and
//! removing expired sparks in place. The second admits the collected
//! children until capacity is reached. Children therefore never integrate
//! in the frame they were born, and removal never skips an unvisited spark.

use log::{debug, trace, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::branching::{BranchingRule, ChildSpec};
use crate::config::{SparkConfig, Wobble};
use crate::error::Result;
use crate::packer::{BufferPacker, LineBuffer, PointBuffer};
use crate::presets::Preset;
use crate::rng::RandomSource;
use crate::spark::{Spark, SparkInit};

/// Summary of one [`ParticlePool::update`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameStats {
    /// Sparks alive after the update
    pub live: usize,
    /// Sparks removed because their life ran out
    pub expired: usize,
    /// Parents that branched this frame
    pub branch_events: usize,
    /// Children admitted into the live set
    pub spawned: usize,
    /// Children discarded because the pool was full
    pub dropped: usize,
    /// Valid entries in the point buffer
    pub point_count: usize,
    /// Valid vertices in the line buffer
    pub line_vertex_count: usize,
}

/// Fixed-capacity spark engine
///
/// Owns every live [`Spark`], the branching rule, the random source and the
/// output buffers. Nothing outside the pool holds on to a spark across
/// frames.
#[derive(Debug)]
pub struct ParticlePool<R: RandomSource = StdRng> {
    config: SparkConfig,
    sparks: Vec<Spark>,
    pending: Vec<ChildSpec>,
    rule: BranchingRule,
    packer: BufferPacker,
    rng: R,
    elapsed: f32,
}

impl ParticlePool<StdRng> {
    /// Create a pool seeded from the operating system
    pub fn new(config: SparkConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a pool whose runs are reproducible for a given seed
    pub fn with_seed(config: SparkConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a pool for a built-in preset
    pub fn from_preset(preset: Preset) -> Result<Self> {
        Self::new(preset.config())
    }
}

impl<R: RandomSource> ParticlePool<R> {
    /// Create a pool drawing all randomness from `rng`
    ///
    /// Fails if the configuration does not validate. All buffers are
    /// allocated here; updates do not allocate in steady state.
    pub fn with_rng(config: SparkConfig, rng: R) -> Result<Self> {
        config.validate()?;

        if config.capacity == 0 {
            warn!("Spark pool created with zero capacity; every spark will be rejected");
        }

        let packer = BufferPacker::new(&config);
        let rule = BranchingRule::new(config.branch.clone(), config.wobble.is_some());

        debug!(
            "Created spark pool: capacity={}, trail_length={}, point slots={}, line vertices={}",
            config.capacity,
            config.trail_length,
            packer.points().capacity(),
            packer.lines().vertex_capacity()
        );

        Ok(Self {
            sparks: Vec::with_capacity(config.capacity),
            pending: Vec::with_capacity(config.capacity),
            rule,
            packer,
            rng,
            elapsed: 0.0,
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &SparkConfig {
        &self.config
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Number of live sparks
    #[inline]
    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.sparks.len() >= self.config.capacity
    }

    /// Live sparks in storage order (unspecified but deterministic)
    #[inline]
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Elapsed time passed to the last update, for renderer jitter
    #[inline]
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn wobble(&self) -> Option<&Wobble> {
        self.config.wobble.as_ref()
    }

    #[inline]
    pub fn point_buffer(&self) -> &PointBuffer {
        self.packer.points()
    }

    #[inline]
    pub fn line_buffer(&self) -> &LineBuffer {
        self.packer.lines()
    }

    /// Add a spark with a collapsed trail
    ///
    /// Returns `None` and changes nothing when the pool is full. The output
    /// buffers pick the spark up on the next [`update`](Self::update).
    pub fn create_spark(&mut self, init: SparkInit) -> Option<&Spark> {
        if self.is_full() {
            trace!("Spark rejected: pool at capacity {}", self.config.capacity);
            return None;
        }

        let branch = self.rule.initial_state(init.branch_count, &mut self.rng);
        let seed = self.rule.draw_seed(&mut self.rng);
        self.sparks
            .push(Spark::new(&init, self.config.trail_length, branch, seed));
        self.sparks.last()
    }

    /// Advance the simulation by `dt` seconds and repack the buffers
    ///
    /// `elapsed` is the caller's running clock; it is only stored for
    /// renderer-side effects. A negative or non-finite `dt` is treated as 0.
    pub fn update(&mut self, dt: f32, elapsed: f32) -> FrameStats {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed = elapsed;
        self.pending.clear();

        let gravity = self.config.gravity;
        let drag = self.config.drag;
        let mut stats = FrameStats::default();

        for i in (0..self.sparks.len()).rev() {
            let spark = &mut self.sparks[i];
            spark.integrate(dt, gravity, drag);

            if self
                .rule
                .evaluate(spark, dt, &mut self.rng, &mut self.pending)
            {
                spark.branch.record_branch();
                stats.branch_events += 1;
            }

            if spark.is_expired() {
                // the element moved into `i` comes from the already-visited tail
                self.sparks.swap_remove(i);
                stats.expired += 1;
            }
        }

        let trail_length = self.config.trail_length;
        for child in self.pending.drain(..) {
            if self.sparks.len() >= self.config.capacity {
                stats.dropped += 1;
                continue;
            }
            self.sparks.push(child.into_spark(trail_length));
            stats.spawned += 1;
        }

        if stats.dropped > 0 {
            trace!(
                "Dropped {} branch children: pool at capacity {}",
                stats.dropped, self.config.capacity
            );
        }

        self.repack();

        stats.live = self.sparks.len();
        stats.point_count = self.packer.points().valid_count();
        stats.line_vertex_count = self.packer.lines().valid_vertex_count();

        trace!(
            "Spark update dt={dt:.4}: live={}, expired={}, spawned={}, dropped={}",
            stats.live, stats.expired, stats.spawned, stats.dropped
        );

        stats
    }

    /// Remove every spark and repack, leaving empty draw ranges
    pub fn clear(&mut self) {
        let removed = self.sparks.len();
        self.sparks.clear();
        self.pending.clear();
        self.repack();
        debug!("Cleared spark pool ({removed} sparks removed)");
    }

    /// Tear the engine down, releasing its buffers
    pub fn dispose(self) {
        debug!(
            "Disposing spark pool with {} live sparks and {} point slots",
            self.sparks.len(),
            self.packer.points().capacity()
        );
    }

    fn repack(&mut self) {
        self.packer.pack(&self.sparks, &self.config);
    }
}
