//! Individual spark representation

use glam::Vec3;

use crate::config::REFERENCE_TICK_RATE;
use crate::trail::TrailHistory;

/// Whether a spark still has a branching opportunity left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    /// Repeated branching; exhausted once `count` reaches `max`
    Counter { count: u32, max: u32 },
    /// Single branch event; `armed` is decided at creation
    OneShot { armed: bool, spent: bool },
}

impl BranchState {
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        match *self {
            BranchState::Counter { count, max } => count >= max,
            BranchState::OneShot { armed, spent } => !armed || spent,
        }
    }

    /// Record a successful branch event
    #[inline]
    pub fn record_branch(&mut self) {
        match self {
            BranchState::Counter { count, .. } => *count = count.saturating_add(1),
            BranchState::OneShot { spent, .. } => *spent = true,
        }
    }
}

/// Caller-supplied kinematics for a new spark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkInit {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Lifespan in seconds; also becomes `max_life`
    pub life: f32,
    pub size: f32,
    /// Starting branch counter for counter-budget presets
    pub branch_count: u32,
}

impl SparkInit {
    pub fn new(position: Vec3, velocity: Vec3, life: f32, size: f32) -> Self {
        Self {
            position,
            velocity,
            life,
            size,
            branch_count: 0,
        }
    }

    pub fn with_branch_count(mut self, branch_count: u32) -> Self {
        self.branch_count = branch_count;
        self
    }
}

/// A single live spark
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life in seconds; may dip below zero for one frame
    pub life: f32,
    max_life: f32,
    pub size: f32,
    trail: TrailHistory,
    pub branch: BranchState,
    /// Renderer jitter seeds, present only for wobble presets
    pub seed: Option<[f32; 2]>,
}

impl Spark {
    /// Create a spark whose trail is collapsed onto its starting position
    pub fn new(
        init: &SparkInit,
        trail_length: usize,
        branch: BranchState,
        seed: Option<[f32; 2]>,
    ) -> Self {
        Self {
            position: init.position,
            velocity: init.velocity,
            life: init.life,
            max_life: init.life,
            size: init.size,
            trail: TrailHistory::new(trail_length, init.position),
            branch,
            seed,
        }
    }

    /// Lifespan fixed at creation
    #[inline]
    pub fn max_life(&self) -> f32 {
        self.max_life
    }

    #[inline]
    pub fn trail(&self) -> &TrailHistory {
        &self.trail
    }

    /// Terminal once life reaches zero (or stops being a number)
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0 || self.life.is_nan()
    }

    /// Remaining life as a fraction of `max_life`, clamped to `[0, 1]`
    ///
    /// Degenerate lifespans (zero, negative, NaN) report 0.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        let ratio = self.life / self.max_life;
        if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Advance one frame
    ///
    /// Gravity acts on the vertical axis, drag is normalized to the reference
    /// tick rate, and the post-move position is pushed onto the trail.
    pub fn integrate(&mut self, dt: f32, gravity: f32, drag: f32) {
        self.velocity.y += gravity * dt;
        self.velocity *= drag.powf(dt * REFERENCE_TICK_RATE);
        self.position += self.velocity * dt;
        self.life -= dt;
        self.trail.push(self.position);
    }
}
